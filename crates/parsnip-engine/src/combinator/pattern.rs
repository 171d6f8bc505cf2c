use regex::Regex;
use smol_str::SmolStr;

use super::ParseResult;
use crate::context::{MatchContext, ParseContext, SerialContext};
use crate::error::GrammarError;
use crate::event::Event;
use crate::state::{MatchState, ParseState, SerialState};

/// Leaf content described by a regular expression, e.g. identifiers or
/// numbers.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: SmolStr,
    /// Matches a prefix of the remaining input.
    anchored: Regex,
    /// Matches a whole content event.
    full: Regex,
}

impl Pattern {
    /// Compiles `source`.
    pub fn new(source: &str) -> Result<Self, GrammarError> {
        let compile = |wrapped: String| {
            Regex::new(&wrapped).map_err(|err| GrammarError::InvalidPattern {
                pattern: SmolStr::new(source),
                message: err.to_string(),
            })
        };
        Ok(Self {
            source: SmolStr::new(source),
            anchored: compile(format!(r"\A(?:{source})"))?,
            full: compile(format!(r"\A(?:{source})\z"))?,
        })
    }

    /// Returns the regular expression as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the pattern accepts the empty string.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.full.is_match("")
    }

    fn describe(&self) -> String {
        format!("expected /{}/", self.source)
    }

    pub(crate) fn parse(&self, state: ParseState, cx: &mut ParseContext<'_>) -> ParseResult {
        let Some(found) = self.anchored.find(state.remaining()) else {
            cx.report(&state, || self.describe());
            return ParseResult::failure();
        };
        let text = SmolStr::new(found.as_str());
        let next = state.advance(found.end()).append_output(Event::Content(text));
        ParseResult::success(next)
    }

    pub(crate) fn unparse(
        &self,
        state: SerialState,
        cx: &mut SerialContext<'_>,
    ) -> Option<SerialState> {
        match state.peek() {
            Some(Event::Content(text)) if self.full.is_match(text) => {
                let text = text.clone();
                Some(state.advance().append(&text, cx.grammar.punctuation()))
            }
            _ => {
                cx.report(&state, || self.describe());
                None
            }
        }
    }

    pub(crate) fn match_events(
        &self,
        state: MatchState,
        cx: &mut MatchContext<'_>,
    ) -> Option<MatchState> {
        match state.peek() {
            Some(Event::Content(text)) if self.full.is_match(text) => Some(state.advance()),
            _ => {
                cx.report(&state, || self.describe());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_at_both_ends() {
        let digits = Pattern::new("[0-9]+").unwrap();
        assert_eq!(digits.anchored.find("12+3").map(|m| m.as_str()), Some("12"));
        assert!(digits.anchored.find("+3").is_none());
        assert!(digits.full.is_match("123"));
        assert!(!digits.full.is_match("12a"));
        assert!(!digits.is_nullable());
    }

    #[test]
    fn alternation_inside_pattern_stays_grouped() {
        let keyword = Pattern::new("if|else").unwrap();
        assert!(keyword.full.is_match("else"));
        assert!(!keyword.full.is_match("ifelse"));
    }

    #[test]
    fn invalid_patterns_are_grammar_errors() {
        let err = Pattern::new("(").unwrap_err();
        assert!(matches!(err, GrammarError::InvalidPattern { .. }));
    }

    #[test]
    fn nullable_patterns() {
        assert!(Pattern::new("a*").unwrap().is_nullable());
    }
}
