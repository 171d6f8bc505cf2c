use smol_str::SmolStr;

use super::{Combinator, ParseResult};
use crate::builder::SourcePos;
use crate::context::{MatchContext, ParseContext, SerialContext};
use crate::event::Event;
use crate::lookahead::CharSet;
use crate::merge_guard::MergeGuard;
use crate::state::{MatchState, ParseState, SerialState};

/// Fixed text such as a keyword or an operator.
#[derive(Debug, Clone)]
pub struct Literal {
    text: SmolStr,
    ignore_merge_hazards: bool,
    guard: Option<MergeGuard>,
    pos: SourcePos,
}

impl Literal {
    /// Wraps `text` in a combinator. Empty text matches nothing, so it
    /// becomes [`Combinator::Empty`].
    ///
    /// The word guard applies immediately; punctuation guards are attached
    /// once the grammar knows all of its punctuation tokens.
    #[must_use]
    pub fn combinator(text: &str, ignore_merge_hazards: bool, pos: SourcePos) -> Combinator {
        if text.is_empty() {
            return Combinator::Empty;
        }
        let guard = if ignore_merge_hazards {
            None
        } else {
            MergeGuard::for_literal(text, &[])
        };
        Combinator::Literal(Self {
            text: SmolStr::new(text),
            ignore_merge_hazards,
            guard,
            pos,
        })
    }

    /// Returns the matched text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if merge hazards are never checked for this literal.
    #[must_use]
    pub fn ignores_merge_hazards(&self) -> bool {
        self.ignore_merge_hazards
    }

    /// Returns where the literal was written in its grammar source.
    #[must_use]
    pub fn pos(&self) -> SourcePos {
        self.pos
    }

    /// Returns the guard checked after a match, if any.
    #[must_use]
    pub fn guard(&self) -> Option<&MergeGuard> {
        self.guard.as_ref()
    }

    /// Returns `true` for literals that are not words.
    pub(crate) fn is_punctuation(&self) -> bool {
        !matches!(MergeGuard::for_literal(&self.text, &[]), Some(MergeGuard::Word))
    }

    pub(crate) fn attach_guard(&mut self, punctuation: &[SmolStr]) {
        if !self.ignore_merge_hazards {
            self.guard = MergeGuard::for_literal(&self.text, punctuation);
        }
    }

    pub(crate) fn lookahead1(&self) -> CharSet {
        self.text.chars().next().map_or_else(CharSet::empty, CharSet::singleton)
    }

    pub(crate) fn parse(&self, state: ParseState, cx: &mut ParseContext<'_>) -> ParseResult {
        if state.starts_with(&self.text, self.guard.as_ref()) {
            let next = state
                .advance(self.text.len())
                .append_output(Event::Token(self.text.clone()));
            return ParseResult::success(next);
        }
        cx.report(&state, || format!("expected `{}`", self.text));
        ParseResult::failure()
    }

    pub(crate) fn unparse(
        &self,
        state: SerialState,
        cx: &mut SerialContext<'_>,
    ) -> Option<SerialState> {
        let own_token = matches!(state.peek(), Some(Event::Token(text)) if *text == self.text);
        let state = match (own_token, state.tokens_explicit()) {
            (true, _) => state.advance(),
            (false, false) => state,
            (false, true) => {
                cx.report(&state, || format!("expected token `{}`", self.text));
                return None;
            }
        };
        Some(state.append(&self.text, cx.grammar.punctuation()))
    }

    pub(crate) fn match_events(
        &self,
        state: MatchState,
        cx: &mut MatchContext<'_>,
    ) -> Option<MatchState> {
        match state.peek() {
            Some(Event::Token(text) | Event::Content(text)) if *text == self.text => {
                Some(state.advance())
            }
            _ => {
                cx.report(&state, || format!("expected `{}`", self.text));
                None
            }
        }
    }
}
