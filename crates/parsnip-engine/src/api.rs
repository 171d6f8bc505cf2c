//! Entry points for parsing, unparsing and matching.

use std::sync::Arc;

use crate::combinator::{Combinator, Synopsis};
use crate::config::ParseOptions;
use crate::context::{MatchContext, ParseContext, Profile, SerialContext};
use crate::diagnostics::{ErrorReceiver, FurthestFailure, NullReceiver, Tee};
use crate::error::{GrammarError, MatchError, ParseError, UnparseError};
use crate::event::Event;
use crate::grammar::{Grammar, ProductionId};
use crate::ratpack::CacheStats;
use crate::state::{Input, MatchState, ParseState, SerialState};

/// A successful parse.
#[derive(Debug, Clone)]
pub struct Parsed {
    events: Vec<Event>,
    end: usize,
    cache: CacheStats,
    profile: Profile,
}

impl Parsed {
    /// Returns the finished event chain.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Returns the offset after the parse and any ignorables that follow
    /// it.
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache
    }

    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }
}

/// A production of a grammar used as the start of an invocation.
#[derive(Debug, Clone)]
pub struct Entry<'g> {
    grammar: &'g Grammar,
    production: ProductionId,
    start: Combinator,
    complete: bool,
    options: ParseOptions,
}

impl Grammar {
    /// Starts invocations at the production called `name`.
    pub fn entry(&self, name: &str) -> Result<Entry<'_>, GrammarError> {
        let production = self
            .lookup(name)
            .ok_or_else(|| GrammarError::UnknownProduction(name.into()))?;
        Ok(self.entry_at(production))
    }

    /// Starts invocations at `production`.
    #[must_use]
    pub fn entry_at(&self, production: ProductionId) -> Entry<'_> {
        Entry {
            grammar: self,
            production,
            start: Combinator::Reference(production),
            complete: false,
            options: ParseOptions::default(),
        }
    }
}

impl<'g> Entry<'g> {
    /// Requires the whole input to be consumed: all text for parsing, all
    /// events for unparsing and matching.
    #[must_use]
    pub fn complete(mut self) -> Self {
        self.complete = true;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    #[must_use]
    pub fn production(&self) -> ProductionId {
        self.production
    }

    /// Parses `text`.
    pub fn parse(&self, text: &str) -> Result<Parsed, ParseError> {
        self.parse_with(text, &mut NullReceiver)
    }

    /// Parses `text`, reporting every local failure to `errors`.
    ///
    /// A syntax error is built from the failures that got furthest. With
    /// [`Entry::complete`], unconsumed input fails with "expected end of
    /// input" at the offset the parse stopped at.
    pub fn parse_with(
        &self,
        text: &str,
        errors: &mut dyn ErrorReceiver<ParseState>,
    ) -> Result<Parsed, ParseError> {
        let input = Arc::new(Input::new(text, self.grammar.ignorables().clone()));
        let state = ParseState::new(input);
        let mut furthest = FurthestFailure::new();
        let mut receiver = Tee(&mut furthest, errors);
        let mut cx = ParseContext::new(self.grammar, self.options, &mut receiver);

        let result = self.start.parse(state.clone(), &mut cx)?;
        debug_assert!(cx.lr.is_empty(), "left-recursion stack must unwind");
        let end = match result.synopsis {
            Synopsis::Success(end) if !self.complete || end.is_at_end() => end,
            Synopsis::Success(end) => {
                cx.report(&end, || "expected end of input".to_string());
                drop(cx);
                drop(receiver);
                return Err(ParseError::Syntax(
                    furthest.into_syntax_error(text, end.index()),
                ));
            }
            Synopsis::Failure | Synopsis::FailureDueToLrExclusion => {
                drop(cx);
                drop(receiver);
                return Err(ParseError::Syntax(
                    furthest.into_syntax_error(text, state.index()),
                ));
            }
        };
        Ok(Parsed {
            events: end.output().to_vec(),
            end: end.index(),
            cache: cx.ratpack.stats(),
            profile: cx.profile,
        })
    }

    /// Regenerates text from events produced by a parse. Every literal
    /// must find its own `Token` event.
    pub fn unparse(&self, events: &[Event]) -> Result<String, UnparseError> {
        self.run_unparse(SerialState::from_parse(events))
    }

    /// Regenerates text from a skeleton that leaves out fixed tokens.
    /// Literals always write their text.
    pub fn unparse_skeleton(&self, events: &[Event]) -> Result<String, UnparseError> {
        self.run_unparse(SerialState::from_skeleton(events))
    }

    fn run_unparse(&self, state: SerialState) -> Result<String, UnparseError> {
        let mut furthest = FurthestFailure::new();
        let mut cx = SerialContext::new(self.grammar, &mut furthest);
        let end = self.start.unparse(state, &mut cx);
        if let Some(end) = &end {
            if self.complete && !end.is_exhausted() {
                cx.report(end, || "expected no further events".to_string());
            }
        }
        drop(cx);
        match end {
            Some(end) if !self.complete || end.is_exhausted() => Ok(end.text()),
            _ => {
                let (event, expected) = furthest.into_parts();
                Err(UnparseError {
                    event: event.unwrap_or(0),
                    expected,
                })
            }
        }
    }

    /// Checks `events` against the grammar, returning how many were
    /// consumed.
    pub fn match_events(&self, events: &[Event]) -> Result<usize, MatchError> {
        let mut furthest = FurthestFailure::new();
        let mut cx = MatchContext::new(self.grammar, &mut furthest);
        let end = self.start.match_events(MatchState::new(events), &mut cx);
        if let Some(end) = &end {
            if self.complete && !end.is_exhausted() {
                cx.report(end, || "expected no further events".to_string());
            }
        }
        drop(cx);
        match end {
            Some(end) if !self.complete || end.is_exhausted() => Ok(end.consumed()),
            _ => {
                let (event, expected) = furthest.into_parts();
                Err(MatchError {
                    event: event.unwrap_or(0),
                    expected,
                })
            }
        }
    }
}
