//! Per-invocation mutable state.
//!
//! One context lives for exactly one parse, unparse or match call and is
//! threaded by reference through every combinator. Nothing in here is
//! shared between invocations.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::config::ParseOptions;
use crate::diagnostics::ErrorReceiver;
use crate::grammar::{Grammar, ProductionId};
use crate::left_recursion::LeftRecursion;
use crate::ratpack::RatPack;
use crate::state::{MatchState, ParseState, SerialState};

/// How often each production was derived, not counting cache hits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    entered: FxHashMap<ProductionId, u64>,
}

impl Profile {
    pub(crate) fn enter(&mut self, production: ProductionId) {
        *self.entered.entry(production).or_default() += 1;
    }

    /// Returns how often `production` was entered past the cache.
    #[must_use]
    pub fn entered(&self, production: ProductionId) -> u64 {
        self.entered.get(&production).copied().unwrap_or(0)
    }

    /// Returns the per-production counts keyed by production name, most
    /// entered first.
    #[must_use]
    pub fn report(&self, grammar: &Grammar) -> Vec<ProfileEntry> {
        let mut entries: Vec<ProfileEntry> = self
            .entered
            .iter()
            .map(|(production, count)| ProfileEntry {
                production: grammar.production(*production).name().to_string(),
                entered: *count,
            })
            .collect();
        entries.sort_by(|a, b| b.entered.cmp(&a.entered).then_with(|| a.production.cmp(&b.production)));
        entries
    }
}

/// One line of a [`Profile::report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileEntry {
    /// Production name.
    pub production: String,
    /// Times entered past the cache.
    pub entered: u64,
}

pub(crate) struct ParseContext<'a> {
    pub(crate) grammar: &'a Grammar,
    pub(crate) options: ParseOptions,
    pub(crate) ratpack: RatPack,
    pub(crate) lr: LeftRecursion,
    pub(crate) profile: Profile,
    errors: &'a mut dyn ErrorReceiver<ParseState>,
    muted: u32,
}

impl<'a> ParseContext<'a> {
    pub(crate) fn new(
        grammar: &'a Grammar,
        options: ParseOptions,
        errors: &'a mut dyn ErrorReceiver<ParseState>,
    ) -> Self {
        Self {
            grammar,
            options,
            ratpack: RatPack::default(),
            lr: LeftRecursion::default(),
            profile: Profile::default(),
            errors,
            muted: 0,
        }
    }

    /// Reports a local failure. The message is only built if someone
    /// records it.
    pub(crate) fn report(&mut self, state: &ParseState, message: impl FnOnce() -> String) {
        if self.muted == 0 && self.errors.wants(state) {
            self.errors.receive(state, message());
        }
    }

    pub(crate) fn mute(&mut self) {
        self.muted += 1;
    }

    pub(crate) fn unmute(&mut self) {
        self.muted -= 1;
    }
}

macro_rules! event_context {
    ($name:ident, $state:ty) => {
        pub(crate) struct $name<'a> {
            pub(crate) grammar: &'a Grammar,
            errors: &'a mut dyn ErrorReceiver<$state>,
            muted: u32,
        }

        impl<'a> $name<'a> {
            pub(crate) fn new(grammar: &'a Grammar, errors: &'a mut dyn ErrorReceiver<$state>) -> Self {
                Self {
                    grammar,
                    errors,
                    muted: 0,
                }
            }

            pub(crate) fn report(&mut self, state: &$state, message: impl FnOnce() -> String) {
                if self.muted == 0 && self.errors.wants(state) {
                    self.errors.receive(state, message());
                }
            }

            #[allow(dead_code)]
            pub(crate) fn mute(&mut self) {
                self.muted += 1;
            }

            #[allow(dead_code)]
            pub(crate) fn unmute(&mut self) {
                self.muted -= 1;
            }
        }
    };
}

event_context!(SerialContext, SerialState);
event_context!(MatchContext, MatchState);
