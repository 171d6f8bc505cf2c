//! The packrat cache.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::combinator::ParseResult;
use crate::event::Event;
use crate::grammar::ProductionId;
use crate::state::ParseState;

/// A resolved production at one offset.
#[derive(Debug, Clone)]
pub(crate) enum CacheEntry {
    Failure,
    Success {
        /// Offset after the production and its trailing ignorables.
        end: usize,
        /// Events the production appended.
        events: Arc<[Event]>,
    },
}

impl CacheEntry {
    /// Re-applies the entry on top of `state`.
    pub(crate) fn replay(&self, state: &ParseState) -> ParseResult {
        match self {
            Self::Failure => ParseResult::failure(),
            Self::Success { end, events } => {
                let output = state.output().extend(events.iter().cloned());
                ParseResult::success(state.advance_to(*end).with_output(output))
            }
        }
    }
}

/// Cache counters for one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Results written.
    pub stores: u64,
}

#[derive(Debug, Default)]
pub(crate) struct RatPack {
    entries: FxHashMap<(ProductionId, usize), CacheEntry>,
    stats: CacheStats,
}

impl RatPack {
    pub(crate) fn get(&mut self, production: ProductionId, index: usize) -> Option<&CacheEntry> {
        let entry = self.entries.get(&(production, index));
        if entry.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        entry
    }

    pub(crate) fn store(&mut self, production: ProductionId, index: usize, entry: CacheEntry) {
        let previous = self.entries.insert((production, index), entry);
        debug_assert!(previous.is_none(), "cache entries are written once");
        self.stats.stores += 1;
    }

    pub(crate) fn stats(&self) -> CacheStats {
        self.stats
    }
}
