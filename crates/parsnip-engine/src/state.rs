//! Immutable parser, serializer, and matcher snapshots.
//!
//! Every operation that moves a state forward returns a new snapshot and
//! leaves the old one untouched, so an alternative that fails simply drops
//! the snapshots it produced.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::chain::Chain;
use crate::event::Event;
use crate::ignorables::Ignorables;
use crate::merge_guard::{would_merge, MergeGuard};

/// Source text together with the rules for skipping ignorable text.
#[derive(Debug)]
pub struct Input {
    content: String,
    ignorables: Ignorables,
}

impl Input {
    /// Creates a new input.
    #[must_use]
    pub fn new(content: impl Into<String>, ignorables: Ignorables) -> Self {
        Self {
            content: content.into(),
            ignorables,
        }
    }

    /// Returns the full source text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A parser position and the events produced so far.
#[derive(Debug, Clone)]
pub struct ParseState {
    input: Arc<Input>,
    index: usize,
    output: Chain<Event>,
}

impl ParseState {
    /// Creates the initial state, positioned past any leading ignorables.
    #[must_use]
    pub fn new(input: Arc<Input>) -> Self {
        let index = input.ignorables.scan_past(&input.content, 0);
        Self {
            input,
            index,
            output: Chain::new(),
        }
    }

    /// Returns the input being parsed.
    #[must_use]
    pub fn input(&self) -> &Input {
        &self.input
    }

    /// Returns the byte offset of the next unparsed token.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the events produced so far.
    #[must_use]
    pub fn output(&self) -> &Chain<Event> {
        &self.output
    }

    /// Returns the unparsed text.
    #[must_use]
    pub fn remaining(&self) -> &str {
        &self.input.content[self.index..]
    }

    /// Returns `true` when only ignorable text remains.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.index == self.input.content.len()
    }

    /// Returns the next unparsed character.
    #[must_use]
    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Returns `true` if the remaining input starts with `text` and no
    /// merge hazard applies at the end of the match.
    #[must_use]
    pub fn starts_with(&self, text: &str, guard: Option<&MergeGuard>) -> bool {
        self.remaining().starts_with(text)
            && guard.map_or(true, |guard| {
                !guard.is_hazard(&self.input.content, self.index + text.len())
            })
    }

    /// Consumes `len` bytes and any ignorables after them.
    #[must_use]
    pub fn advance(&self, len: usize) -> Self {
        self.advance_to(self.index + len)
    }

    /// Moves to `end`, skipping any ignorables that follow it.
    #[must_use]
    pub fn advance_to(&self, end: usize) -> Self {
        debug_assert!(end >= self.index, "parse states only move forward");
        Self {
            input: Arc::clone(&self.input),
            index: self.input.ignorables.scan_past(&self.input.content, end),
            output: self.output.clone(),
        }
    }

    /// Returns this state with `event` appended to the output.
    #[must_use]
    pub fn append_output(&self, event: Event) -> Self {
        self.with_output(self.output.append(event))
    }

    /// Returns this state with its output replaced.
    #[must_use]
    pub fn with_output(&self, output: Chain<Event>) -> Self {
        Self {
            input: Arc::clone(&self.input),
            index: self.index,
            output,
        }
    }
}

/// Unconsumed events, next event at the head.
fn pending_chain<'e, I>(events: I) -> Chain<Event>
where
    I: IntoIterator<Item = &'e Event>,
    I::IntoIter: DoubleEndedIterator,
{
    events.into_iter().rev().cloned().collect()
}

/// Events still to be serialized and the text produced so far.
#[derive(Debug, Clone)]
pub struct SerialState {
    pending: Chain<Event>,
    consumed: usize,
    output: Chain<SmolStr>,
    tokens_explicit: bool,
}

impl SerialState {
    /// Serializes a chain produced by parsing. Every literal must consume
    /// its own `Token` event.
    #[must_use]
    pub fn from_parse(events: &[Event]) -> Self {
        Self {
            pending: pending_chain(events),
            consumed: 0,
            output: Chain::new(),
            tokens_explicit: true,
        }
    }

    /// Serializes a skeleton written by a tree serializer that omits fixed
    /// tokens. Literals always emit their text.
    #[must_use]
    pub fn from_skeleton(events: &[Event]) -> Self {
        Self {
            tokens_explicit: false,
            ..Self::from_parse(events)
        }
    }

    /// Returns the next unconsumed event.
    #[must_use]
    pub fn peek(&self) -> Option<&Event> {
        self.pending.last()
    }

    /// Consumes the next event.
    #[must_use]
    pub fn advance(&self) -> Self {
        Self {
            pending: self.pending.prev(),
            consumed: self.consumed + usize::from(!self.pending.is_empty()),
            output: self.output.clone(),
            tokens_explicit: self.tokens_explicit,
        }
    }

    /// Appends `text`, separated from the previous fragment by a space if
    /// the two would otherwise lex as something else.
    #[must_use]
    pub fn append(&self, text: &str, punctuation: &[SmolStr]) -> Self {
        let mut output = self.output.clone();
        if let Some(previous) = output.last() {
            if would_merge(previous, text, punctuation) {
                output = output.append(SmolStr::new_inline(" "));
            }
        }
        Self {
            pending: self.pending.clone(),
            consumed: self.consumed,
            output: output.append(SmolStr::new(text)),
            tokens_explicit: self.tokens_explicit,
        }
    }

    /// Returns the number of events consumed.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Returns `true` once every event has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns `true` if literals must be matched by `Token` events.
    #[must_use]
    pub fn tokens_explicit(&self) -> bool {
        self.tokens_explicit
    }

    /// Returns the text produced so far.
    #[must_use]
    pub fn text(&self) -> String {
        self.output.to_vec().concat()
    }
}

/// Events still to be verified against the grammar.
#[derive(Debug, Clone)]
pub struct MatchState {
    pending: Chain<Event>,
    consumed: usize,
}

impl MatchState {
    /// Creates a state that will check `events` in order.
    #[must_use]
    pub fn new(events: &[Event]) -> Self {
        Self {
            pending: pending_chain(events),
            consumed: 0,
        }
    }

    /// Returns the next unverified event.
    #[must_use]
    pub fn peek(&self) -> Option<&Event> {
        self.pending.last()
    }

    /// Consumes the next event.
    #[must_use]
    pub fn advance(&self) -> Self {
        Self {
            pending: self.pending.prev(),
            consumed: self.consumed + usize::from(!self.pending.is_empty()),
        }
    }

    /// Returns the number of events consumed.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Returns `true` once every event has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(text: &str) -> ParseState {
        ParseState::new(Arc::new(Input::new(text, Ignorables::default())))
    }

    #[test]
    fn initial_state_skips_leading_ignorables() {
        let state = state("  /* c */ x");
        assert_eq!(state.remaining(), "x");
    }

    #[test]
    fn advancing_leaves_the_original_untouched() {
        let start = state("ab  cd").append_output(Event::token("x"));
        let next = start.advance(2).append_output(Event::token("y"));

        assert_eq!(start.index(), 0);
        assert_eq!(start.output().len(), 1);
        assert_eq!(next.remaining(), "cd");
        assert_eq!(next.output().len(), 2);
    }

    #[test]
    fn at_end_after_trailing_whitespace() {
        let state = state("x  ");
        assert!(!state.is_at_end());
        assert!(state.advance(1).is_at_end());
    }

    #[test]
    fn serial_state_consumes_in_order() {
        let events = [Event::token("a"), Event::content("b")];
        let state = SerialState::from_parse(&events);
        assert_eq!(state.peek(), Some(&Event::token("a")));
        let state = state.advance();
        assert_eq!(state.peek(), Some(&Event::content("b")));
        let state = state.advance();
        assert!(state.is_exhausted());
        assert_eq!(state.consumed(), 2);
    }

    #[test]
    fn serial_output_separates_words() {
        let state = SerialState::from_skeleton(&[])
            .append("new", &[])
            .append("Foo", &[])
            .append("(", &[]);
        assert_eq!(state.text(), "new Foo(");
    }

    #[test]
    fn match_state_tracks_consumption() {
        let events = [Event::Pop];
        let state = MatchState::new(&events);
        assert!(!state.is_exhausted());
        let state = state.advance();
        assert!(state.is_exhausted());
        assert_eq!(state.consumed(), 1);
        assert_eq!(state.advance().consumed(), 1);
    }
}
