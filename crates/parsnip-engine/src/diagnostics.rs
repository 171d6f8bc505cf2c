//! Error receivers.
//!
//! Every combinator that fails reports what it expected to the receiver of
//! the current invocation. Most reports are harmless, since an enclosing
//! alternative may still succeed; the outermost caller decides what to
//! show, usually the failures that got furthest.

use smol_str::SmolStr;
use text_size::TextSize;

use crate::error::SyntaxError;
use crate::state::{MatchState, ParseState, SerialState};

/// Receives local failures as `(state, message)` pairs.
pub trait ErrorReceiver<S> {
    /// Returns `true` if a failure at `state` would be recorded. Messages
    /// are only formatted for interested receivers.
    fn wants(&self, _state: &S) -> bool {
        true
    }

    /// Records a failure at `state`.
    fn receive(&mut self, state: &S, message: String);
}

impl<S, R: ErrorReceiver<S> + ?Sized> ErrorReceiver<S> for &mut R {
    fn wants(&self, state: &S) -> bool {
        (**self).wants(state)
    }

    fn receive(&mut self, state: &S, message: String) {
        (**self).receive(state, message);
    }
}

/// Discards every failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReceiver;

impl<S> ErrorReceiver<S> for NullReceiver {
    fn wants(&self, _state: &S) -> bool {
        false
    }

    fn receive(&mut self, _state: &S, _message: String) {}
}

/// Forwards every failure to two receivers.
#[derive(Debug, Default)]
pub struct Tee<A, B>(pub A, pub B);

impl<S, A: ErrorReceiver<S>, B: ErrorReceiver<S>> ErrorReceiver<S> for Tee<A, B> {
    fn wants(&self, state: &S) -> bool {
        self.0.wants(state) || self.1.wants(state)
    }

    fn receive(&mut self, state: &S, message: String) {
        if self.0.wants(state) {
            self.0.receive(state, message.clone());
        }
        if self.1.wants(state) {
            self.1.receive(state, message);
        }
    }
}

/// How far a state has got through its input.
pub trait Progress {
    /// Byte offset for parsing, event count for unparsing and matching.
    fn progress(&self) -> usize;
}

impl Progress for ParseState {
    fn progress(&self) -> usize {
        self.index()
    }
}

impl Progress for SerialState {
    fn progress(&self) -> usize {
        self.consumed()
    }
}

impl Progress for MatchState {
    fn progress(&self) -> usize {
        self.consumed()
    }
}

/// Keeps the distinct messages reported at the furthest position.
#[derive(Debug, Default, Clone)]
pub struct FurthestFailure {
    furthest: Option<usize>,
    expected: Vec<SmolStr>,
}

impl FurthestFailure {
    /// Creates an empty receiver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the furthest position a failure was reported at.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.furthest
    }

    /// Returns the messages reported at [`Self::position`], in report
    /// order.
    #[must_use]
    pub fn expected(&self) -> &[SmolStr] {
        &self.expected
    }

    /// Builds a syntax error for `content`, at `fallback` if nothing was
    /// reported.
    #[must_use]
    pub fn into_syntax_error(self, content: &str, fallback: usize) -> SyntaxError {
        let offset = self.furthest.unwrap_or(fallback);
        let (line, column) = line_col(content, offset);
        SyntaxError {
            offset: TextSize::try_from(offset).unwrap_or(TextSize::from(u32::MAX)),
            line,
            column,
            expected: self.expected,
        }
    }

    /// Splits into position and messages.
    #[must_use]
    pub fn into_parts(self) -> (Option<usize>, Vec<SmolStr>) {
        (self.furthest, self.expected)
    }
}

impl<S: Progress> ErrorReceiver<S> for FurthestFailure {
    fn wants(&self, state: &S) -> bool {
        self.furthest.is_none_or(|furthest| state.progress() >= furthest)
    }

    fn receive(&mut self, state: &S, message: String) {
        let progress = state.progress();
        match self.furthest {
            Some(furthest) if progress < furthest => return,
            Some(furthest) if progress == furthest => {}
            _ => {
                self.furthest = Some(progress);
                self.expected.clear();
            }
        }
        if !self.expected.iter().any(|seen| *seen == message) {
            self.expected.push(SmolStr::new(message));
        }
    }
}

/// Records every failure in order. Mainly useful for tracing grammars.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    failures: Vec<(usize, String)>,
}

impl Recorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(progress, message)` for every failure received.
    #[must_use]
    pub fn failures(&self) -> &[(usize, String)] {
        &self.failures
    }
}

impl<S: Progress> ErrorReceiver<S> for Recorder {
    fn receive(&mut self, state: &S, message: String) {
        self.failures.push((state.progress(), message));
    }
}

/// 1-based line and column, in characters, of byte `offset` in `content`.
#[must_use]
pub fn line_col(content: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(content.len());
    let before = content.get(..offset).unwrap_or(content);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |nl| nl + 1);
    let column = before[line_start..].chars().count() + 1;
    (
        u32::try_from(line).unwrap_or(u32::MAX),
        u32::try_from(column).unwrap_or(u32::MAX),
    )
}
