//! The left-recursion call stack.
//!
//! Mirrors the chain of productions currently being derived. A production
//! re-entered at the offset it is already being derived at is left
//! recursive; what happens then depends on the [`Stage`] of that frame.

use drop_bomb::DropBomb;

use crate::grammar::ProductionId;

/// Where a production stands at a given offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Not being derived at this offset.
    NotOnStack,
    /// Deriving its first, non-left-recursive parse.
    Seeding,
    /// Extending a seed; a self-reference stands for the input up to
    /// `seed_end`.
    Growing {
        /// Offset reached by the best parse so far.
        seed_end: usize,
    },
}

#[derive(Debug)]
struct Frame {
    production: ProductionId,
    index: usize,
    stage: Stage,
}

/// Proof that a frame was pushed. Must be handed back to
/// [`LeftRecursion::exit`].
pub(crate) struct VariantScope {
    depth: usize,
    bomb: DropBomb,
}

#[derive(Debug, Default)]
pub(crate) struct LeftRecursion {
    frames: Vec<Frame>,
}

impl LeftRecursion {
    /// Returns the stage of `production` at `index`.
    ///
    /// Offsets never move backwards along the stack, so only the innermost
    /// frame of a production can be at the current offset.
    pub(crate) fn stage(&self, production: ProductionId, index: usize) -> Stage {
        self.frames
            .iter()
            .rev()
            .find(|frame| frame.production == production)
            .filter(|frame| frame.index == index)
            .map_or(Stage::NotOnStack, |frame| frame.stage)
    }

    /// Returns `true` while any frame of `production` is open.
    pub(crate) fn is_active(&self, production: ProductionId) -> bool {
        self.frames.iter().any(|frame| frame.production == production)
    }

    pub(crate) fn enter(&mut self, production: ProductionId, index: usize) -> VariantScope {
        self.frames.push(Frame {
            production,
            index,
            stage: Stage::Seeding,
        });
        VariantScope {
            depth: self.frames.len() - 1,
            bomb: DropBomb::new("left-recursion frame must be exited"),
        }
    }

    /// Moves the frame of `scope` to the growing stage with a new seed.
    pub(crate) fn grow(&mut self, scope: &VariantScope, seed_end: usize) {
        self.frames[scope.depth].stage = Stage::Growing { seed_end };
    }

    pub(crate) fn exit(&mut self, mut scope: VariantScope) {
        scope.bomb.defuse();
        assert_eq!(
            self.frames.len(),
            scope.depth + 1,
            "left-recursion frames exited out of order"
        );
        self.frames.pop();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
