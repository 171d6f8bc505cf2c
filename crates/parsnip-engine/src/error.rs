//! Engine errors.

use smol_str::SmolStr;
use text_size::TextSize;
use thiserror::Error;

/// A broken structural invariant.
///
/// These indicate a grammar construction bug, not bad input, and abort the
/// invocation that hit them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A growth step of a left-recursive production never referred back to
    /// the production.
    #[error("growth step of `{production}` has no left-recursive call")]
    MissingGrowthCall { production: SmolStr },

    /// Something other than node boundaries precedes the left-recursive
    /// call of a growth step.
    #[error("growth step of `{production}` has {found} before its left-recursive call")]
    UnexpectedGrowthEvent { production: SmolStr, found: String },

    /// A growth marker was left where no rewrite can place it.
    #[error("stray growth marker for `{production}`")]
    StrayGrowthMarker { production: SmolStr },

    /// The seed of a left-recursive production does not start with one of
    /// its variants.
    #[error("seed of `{production}` does not open a `{production}` node")]
    MalformedSeed { production: SmolStr },

    /// A growth step ended before the position it started from.
    #[error("growth of `{production}` moved back from {from} to {to}")]
    GrowthRegressed {
        production: SmolStr,
        from: usize,
        to: usize,
    },
}

/// Input rejected by the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {}", describe_expected(.expected))]
pub struct SyntaxError {
    /// Byte offset of the furthest failure.
    pub offset: TextSize,
    /// 1-based line of `offset`.
    pub line: u32,
    /// 1-based column, in characters, of `offset`.
    pub column: u32,
    /// What the grammar expected at `offset`.
    pub expected: Vec<SmolStr>,
}

/// Failure of a top-level parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input does not conform to the grammar.
    #[error("syntax error at {0}")]
    Syntax(SyntaxError),
    /// The grammar is malformed.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Failure of a top-level unparse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot unparse event {event}: {}", describe_expected(.expected))]
pub struct UnparseError {
    /// Index of the furthest event reached.
    pub event: usize,
    /// What the grammar expected there.
    pub expected: Vec<SmolStr>,
}

/// Failure of a top-level match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("events do not match at {event}: {}", describe_expected(.expected))]
pub struct MatchError {
    /// Index of the furthest event reached.
    pub event: usize,
    /// What the grammar expected there.
    pub expected: Vec<SmolStr>,
}

/// Errors detected while building a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A production was referenced or declared but has no variants.
    #[error("production `{0}` has no variants")]
    EmptyProduction(SmolStr),

    /// Two variants of one production share a name.
    #[error("production `{production}` has two variants named `{variant}`")]
    DuplicateVariant { production: SmolStr, variant: SmolStr },

    /// A start production is not part of the grammar.
    #[error("unknown production `{0}`")]
    UnknownProduction(SmolStr),

    /// A pattern is not a valid regular expression.
    #[error("invalid pattern /{pattern}/: {message}")]
    InvalidPattern { pattern: SmolStr, message: String },

    /// A tree builder kind was given the wrong number of children.
    #[error("{kind} node needs exactly one child, got {count}")]
    Arity { kind: &'static str, count: usize },

    /// A tree builder kind was built the wrong way.
    #[error("{kind} must be built as a {expected}")]
    KindMisuse {
        kind: &'static str,
        expected: &'static str,
    },
}

/// Event chains that do not describe a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A `Pop` closes nothing, or a `Push` is never closed.
    #[error("unbalanced node boundaries at event {0}")]
    Unbalanced(usize),

    /// A growth marker survived into a finished chain.
    #[error("left-recursion marker at event {0}")]
    TransientMarker(usize),

    /// The grammar has more variants than tree kinds can represent.
    #[error("variant {0} does not fit in a tree kind")]
    TooManyVariants(u32),
}

fn describe_expected(expected: &[SmolStr]) -> String {
    match expected {
        [] => "unexpected input".to_string(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let init: Vec<&str> = init.iter().map(SmolStr::as_str).collect();
            format!("{} or {}", init.join(", "), last)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_lists_expectations() {
        let error = SyntaxError {
            offset: TextSize::from(4),
            line: 1,
            column: 5,
            expected: vec!["expected `+`".into(), "expected `)`".into()],
        };
        assert_eq!(error.to_string(), "1:5: expected `+` or expected `)`");
        assert_eq!(
            ParseError::Syntax(error).to_string(),
            "syntax error at 1:5: expected `+` or expected `)`"
        );
    }

    #[test]
    fn empty_expectations_read_naturally() {
        let error = MatchError {
            event: 2,
            expected: Vec::new(),
        };
        assert_eq!(error.to_string(), "events do not match at 2: unexpected input");
    }
}
