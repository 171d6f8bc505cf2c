//! Building combinators from a grammar tree.
//!
//! Grammar front ends describe each node of a grammar by its [`Kind`]
//! and either its children or its text, plus where it was written.

use std::fmt;

use crate::combinator::{Combinator, Literal, Pattern};
use crate::error::GrammarError;
use crate::grammar::GrammarBuilder;

/// Where a grammar element was written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SourcePos {
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
    /// Byte offset.
    pub index: u32,
}

impl SourcePos {
    #[must_use]
    pub const fn new(line: u32, column: u32, index: u32) -> Self {
        Self {
            line,
            column,
            index,
        }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The kinds of grammar tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Ordered choice between the children.
    Alternation,
    /// The children in order.
    Sequence,
    /// The only child, or nothing.
    Optional,
    /// The only child, any number of times.
    Repeated,
    /// Passes when the only child does not match here.
    NegativeLookahead,
    /// Fixed text.
    Literal,
    /// A regular expression for leaf content.
    Pattern,
    /// A named production.
    Reference,
}

impl Kind {
    /// Returns the lowercase name of the kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Alternation => "alternation",
            Self::Sequence => "sequence",
            Self::Optional => "optional",
            Self::Repeated => "repeated",
            Self::NegativeLookahead => "negative lookahead",
            Self::Literal => "literal",
            Self::Pattern => "pattern",
            Self::Reference => "reference",
        }
    }

    /// Returns `true` for kinds built from text rather than children.
    #[must_use]
    pub fn is_leaf(self) -> bool {
        matches!(self, Self::Literal | Self::Pattern | Self::Reference)
    }
}

impl GrammarBuilder {
    /// Builds an interior node from its children.
    pub fn node(&mut self, kind: Kind, mut children: Vec<Combinator>) -> Result<Combinator, GrammarError> {
        let single = |children: &mut Vec<Combinator>| match children.len() {
            1 => children.pop().ok_or(GrammarError::Arity {
                kind: kind.name(),
                count: 0,
            }),
            count => Err(GrammarError::Arity {
                kind: kind.name(),
                count,
            }),
        };
        Ok(match kind {
            Kind::Alternation => Combinator::alternation(children),
            Kind::Sequence => Combinator::concatenation(children),
            Kind::Optional => Combinator::optional(single(&mut children)?),
            Kind::Repeated => Combinator::repetition(single(&mut children)?),
            Kind::NegativeLookahead => Combinator::negative_lookahead(single(&mut children)?),
            Kind::Literal | Kind::Pattern | Kind::Reference => {
                return Err(GrammarError::KindMisuse {
                    kind: kind.name(),
                    expected: "leaf",
                });
            }
        })
    }

    /// Builds a leaf from its text. Literals built here are checked for
    /// merge hazards.
    pub fn leaf(&mut self, kind: Kind, text: &str, pos: SourcePos) -> Result<Combinator, GrammarError> {
        match kind {
            Kind::Literal => Ok(Literal::combinator(text, false, pos)),
            Kind::Pattern => Ok(Combinator::Pattern(Pattern::new(text)?)),
            Kind::Reference => Ok(self.reference(text)),
            _ => Err(GrammarError::KindMisuse {
                kind: kind.name(),
                expected: "node",
            }),
        }
    }

    /// Builds a literal whose matches are never rejected as merge hazards.
    pub fn unguarded_literal(&mut self, text: &str, pos: SourcePos) -> Combinator {
        Literal::combinator(text, true, pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_check_their_arity() {
        let mut builder = GrammarBuilder::new();
        let a = builder.leaf(Kind::Literal, "a", SourcePos::default()).unwrap();
        let b = builder.leaf(Kind::Literal, "b", SourcePos::default()).unwrap();
        assert_eq!(
            builder.node(Kind::Optional, vec![a.clone(), b]).unwrap_err(),
            GrammarError::Arity {
                kind: "optional",
                count: 2
            }
        );
        assert!(matches!(
            builder.node(Kind::Repeated, vec![a]),
            Ok(Combinator::Repetition(_))
        ));
        assert_eq!(
            builder.node(Kind::NegativeLookahead, Vec::new()).unwrap_err(),
            GrammarError::Arity {
                kind: "negative lookahead",
                count: 0
            }
        );
    }

    #[test]
    fn leaves_and_nodes_are_not_interchangeable() {
        let mut builder = GrammarBuilder::new();
        assert!(matches!(
            builder.node(Kind::Literal, Vec::new()),
            Err(GrammarError::KindMisuse { .. })
        ));
        assert!(matches!(
            builder.leaf(Kind::Sequence, "x", SourcePos::default()),
            Err(GrammarError::KindMisuse { .. })
        ));
    }

    #[test]
    fn literal_leaves_remember_their_position() {
        let mut builder = GrammarBuilder::new();
        let pos = SourcePos::new(3, 7, 40);
        let Combinator::Literal(literal) = builder.leaf(Kind::Literal, "new", pos).unwrap() else {
            panic!("expected a literal");
        };
        assert_eq!(literal.pos(), pos);
        assert!(!literal.ignores_merge_hazards());

        let Combinator::Literal(unguarded) = builder.unguarded_literal("-", pos) else {
            panic!("expected a literal");
        };
        assert!(unguarded.ignores_merge_hazards());
        assert!(unguarded.guard().is_none());
    }

    #[test]
    fn empty_literals_match_nothing() {
        let mut builder = GrammarBuilder::new();
        assert!(matches!(
            builder.leaf(Kind::Literal, "", SourcePos::default()),
            Ok(Combinator::Empty)
        ));
    }
}
