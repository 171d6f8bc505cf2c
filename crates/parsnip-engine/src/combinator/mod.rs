//! The grammar algebra.
//!
//! A grammar is a tree of [`Combinator`]s hanging off named productions.
//! Every combinator can parse text into events, unparse events into text,
//! and match events against its shape. Only [`Combinator::Reference`]
//! carries real machinery (caching and left recursion); the rest thread
//! state through their children.

mod alternation;
mod concatenation;
mod literal;
mod lookahead;
mod lr_rewriter;
mod pattern;
mod reference;
mod repetition;

use std::fmt::{self, Write as _};

use rustc_hash::FxHashSet;

pub use literal::Literal;
pub use pattern::Pattern;

use crate::context::{MatchContext, ParseContext, SerialContext};
use crate::error::InvariantViolation;
use crate::grammar::{Grammar, ProductionId};
use crate::lookahead::CharSet;
use crate::state::{MatchState, ParseState, SerialState};

/// A node of the grammar algebra.
#[derive(Debug, Clone)]
pub enum Combinator {
    /// Matches the empty string.
    Empty,
    /// Matches fixed text and produces a `Token` event.
    Literal(Literal),
    /// Matches a regular expression and produces a `Content` event.
    Pattern(Pattern),
    /// Matches each child in order.
    Concatenation(Vec<Combinator>),
    /// Commits to the first child that matches.
    Alternation(Vec<Arm>),
    /// Matches its body zero or more times.
    Repetition(Box<Combinator>),
    /// Succeeds, consuming nothing, when its body does not match.
    Lookahead(Box<Combinator>),
    /// Delegates to a named production.
    Reference(ProductionId),
}

/// One alternative of an [`Combinator::Alternation`], with the characters
/// that can start it once the grammar is built.
#[derive(Debug, Clone)]
pub struct Arm {
    pub(crate) body: Combinator,
    pub(crate) lookahead1: Option<CharSet>,
}

impl Arm {
    pub(crate) fn new(body: Combinator) -> Self {
        Self {
            body,
            lookahead1: None,
        }
    }

    /// Returns the alternative.
    #[must_use]
    pub fn body(&self) -> &Combinator {
        &self.body
    }

    /// Returns the characters that can start this alternative, if known.
    #[must_use]
    pub fn lookahead1(&self) -> Option<&CharSet> {
        self.lookahead1.as_ref()
    }
}

/// Productions whose left-recursion exclusion was hit while deriving a
/// result.
pub(crate) type Exclusions = FxHashSet<ProductionId>;

/// How a parse attempt ended.
#[derive(Debug)]
pub(crate) enum Synopsis {
    Success(ParseState),
    Failure,
    /// Failed because a seeding production referred to itself. Says nothing
    /// about the input at this position, so it is never cached.
    FailureDueToLrExclusion,
}

#[derive(Debug)]
pub(crate) struct ParseResult {
    pub(crate) synopsis: Synopsis,
    pub(crate) lr_exclusions_triggered: Exclusions,
}

impl ParseResult {
    pub(crate) fn success(state: ParseState) -> Self {
        Self::new(Synopsis::Success(state), Exclusions::default())
    }

    pub(crate) fn failure() -> Self {
        Self::new(Synopsis::Failure, Exclusions::default())
    }

    pub(crate) fn new(synopsis: Synopsis, lr_exclusions_triggered: Exclusions) -> Self {
        Self {
            synopsis,
            lr_exclusions_triggered,
        }
    }
}

pub(crate) type Attempt = Result<ParseResult, InvariantViolation>;

impl Combinator {
    /// Sequence of `children`, flattened when there is at most one.
    #[must_use]
    pub fn concatenation(mut children: Vec<Combinator>) -> Self {
        match children.len() {
            0 => Self::Empty,
            1 => children.pop().unwrap_or(Self::Empty),
            _ => Self::Concatenation(children),
        }
    }

    /// Ordered choice between `children`.
    #[must_use]
    pub fn alternation(mut children: Vec<Combinator>) -> Self {
        if children.len() == 1 {
            return children.pop().unwrap_or(Self::Empty);
        }
        Self::Alternation(children.into_iter().map(Arm::new).collect())
    }

    /// `body` or nothing.
    #[must_use]
    pub fn optional(body: Combinator) -> Self {
        Self::alternation(vec![body, Self::Empty])
    }

    /// `body` zero or more times.
    #[must_use]
    pub fn repetition(body: Combinator) -> Self {
        Self::Repetition(Box::new(body))
    }

    /// Passes, consuming nothing, when `body` fails.
    #[must_use]
    pub fn negative_lookahead(body: Combinator) -> Self {
        Self::Lookahead(Box::new(body))
    }

    /// Literal text with merge hazard checks.
    #[must_use]
    pub fn literal(text: &str) -> Self {
        Literal::combinator(text, false, Default::default())
    }

    pub(crate) fn parse(&self, state: ParseState, cx: &mut ParseContext<'_>) -> Attempt {
        match self {
            Self::Empty => Ok(ParseResult::success(state)),
            Self::Literal(literal) => Ok(literal.parse(state, cx)),
            Self::Pattern(pattern) => Ok(pattern.parse(state, cx)),
            Self::Concatenation(children) => concatenation::parse(children, state, cx),
            Self::Alternation(arms) => alternation::parse(arms, state, cx),
            Self::Repetition(body) => repetition::parse(body, state, cx),
            Self::Lookahead(body) => lookahead::parse(body, state, cx),
            Self::Reference(production) => reference::parse(*production, state, cx),
        }
    }

    pub(crate) fn unparse(
        &self,
        state: SerialState,
        cx: &mut SerialContext<'_>,
    ) -> Option<SerialState> {
        match self {
            Self::Empty => Some(state),
            Self::Literal(literal) => literal.unparse(state, cx),
            Self::Pattern(pattern) => pattern.unparse(state, cx),
            Self::Concatenation(children) => concatenation::unparse(children, state, cx),
            Self::Alternation(arms) => alternation::unparse(arms, state, cx),
            Self::Repetition(body) => repetition::unparse(body, state, cx),
            Self::Lookahead(_) => Some(state),
            Self::Reference(production) => reference::unparse(*production, state, cx),
        }
    }

    pub(crate) fn match_events(
        &self,
        state: MatchState,
        cx: &mut MatchContext<'_>,
    ) -> Option<MatchState> {
        match self {
            Self::Empty => Some(state),
            Self::Literal(literal) => literal.match_events(state, cx),
            Self::Pattern(pattern) => pattern.match_events(state, cx),
            Self::Concatenation(children) => concatenation::match_events(children, state, cx),
            Self::Alternation(arms) => alternation::match_events(arms, state, cx),
            Self::Repetition(body) => repetition::match_events(body, state, cx),
            Self::Lookahead(body) => lookahead::match_events(body, state, cx),
            Self::Reference(production) => reference::match_events(*production, state, cx),
        }
    }

    /// Formats this combinator in grammar notation, naming productions
    /// from `grammar`.
    #[must_use]
    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> impl fmt::Display + 'a {
        Notation {
            combinator: self,
            grammar,
        }
    }
}

struct Notation<'a> {
    combinator: &'a Combinator,
    grammar: &'a Grammar,
}

impl Notation<'_> {
    fn child<'b>(&'b self, combinator: &'b Combinator) -> Notation<'b> {
        Notation {
            combinator,
            grammar: self.grammar,
        }
    }
}

impl fmt::Display for Notation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.combinator {
            Combinator::Empty => f.write_str("()"),
            Combinator::Literal(literal) => {
                let quote = if literal.ignores_merge_hazards() { '\'' } else { '"' };
                write_quoted(f, literal.text(), quote)
            }
            Combinator::Pattern(pattern) => write!(f, "/{}/", pattern.source().replace('/', "\\/")),
            Combinator::Concatenation(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", self.child(child))?;
                }
                Ok(())
            }
            Combinator::Alternation(arms) => match arms.as_slice() {
                [only, Arm {
                    body: Combinator::Empty,
                    ..
                }] => write!(f, "[{}]", self.child(&only.body)),
                _ => {
                    f.write_str("(")?;
                    for (i, arm) in arms.iter().enumerate() {
                        if i > 0 {
                            f.write_str(" | ")?;
                        }
                        write!(f, "{}", self.child(&arm.body))?;
                    }
                    f.write_str(")")
                }
            },
            Combinator::Repetition(body) => write!(f, "{{{}}}", self.child(body)),
            Combinator::Lookahead(body) => match **body {
                Combinator::Concatenation(_) => write!(f, "!({})", self.child(body)),
                _ => write!(f, "!{}", self.child(body)),
            },
            Combinator::Reference(production) => {
                f.write_str(self.grammar.production(*production).name())
            }
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str, quote: char) -> fmt::Result {
    f.write_char(quote)?;
    for ch in text.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            ch if ch == quote => {
                f.write_char('\\')?;
                f.write_char(ch)?;
            }
            ch => f.write_char(ch)?,
        }
    }
    f.write_char(quote)
}
