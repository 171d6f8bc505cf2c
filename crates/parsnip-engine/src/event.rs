//! Parser events.
//!
//! Parsing produces a flat stream of events that describes a tree without
//! building one: `Push`/`Pop` bracket a node, `Token` and `Content` are its
//! leaves. Unparsing and matching consume the same stream.

use std::fmt::Write as _;

use smol_str::SmolStr;

use crate::grammar::{Grammar, ProductionId, VariantId};

/// An event produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    /// Begin a node of the given variant.
    Push(VariantId),
    /// End the most recently pushed node.
    Pop,
    /// A literal match: punctuation, keyword, or other fixed text.
    Token(SmolStr),
    /// Leaf content such as identifier text or a literal value.
    Content(SmolStr),
    /// Start of one left-recursion growth step. Never survives in a
    /// finished chain.
    LrStart,
    /// Marks where a growing production referred to itself. Never survives
    /// in a finished chain.
    LrEnd(ProductionId),
}

impl Event {
    /// Creates a token event.
    #[must_use]
    pub fn token(text: impl Into<SmolStr>) -> Self {
        Self::Token(text.into())
    }

    /// Creates a content event.
    #[must_use]
    pub fn content(text: impl Into<SmolStr>) -> Self {
        Self::Content(text.into())
    }

    /// Returns `true` for the transient left-recursion markers.
    #[must_use]
    pub fn is_growth_marker(&self) -> bool {
        matches!(self, Self::LrStart | Self::LrEnd(_))
    }

    /// Returns the text of a token or content event.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Token(text) | Self::Content(text) => Some(text),
            _ => None,
        }
    }
}

/// Renders events as an indented outline, one event per line.
///
/// `Pop` events close the current indentation level and are not printed.
#[must_use]
pub fn render_events<'e, I>(grammar: &Grammar, events: I) -> String
where
    I: IntoIterator<Item = &'e Event>,
{
    let mut out = String::new();
    let mut depth = 0usize;
    for event in events {
        if *event == Event::Pop {
            depth = depth.saturating_sub(1);
            continue;
        }
        let indent = "  ".repeat(depth);
        let _ = match event {
            Event::Push(variant) => {
                depth += 1;
                writeln!(out, "{indent}{}", grammar.variant_path(*variant))
            }
            Event::Token(text) => writeln!(out, "{indent}token {text:?}"),
            Event::Content(text) => writeln!(out, "{indent}content {text:?}"),
            Event::LrStart => writeln!(out, "{indent}lr-start"),
            Event::LrEnd(production) => {
                writeln!(out, "{indent}lr-end {}", grammar.production(*production).name())
            }
            Event::Pop => Ok(()),
        };
    }
    out
}

/// Renders events as a one-line s-expression keyed by variant name.
///
/// Token and content text is quoted, so `1+2` parsed by a left-recursive
/// sum reads `(Plus (Num "1") "+" (Num "2"))`.
#[must_use]
pub fn render_compact<'e, I>(grammar: &Grammar, events: I) -> String
where
    I: IntoIterator<Item = &'e Event>,
{
    let mut out = String::new();
    for event in events {
        if *event == Event::Pop {
            out.push(')');
            continue;
        }
        if !out.is_empty() && !out.ends_with('(') {
            out.push(' ');
        }
        let _ = match event {
            Event::Push(variant) => write!(out, "({}", grammar.variant(*variant).name()),
            Event::Token(text) | Event::Content(text) => write!(out, "{text:?}"),
            Event::LrStart => write!(out, "lr-start"),
            Event::LrEnd(production) => {
                write!(out, "lr-end:{}", grammar.production(*production).name())
            }
            Event::Pop => Ok(()),
        };
    }
    out
}
