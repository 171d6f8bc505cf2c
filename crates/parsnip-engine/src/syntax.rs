//! `rowan` syntax trees built from event chains.
//!
//! Variants become node kinds and `Token`/`Content` events become tokens.
//! Ignorable text is not part of the event chain, so the tree's text is
//! the tokens run together.

use rowan::{GreenNode, GreenNodeBuilder, NodeOrToken, WalkEvent};

use crate::error::TreeError;
use crate::event::Event;
use crate::grammar::VariantId;

const FIRST_NODE_KIND: u16 = 3;

/// Node and token kinds of a grammar's syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyntaxKind {
    /// Wraps the whole tree.
    Root,
    /// Text of a `Token` event.
    Token,
    /// Text of a `Content` event.
    Content,
    /// A node of the given variant.
    Node(VariantId),
}

impl SyntaxKind {
    fn try_to_raw(self) -> Option<rowan::SyntaxKind> {
        let raw = match self {
            Self::Root => 0,
            Self::Token => 1,
            Self::Content => 2,
            Self::Node(variant) => {
                u16::try_from(variant.raw()).ok()?.checked_add(FIRST_NODE_KIND)?
            }
        };
        Some(rowan::SyntaxKind(raw))
    }

    /// Returns the variant of a node kind.
    #[must_use]
    pub fn variant(self) -> Option<VariantId> {
        match self {
            Self::Node(variant) => Some(variant),
            _ => None,
        }
    }
}

/// The `rowan` language of grammar-driven trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GrammarLanguage {}

impl rowan::Language for GrammarLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            0 => SyntaxKind::Root,
            1 => SyntaxKind::Token,
            2 => SyntaxKind::Content,
            n => SyntaxKind::Node(VariantId::from_raw(u32::from(n - FIRST_NODE_KIND))),
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        // Trees are only built through `build_tree`, which rejects kinds
        // without a raw form.
        kind.try_to_raw().unwrap_or(rowan::SyntaxKind(u16::MAX))
    }
}

/// A node in a grammar syntax tree.
pub type SyntaxNode = rowan::SyntaxNode<GrammarLanguage>;

/// A token in a grammar syntax tree.
pub type SyntaxToken = rowan::SyntaxToken<GrammarLanguage>;

/// A node or token in a grammar syntax tree.
pub type SyntaxElement = rowan::SyntaxElement<GrammarLanguage>;

/// Builds a green tree from a finished event chain, under a
/// [`SyntaxKind::Root`] node.
pub fn build_tree(events: &[Event]) -> Result<GreenNode, TreeError> {
    let raw = |kind: SyntaxKind, at: usize| {
        kind.try_to_raw().ok_or_else(|| match kind {
            SyntaxKind::Node(variant) => TreeError::TooManyVariants(variant.raw()),
            _ => TreeError::Unbalanced(at),
        })
    };

    let mut builder = GreenNodeBuilder::new();
    builder.start_node(raw(SyntaxKind::Root, 0)?);
    let mut depth = 0usize;
    for (at, event) in events.iter().enumerate() {
        match event {
            Event::Push(variant) => {
                builder.start_node(raw(SyntaxKind::Node(*variant), at)?);
                depth += 1;
            }
            Event::Pop => {
                if depth == 0 {
                    return Err(TreeError::Unbalanced(at));
                }
                builder.finish_node();
                depth -= 1;
            }
            Event::Token(text) => builder.token(raw(SyntaxKind::Token, at)?, text),
            Event::Content(text) => builder.token(raw(SyntaxKind::Content, at)?, text),
            Event::LrStart | Event::LrEnd(_) => return Err(TreeError::TransientMarker(at)),
        }
    }
    if depth != 0 {
        return Err(TreeError::Unbalanced(events.len()));
    }
    builder.finish_node();
    Ok(builder.finish())
}

/// Walks a tree back into events. The root node itself produces none.
#[must_use]
pub fn tree_events(root: &SyntaxNode) -> Vec<Event> {
    let mut events = Vec::new();
    for step in root.preorder_with_tokens() {
        match step {
            WalkEvent::Enter(NodeOrToken::Node(node)) => {
                if let Some(variant) = node.kind().variant() {
                    events.push(Event::Push(variant));
                }
            }
            WalkEvent::Leave(NodeOrToken::Node(node)) => {
                if node.kind().variant().is_some() {
                    events.push(Event::Pop);
                }
            }
            WalkEvent::Enter(NodeOrToken::Token(token)) => match token.kind() {
                SyntaxKind::Content => events.push(Event::content(token.text())),
                _ => events.push(Event::token(token.text())),
            },
            WalkEvent::Leave(NodeOrToken::Token(_)) => {}
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(raw: u32) -> Event {
        Event::Push(VariantId::from_raw(raw))
    }

    #[test]
    fn tree_and_events_agree() {
        let events = vec![
            node(0),
            node(1),
            Event::content("1"),
            Event::Pop,
            Event::token("+"),
            node(1),
            Event::content("2"),
            Event::Pop,
            Event::Pop,
        ];
        let root = SyntaxNode::new_root(build_tree(&events).unwrap());
        assert_eq!(root.kind(), SyntaxKind::Root);
        assert_eq!(root.text().to_string(), "1+2");

        let sum = root.first_child().unwrap();
        assert_eq!(sum.kind(), SyntaxKind::Node(VariantId::from_raw(0)));
        assert_eq!(sum.children().count(), 2);

        assert_eq!(tree_events(&root), events);
    }

    #[test]
    fn unbalanced_chains_are_rejected() {
        assert_eq!(build_tree(&[Event::Pop]), Err(TreeError::Unbalanced(0)));
        assert_eq!(build_tree(&[node(0)]), Err(TreeError::Unbalanced(1)));
        assert_eq!(
            build_tree(&[node(0), Event::LrStart, Event::Pop]),
            Err(TreeError::TransientMarker(1))
        );
    }

    #[test]
    fn oversized_variants_are_rejected() {
        assert_eq!(
            build_tree(&[node(70_000), Event::Pop]),
            Err(TreeError::TooManyVariants(70_000))
        );
    }
}
