mod common;
use common::*;

use parsnip_engine::syntax::{build_tree, tree_events, SyntaxKind, SyntaxNode};
use parsnip_engine::TreeError;

fn kind_name(grammar: &Grammar, kind: SyntaxKind) -> String {
    match kind.variant() {
        Some(variant) => grammar.variant_path(variant).to_string(),
        None => format!("{kind:?}"),
    }
}

fn format_node(grammar: &Grammar, node: &SyntaxNode, out: &mut String, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!(
        "{}{}@{:?}\n",
        indent,
        kind_name(grammar, node.kind()),
        node.text_range()
    ));
    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Node(n) => format_node(grammar, &n, out, depth + 1),
            rowan::NodeOrToken::Token(t) => out.push_str(&format!(
                "{}{:?}@{:?} {:?}\n",
                "  ".repeat(depth + 1),
                t.kind(),
                t.text_range(),
                t.text()
            )),
        }
    }
}

fn snapshot_tree(grammar: &Grammar, start: &str, text: &str) -> String {
    let parsed = parse(grammar, start, text);
    let root = SyntaxNode::new_root(build_tree(parsed.events()).unwrap());
    let mut out = String::new();
    format_node(grammar, &root, &mut out, 0);
    out.trim_end().to_string()
}

#[test]
fn tree_covers_the_tokens() {
    let grammar = grammar(ARITH);
    insta::assert_snapshot!(snapshot_tree(&grammar, "Expr", "1 + 2"), @r###"
    Root@0..3
      Expr.Plus@0..3
        Expr.Term@0..1
          Term.Atom@0..1
            Atom.Num@0..1
              Content@0..1 "1"
        Token@1..2 "+"
        Term.Atom@2..3
          Atom.Num@2..3
            Content@2..3 "2"
    "###);
}

#[test]
fn tree_events_feed_the_unparser() {
    let grammar = grammar(ARITH);
    let parsed = parse(&grammar, "Expr", "(a - 1) * -b");
    let root = SyntaxNode::new_root(build_tree(parsed.events()).unwrap());
    let events = tree_events(&root);
    assert_eq!(events, parsed.events());
    let entry = grammar.entry("Expr").unwrap().complete();
    assert_eq!(entry.unparse(&events).unwrap(), "(a-1)*-b");
}

#[test]
fn unbalanced_chains_have_no_tree() {
    let mut events = parse(&grammar(ARITH), "Expr", "1").into_events();
    events.pop();
    assert_eq!(build_tree(&events), Err(TreeError::Unbalanced(events.len())));
}
