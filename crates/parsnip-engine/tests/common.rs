//! Shared grammars and helpers for engine tests.
#![allow(dead_code, unused_imports)]

pub use parsnip_engine::event::{render_compact, render_events};
pub use parsnip_engine::notation::{parse_grammar, parse_grammar_with};
pub use parsnip_engine::{Event, Grammar, ParseOptions, Parsed};

/// Left-recursive arithmetic with two levels of precedence.
pub const ARITH: &str = r#"
# additive level
Expr := Plus: Expr "+" Term
      | Minus: Expr "-" Term
      | Term: Term ;

# multiplicative level
Term := Times: Term "*" Atom
      | Atom: Atom ;

Atom := Num: /[0-9]+/
      | Name: /[a-z]+/
      | Dec: "--" Atom
      | Neg: "-" Atom
      | Paren: "(" Expr ")" ;

Pair := Both: Expr "," Expr ;
"#;

pub fn grammar(source: &str) -> Grammar {
    parse_grammar(source).unwrap_or_else(|err| panic!("bad test grammar: {err}"))
}

/// Parses all of `text` from `start`.
pub fn parse(grammar: &Grammar, start: &str, text: &str) -> Parsed {
    grammar
        .entry(start)
        .unwrap()
        .complete()
        .parse(text)
        .unwrap_or_else(|err| panic!("{text:?}: {err}"))
}

/// The parse tree of `text` as a one-line s-expression.
pub fn compact(grammar: &Grammar, start: &str, text: &str) -> String {
    render_compact(grammar, parse(grammar, start, text).events())
}

/// The parse tree of `text` as an indented outline.
pub fn outline(grammar: &Grammar, start: &str, text: &str) -> String {
    render_events(grammar, parse(grammar, start, text).events())
        .trim_end()
        .to_string()
}

/// Parses `text`, unparses the result, and checks that the regenerated
/// text parses to the same events.
pub fn roundtrip(grammar: &Grammar, start: &str, text: &str) -> String {
    let parsed = parse(grammar, start, text);
    let entry = grammar.entry(start).unwrap().complete();
    let regenerated = entry
        .unparse(parsed.events())
        .unwrap_or_else(|err| panic!("{text:?}: {err}"));
    let reparsed = parse(grammar, start, &regenerated);
    assert_eq!(reparsed.events(), parsed.events(), "{text:?} -> {regenerated:?}");
    regenerated
}
