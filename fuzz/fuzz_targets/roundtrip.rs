#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use parsnip_engine::notation::parse_grammar;
use parsnip_engine::{Grammar, ParseError, ParseOptions};

const MAX_SOURCE_BYTES: usize = 4096;

const GRAMMAR: &str = r#"
Stmt := Let: "let" Name "=" Expr ";"
      | Bare: Expr ";" ;
Expr := Plus: Expr "+" Term
      | Minus: Expr "-" Term
      | Term: Term ;
Term := Times: Term "*" Unary
      | Unary: Unary ;
Unary := Dec: "--" Unary
       | Neg: "-" Unary
       | Not: "!" Unary
       | Call: Call ;
Call := Apply: Call "(" [Expr {"," Expr}] ")"
      | Atom: Atom ;
Atom := Num: /[0-9]+/
      | Ref: Name
      | Paren: "(" Expr ")" ;
Name := Id: /[a-z_][a-z0-9_]*/ ;
Program := Stmts: {Stmt} ;
"#;

fn grammar() -> &'static Grammar {
    static GRAMMAR_CELL: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR_CELL.get_or_init(|| parse_grammar(GRAMMAR).expect("fuzz grammar compiles"))
}

fn decode_source(bytes: &[u8]) -> String {
    let capped = &bytes[..bytes.len().min(MAX_SOURCE_BYTES)];
    String::from_utf8_lossy(capped).into_owned()
}

fuzz_target!(|data: &[u8]| {
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };
    let options = ParseOptions {
        memoize: flags & 1 == 0,
        lookahead_pruning: flags & 2 == 0,
    };
    let source = decode_source(rest);
    let grammar = grammar();
    let entry = grammar
        .entry("Program")
        .expect("entry exists")
        .with_options(options)
        .complete();

    let parsed = match entry.parse(&source) {
        Ok(parsed) => parsed,
        Err(ParseError::Syntax(_)) => return,
        Err(err @ ParseError::Invariant(_)) => panic!("{err}"),
    };
    assert_eq!(entry.match_events(parsed.events()), Ok(parsed.events().len()));

    let regenerated = entry.unparse(parsed.events()).expect("parsed events unparse");
    let reparsed = entry.parse(&regenerated).expect("regenerated text parses");
    assert_eq!(reparsed.events(), parsed.events(), "{source:?} -> {regenerated:?}");
});
