mod common;
use common::*;

#[test]
fn sums_associate_to_the_left() {
    let grammar = grammar(ARITH);
    insta::assert_snapshot!(outline(&grammar, "Expr", "1+2+3"), @r###"
    Expr.Plus
      Expr.Plus
        Expr.Term
          Term.Atom
            Atom.Num
              content "1"
        token "+"
        Term.Atom
          Atom.Num
            content "2"
      token "+"
      Term.Atom
        Atom.Num
          content "3"
    "###);
    assert_eq!(roundtrip(&grammar, "Expr", "1+2+3"), "1+2+3");
}

#[test]
fn repeated_suffixes_nest_to_the_left() {
    let grammar = grammar(r#"P := Grow: P "!" | Base: "b" ;"#);
    assert_eq!(
        compact(&grammar, "P", "b!!!"),
        r#"(Grow (Grow (Grow (Base "b") "!") "!") "!")"#
    );
}

#[test]
fn growth_layers_keep_their_own_variant() {
    let grammar = grammar(ARITH);
    assert_eq!(
        compact(&grammar, "Expr", "1+2*3-4"),
        r#"(Minus (Plus (Term (Atom (Num "1"))) "+" (Times (Atom (Num "2")) "*" (Num "3"))) "-" (Atom (Num "4")))"#
    );
}

#[test]
fn left_recursion_nests_inside_parentheses() {
    let grammar = grammar(ARITH);
    assert_eq!(
        compact(&grammar, "Expr", "(1+2)*3"),
        r#"(Term (Times (Atom (Paren "(" (Plus (Term (Atom (Num "1"))) "+" (Atom (Num "2"))) ")")) "*" (Num "3")))"#
    );
}

#[test]
fn sibling_growths_do_not_interfere() {
    let grammar = grammar(ARITH);
    assert_eq!(
        compact(&grammar, "Pair", "1+2,3-4+5"),
        concat!(
            r#"(Both (Plus (Term (Atom (Num "1"))) "+" (Atom (Num "2"))) ","#,
            r#" (Plus (Minus (Term (Atom (Num "3"))) "-" (Atom (Num "4"))) "+" (Atom (Num "5"))))"#,
        )
    );
}

#[test]
fn indirect_left_recursion() {
    let grammar = grammar(
        r#"
        Call := Apply: Callee "(" ")" | Name: /[a-z]+/ ;
        Callee := Target: Call ;
        "#,
    );
    let call = grammar.production(grammar.lookup("Call").unwrap());
    let callee = grammar.production(grammar.lookup("Callee").unwrap());
    assert!(call.is_left_recursive());
    assert!(callee.is_left_recursive());

    assert_eq!(
        compact(&grammar, "Call", "f()()"),
        r#"(Apply (Target (Apply (Target (Name "f")) "(" ")")) "(" ")")"#
    );
    assert_eq!(roundtrip(&grammar, "Call", "f ( ) ( )"), "f()()");
}

#[test]
fn long_chains_terminate() {
    let grammar = grammar(ARITH);
    let text = vec!["1"; 300].join("+");
    let parsed = parse(&grammar, "Expr", &text);
    let plus = grammar.lookup_variant("Expr.Plus").unwrap();
    let depth = parsed
        .events()
        .iter()
        .filter(|event| **event == Event::Push(plus))
        .count();
    assert_eq!(depth, 299);
    assert!(parsed.events().iter().all(|event| !event.is_growth_marker()));
    assert_eq!(roundtrip(&grammar, "Expr", &text), text);
}

#[test]
fn growth_stops_at_the_longest_parse() {
    let grammar = grammar(ARITH);
    let entry = grammar.entry("Expr").unwrap();
    let parsed = entry.parse("1+2 )").unwrap();
    assert_eq!(parsed.end(), 4);
    assert_eq!(
        render_compact(&grammar, parsed.events()),
        r#"(Plus (Term (Atom (Num "1"))) "+" (Atom (Num "2")))"#
    );
}
