mod common;
use common::*;

#[test]
fn ordered_choice_commits_to_the_first_success() {
    let grammar = grammar(
        r#"
        S := First: A | Second: B ;
        A := "x" ;
        B := "x" ;
        "#,
    );
    let a = grammar.lookup("A").unwrap();
    let b = grammar.lookup("B").unwrap();
    for memoize in [true, false] {
        let options = ParseOptions {
            memoize,
            ..ParseOptions::default()
        };
        let parsed = grammar
            .entry("S")
            .unwrap()
            .with_options(options)
            .complete()
            .parse("x")
            .unwrap();
        assert_eq!(render_compact(&grammar, parsed.events()), r#"(First (V0 "x"))"#);
        assert_eq!(parsed.profile().entered(a), 1);
        assert_eq!(parsed.profile().entered(b), 0);
    }
}

#[test]
fn negative_lookahead_consumes_nothing() {
    let grammar = grammar(r#"Pair := P: !"a" /[a-z]/ /[a-z]/ ;"#);
    assert_eq!(compact(&grammar, "Pair", "bc"), r#"(P "b" "c")"#);
    // the guard on "a" treats the following letter as part of a word
    assert_eq!(compact(&grammar, "Pair", "ac"), r#"(P "a" "c")"#);

    let err = grammar.entry("Pair").unwrap().complete().parse("a c").unwrap_err();
    assert_eq!(err.to_string(), r#"syntax error at 1:1: unexpected "a""#);
}

#[test]
fn negative_lookahead_respects_word_boundaries() {
    let grammar = grammar(r#"Word := Plain: !"if" /[a-z]+/ ;"#);
    assert_eq!(compact(&grammar, "Word", "iffy"), r#"(Plain "iffy")"#);
    assert!(grammar.entry("Word").unwrap().parse("if").is_err());
}

#[test]
fn repetition_of_a_nullable_body_terminates() {
    let grammar = grammar(r#"List := Items: "[" {[","]} "]" ;"#);
    assert_eq!(compact(&grammar, "List", "[]"), r#"(Items "[" "]")"#);
    assert_eq!(compact(&grammar, "List", "[ , ,]"), r#"(Items "[" "," "," "]")"#);
}

#[test]
fn optional_parts_may_be_absent() {
    let grammar = grammar(
        r#"
        Decl := Let: "let" Name [":" Name] ";" ;
        Name := /[a-z]+/ ;
        "#,
    );
    assert_eq!(
        compact(&grammar, "Decl", "let x;"),
        r#"(Let "let" (V0 "x") ";")"#
    );
    assert_eq!(
        compact(&grammar, "Decl", "let x: int;"),
        r#"(Let "let" (V0 "x") ":" (V0 "int") ";")"#
    );
}

#[test]
fn literal_separated_by_space_is_not_a_hazard() {
    let grammar = grammar(ARITH);
    assert_eq!(
        compact(&grammar, "Expr", "1 - -2"),
        r#"(Minus (Term (Atom (Num "1"))) "-" (Atom (Neg "-" (Num "2"))))"#
    );
    assert_eq!(roundtrip(&grammar, "Expr", "1 - -2"), "1- -2");
}

#[test]
fn longer_punctuation_wins() {
    let grammar = grammar(ARITH);
    assert_eq!(
        compact(&grammar, "Expr", "--x"),
        r#"(Term (Atom (Dec "--" (Name "x"))))"#
    );
    assert!(grammar.entry("Expr").unwrap().complete().parse("1--2").is_err());
}

#[test]
fn split_punctuation_is_a_hazard() {
    let grammar = grammar(
        r#"
        Twice := Two: "-" "-" ;
        Once := Dec: "--" ;
        "#,
    );
    let twice = grammar.entry("Twice").unwrap().complete();
    assert!(twice.parse("--").is_err());
    assert_eq!(
        render_compact(&grammar, twice.parse("- -").unwrap().events()),
        r#"(Two "-" "-")"#
    );
    assert_eq!(compact(&grammar, "Once", "--"), r#"(Dec "--")"#);
    assert_eq!(roundtrip(&grammar, "Twice", "- -"), "- -");
}

#[test]
fn unguarded_literals_ignore_hazards() {
    let grammar = grammar(
        r#"
        Twice := Two: '-' '-' ;
        Once := Dec: "--" ;
        "#,
    );
    assert_eq!(compact(&grammar, "Twice", "--"), r#"(Two "-" "-")"#);
}

#[test]
fn keywords_do_not_match_word_prefixes() {
    let grammar = grammar(
        r#"
        Stmt := New: "new" Name | Bare: Name ;
        Name := /[a-z]+/ ;
        "#,
    );
    assert_eq!(compact(&grammar, "Stmt", "newer"), r#"(Bare (V0 "newer"))"#);
    assert_eq!(compact(&grammar, "Stmt", "new x"), r#"(New "new" (V0 "x"))"#);
    assert_eq!(roundtrip(&grammar, "Stmt", "new   x"), "new x");
}
