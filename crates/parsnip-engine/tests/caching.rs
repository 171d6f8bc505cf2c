mod common;
use common::*;

use parsnip_engine::CacheStats;

const SHARED_PREFIX: &str = r#"
S := Bang: Item "!" | Query: Item "?" ;
Item := /[a-z]+/ ;
"#;

fn parse_with(grammar: &Grammar, start: &str, text: &str, options: ParseOptions) -> Parsed {
    grammar
        .entry(start)
        .unwrap()
        .with_options(options)
        .complete()
        .parse(text)
        .unwrap_or_else(|err| panic!("{text:?}: {err}"))
}

#[test]
fn second_alternative_reuses_the_shared_prefix() {
    let grammar = grammar(SHARED_PREFIX);
    let item = grammar.lookup("Item").unwrap();

    let parsed = parse_with(&grammar, "S", "x?", ParseOptions::default());
    assert_eq!(parsed.profile().entered(item), 1);
    assert_eq!(
        parsed.cache_stats(),
        CacheStats {
            hits: 1,
            misses: 2,
            stores: 2,
        }
    );
}

#[test]
fn without_memoization_the_prefix_is_parsed_twice() {
    let grammar = grammar(SHARED_PREFIX);
    let item = grammar.lookup("Item").unwrap();
    let options = ParseOptions {
        memoize: false,
        ..ParseOptions::default()
    };

    let parsed = parse_with(&grammar, "S", "x?", options);
    assert_eq!(parsed.profile().entered(item), 2);
    assert_eq!(parsed.cache_stats(), CacheStats::default());
}

#[test]
fn options_never_change_the_result() {
    let grammar = grammar(ARITH);
    let inputs = [
        "1",
        "1+2+3",
        "1+2*3-4",
        "(1+2)*(3-x)",
        "--a - -b * c",
        "((((1))))+2",
    ];
    let variants = [
        ParseOptions {
            memoize: false,
            lookahead_pruning: true,
        },
        ParseOptions {
            memoize: true,
            lookahead_pruning: false,
        },
        ParseOptions {
            memoize: false,
            lookahead_pruning: false,
        },
    ];
    for text in inputs {
        let expected = parse_with(&grammar, "Expr", text, ParseOptions::default());
        for options in variants {
            let parsed = parse_with(&grammar, "Expr", text, options);
            assert_eq!(parsed.events(), expected.events(), "{text:?} with {options:?}");
            assert_eq!(parsed.end(), expected.end());
        }
    }
}

#[test]
fn profile_report_is_sorted_by_count() {
    let grammar = grammar(SHARED_PREFIX);
    let options = ParseOptions {
        memoize: false,
        ..ParseOptions::default()
    };
    let parsed = parse_with(&grammar, "S", "x?", options);
    let report = parsed.profile().report(&grammar);
    let names: Vec<(&str, u64)> = report
        .iter()
        .map(|entry| (entry.production.as_str(), entry.entered))
        .collect();
    assert_eq!(names, vec![("Item", 2), ("S", 1)]);
}
