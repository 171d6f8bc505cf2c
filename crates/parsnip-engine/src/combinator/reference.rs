//! Production dispatch.
//!
//! A reference consults the cache, then the left-recursion stack. A fresh
//! entry derives a seed from the first variant that does not immediately
//! recurse; if the seed relied on refusing its own self-reference, the
//! production is grown: each round re-runs the variants at the same offset,
//! with the self-reference standing for the best parse so far, until a
//! round stops moving forward.

use tracing::{debug, trace};

use super::{lr_rewriter, Attempt, Exclusions, ParseResult, Synopsis};
use crate::context::{MatchContext, ParseContext, SerialContext};
use crate::error::InvariantViolation;
use crate::event::Event;
use crate::grammar::ProductionId;
use crate::left_recursion::{Stage, VariantScope};
use crate::lookahead;
use crate::ratpack::CacheEntry;
use crate::state::{MatchState, ParseState, SerialState};

pub(super) fn parse(production: ProductionId, state: ParseState, cx: &mut ParseContext<'_>) -> Attempt {
    let grammar = cx.grammar;
    let name = grammar.production(production).name();
    let index = state.index();

    if cx.options.memoize {
        if let Some(entry) = cx.ratpack.get(production, index) {
            trace!(production = name, index, "cache hit");
            return Ok(entry.replay(&state));
        }
    }
    cx.profile.enter(production);

    match cx.lr.stage(production, index) {
        Stage::Growing { seed_end } => {
            trace!(production = name, index, seed_end, "reusing grown seed");
            let next = state
                .advance_to(seed_end)
                .append_output(Event::LrEnd(production));
            return Ok(ParseResult::new(
                Synopsis::Success(next),
                Exclusions::from_iter([production]),
            ));
        }
        Stage::Seeding => {
            trace!(production = name, index, "left-recursive call while seeding");
            return Ok(ParseResult::new(
                Synopsis::FailureDueToLrExclusion,
                Exclusions::from_iter([production]),
            ));
        }
        Stage::NotOnStack => {}
    }

    trace!(production = name, index, "enter");
    let scope = cx.lr.enter(production, index);
    let outcome = seed_and_grow(production, &state, cx, &scope);
    cx.lr.exit(scope);
    let mut result = outcome?;

    result.lr_exclusions_triggered.remove(&production);
    if matches!(result.synopsis, Synopsis::FailureDueToLrExclusion)
        && result.lr_exclusions_triggered.is_empty()
    {
        result.synopsis = Synopsis::Failure;
    }
    trace!(
        production = name,
        index,
        success = matches!(result.synopsis, Synopsis::Success(_)),
        "exit"
    );

    if cx.options.memoize {
        store(production, &state, &result, cx);
    }
    Ok(result)
}

/// Caches `result` unless it depends on a production that is still
/// resolving its own left recursion.
fn store(production: ProductionId, start: &ParseState, result: &ParseResult, cx: &mut ParseContext<'_>) {
    let pending = result
        .lr_exclusions_triggered
        .iter()
        .any(|other| cx.lr.is_active(*other));
    let entry = match &result.synopsis {
        _ if pending => None,
        Synopsis::Success(end) => {
            let added = end.output().len() - start.output().len();
            let (_, events) = end.output().split_tail(added);
            Some(CacheEntry::Success {
                end: end.index(),
                events: events.into(),
            })
        }
        Synopsis::Failure => Some(CacheEntry::Failure),
        Synopsis::FailureDueToLrExclusion => None,
    };
    match entry {
        Some(entry) => cx.ratpack.store(production, start.index(), entry),
        None => trace!(
            production = cx.grammar.production(production).name(),
            index = start.index(),
            "not cached: depends on an unresolved left recursion"
        ),
    }
}

fn seed_and_grow(
    production: ProductionId,
    state: &ParseState,
    cx: &mut ParseContext<'_>,
    scope: &VariantScope,
) -> Attempt {
    let seed = parse_variants(production, state.clone(), cx, true)?;
    let ParseResult {
        synopsis,
        lr_exclusions_triggered: mut exclusions,
    } = seed;
    let mut best = match synopsis {
        Synopsis::Success(best) if exclusions.contains(&production) => best,
        synopsis => return Ok(ParseResult::new(synopsis, exclusions)),
    };

    let grammar = cx.grammar;
    let name = grammar.production(production).name();
    let start_len = state.output().len();
    debug!(production = name, index = state.index(), seed_end = best.index(), "growing seed");

    for round in 1.. {
        cx.lr.grow(scope, best.index());
        let attempt = state.with_output(best.output().append(Event::LrStart));
        let result = parse_variants(production, attempt, cx, false)?;
        exclusions.extend(result.lr_exclusions_triggered);
        match result.synopsis {
            Synopsis::Success(next) if next.index() < state.index() => {
                return Err(InvariantViolation::GrowthRegressed {
                    production: name.into(),
                    from: state.index(),
                    to: next.index(),
                });
            }
            Synopsis::Success(next) if next.index() > best.index() => {
                debug!(production = name, round, end = next.index(), "grew");
                best = next;
            }
            _ => {
                debug!(production = name, round, end = best.index(), "growth stopped");
                break;
            }
        }
    }

    let output = lr_rewriter::rewrite(grammar, production, best.output(), start_len)?;
    Ok(ParseResult::new(
        Synopsis::Success(best.with_output(output)),
        exclusions,
    ))
}

/// Tries every variant in order, wrapping the first success in
/// `Push`/`Pop`. Variants are pruned by their first characters only while
/// seeding: while growing, the self-reference stands in for text that has
/// already been consumed.
fn parse_variants(
    production: ProductionId,
    state: ParseState,
    cx: &mut ParseContext<'_>,
    seeding: bool,
) -> Attempt {
    let grammar = cx.grammar;
    let prune = seeding && cx.options.lookahead_pruning;
    let next_char = state.peek_char();
    let mut exclusions = Exclusions::default();
    let mut excluded = false;

    for &id in grammar.production(production).variants() {
        let variant = grammar.variant(id);
        if prune {
            if let Some(first) = variant.lookahead1() {
                if !first.admits(next_char) {
                    cx.report(&state, || lookahead::expectation(first));
                    continue;
                }
            }
        }
        let result = variant
            .body()
            .parse(state.append_output(Event::Push(id)), cx)?;
        exclusions.extend(result.lr_exclusions_triggered);
        match result.synopsis {
            Synopsis::Success(end) => {
                return Ok(ParseResult::new(
                    Synopsis::Success(end.append_output(Event::Pop)),
                    exclusions,
                ));
            }
            Synopsis::FailureDueToLrExclusion => excluded = true,
            Synopsis::Failure => {}
        }
    }

    let synopsis = if excluded {
        Synopsis::FailureDueToLrExclusion
    } else {
        Synopsis::Failure
    };
    Ok(ParseResult::new(synopsis, exclusions))
}

/// The next event names the variant to serialize; its body must then
/// account for everything up to the matching `Pop`.
pub(super) fn unparse(
    production: ProductionId,
    state: SerialState,
    cx: &mut SerialContext<'_>,
) -> Option<SerialState> {
    let grammar = cx.grammar;
    let variant = match state.peek() {
        Some(Event::Push(id)) if grammar.variant(*id).production() == production => {
            grammar.variant(*id)
        }
        _ => {
            cx.report(&state, || {
                format!("expected a `{}` node", grammar.production(production).name())
            });
            return None;
        }
    };
    let state = variant.body().unparse(state.advance(), cx)?;
    if state.peek() == Some(&Event::Pop) {
        Some(state.advance())
    } else {
        cx.report(&state, || format!("expected the end of `{}`", grammar.variant_path(variant.id())));
        None
    }
}

pub(super) fn match_events(
    production: ProductionId,
    state: MatchState,
    cx: &mut MatchContext<'_>,
) -> Option<MatchState> {
    let grammar = cx.grammar;
    let variant = match state.peek() {
        Some(Event::Push(id)) if grammar.variant(*id).production() == production => {
            grammar.variant(*id)
        }
        _ => {
            cx.report(&state, || {
                format!("expected a `{}` node", grammar.production(production).name())
            });
            return None;
        }
    };
    let state = variant.body().match_events(state.advance(), cx)?;
    if state.peek() == Some(&Event::Pop) {
        Some(state.advance())
    } else {
        cx.report(&state, || format!("expected the end of `{}`", grammar.variant_path(variant.id())));
        None
    }
}
