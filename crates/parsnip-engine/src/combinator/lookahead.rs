//! Negative lookahead. The body runs against a copy of the state with
//! diagnostics muted, since its failures are the expected outcome.

use super::{Attempt, Combinator, ParseResult, Synopsis};
use crate::context::{MatchContext, ParseContext};
use crate::state::{MatchState, ParseState};

pub(super) fn parse(body: &Combinator, state: ParseState, cx: &mut ParseContext<'_>) -> Attempt {
    cx.mute();
    let outcome = body.parse(state.clone(), cx);
    cx.unmute();
    let result = outcome?;
    let synopsis = match result.synopsis {
        Synopsis::Success(_) => {
            let grammar = cx.grammar;
            cx.report(&state, || format!("unexpected {}", body.display(grammar)));
            Synopsis::Failure
        }
        Synopsis::Failure | Synopsis::FailureDueToLrExclusion => Synopsis::Success(state),
    };
    Ok(ParseResult::new(synopsis, result.lr_exclusions_triggered))
}

pub(super) fn match_events(
    body: &Combinator,
    state: MatchState,
    cx: &mut MatchContext<'_>,
) -> Option<MatchState> {
    cx.mute();
    let matched = body.match_events(state.clone(), cx).is_some();
    cx.unmute();
    if matched {
        let grammar = cx.grammar;
        cx.report(&state, || format!("unexpected {}", body.display(grammar)));
        None
    } else {
        Some(state)
    }
}
