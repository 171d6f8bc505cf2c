use super::{Arm, Attempt, Exclusions, ParseResult, Synopsis};
use crate::context::{MatchContext, ParseContext, SerialContext};
use crate::lookahead;
use crate::state::{MatchState, ParseState, SerialState};

/// Ordered choice: the first arm that succeeds wins and later arms are
/// never tried.
pub(super) fn parse(arms: &[Arm], state: ParseState, cx: &mut ParseContext<'_>) -> Attempt {
    let mut exclusions = Exclusions::default();
    let mut excluded = false;
    let next_char = state.peek_char();
    for arm in arms {
        if cx.options.lookahead_pruning {
            if let Some(first) = arm.lookahead1() {
                if !first.admits(next_char) {
                    cx.report(&state, || lookahead::expectation(first));
                    continue;
                }
            }
        }
        let result = arm.body.parse(state.clone(), cx)?;
        exclusions.extend(result.lr_exclusions_triggered);
        match result.synopsis {
            Synopsis::Success(next) => {
                return Ok(ParseResult::new(Synopsis::Success(next), exclusions));
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

pub(super) fn unparse(
    arms: &[Arm],
    state: SerialState,
    cx: &mut SerialContext<'_>,
) -> Option<SerialState> {
    arms.iter()
        .find_map(|arm| arm.body.unparse(state.clone(), cx))
}

pub(super) fn match_events(
    arms: &[Arm],
    state: MatchState,
    cx: &mut MatchContext<'_>,
) -> Option<MatchState> {
    arms.iter()
        .find_map(|arm| arm.body.match_events(state.clone(), cx))
}
