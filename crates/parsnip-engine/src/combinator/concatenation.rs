use super::{Attempt, Combinator, Exclusions, ParseResult, Synopsis};
use crate::context::{MatchContext, ParseContext, SerialContext};
use crate::state::{MatchState, ParseState, SerialState};

pub(super) fn parse(children: &[Combinator], state: ParseState, cx: &mut ParseContext<'_>) -> Attempt {
    let mut exclusions = Exclusions::default();
    let mut current = state;
    for child in children {
        let result = child.parse(current, cx)?;
        exclusions.extend(result.lr_exclusions_triggered);
        match result.synopsis {
            Synopsis::Success(next) => current = next,
            failed => return Ok(ParseResult::new(failed, exclusions)),
        }
    }
    Ok(ParseResult::new(Synopsis::Success(current), exclusions))
}

pub(super) fn unparse(
    children: &[Combinator],
    state: SerialState,
    cx: &mut SerialContext<'_>,
) -> Option<SerialState> {
    children
        .iter()
        .try_fold(state, |state, child| child.unparse(state, cx))
}

pub(super) fn match_events(
    children: &[Combinator],
    state: MatchState,
    cx: &mut MatchContext<'_>,
) -> Option<MatchState> {
    children
        .iter()
        .try_fold(state, |state, child| child.match_events(state, cx))
}
