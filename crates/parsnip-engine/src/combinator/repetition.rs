//! Kleene star. An iteration that does not move forward ends the loop and
//! its output is dropped, so a nullable body cannot spin forever.

use super::{Attempt, Combinator, Exclusions, ParseResult, Synopsis};
use crate::context::{MatchContext, ParseContext, SerialContext};
use crate::state::{MatchState, ParseState, SerialState};

pub(super) fn parse(body: &Combinator, state: ParseState, cx: &mut ParseContext<'_>) -> Attempt {
    let mut exclusions = Exclusions::default();
    let mut current = state;
    loop {
        let result = body.parse(current.clone(), cx)?;
        exclusions.extend(result.lr_exclusions_triggered);
        match result.synopsis {
            Synopsis::Success(next) if next.index() > current.index() => current = next,
            _ => break,
        }
    }
    Ok(ParseResult::new(Synopsis::Success(current), exclusions))
}

pub(super) fn unparse(
    body: &Combinator,
    state: SerialState,
    cx: &mut SerialContext<'_>,
) -> Option<SerialState> {
    let mut current = state;
    while let Some(next) = body.unparse(current.clone(), cx) {
        if next.consumed() == current.consumed() {
            break;
        }
        current = next;
    }
    Some(current)
}

pub(super) fn match_events(
    body: &Combinator,
    state: MatchState,
    cx: &mut MatchContext<'_>,
) -> Option<MatchState> {
    let mut current = state;
    while let Some(next) = body.match_events(current.clone(), cx) {
        if next.consumed() == current.consumed() {
            break;
        }
        current = next;
    }
    Some(current)
}
