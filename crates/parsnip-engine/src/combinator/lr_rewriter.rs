//! Turns the output of a grown left-recursive parse into a nested tree.
//!
//! Growing leaves the events of a production entered at offset `i` as
//!
//! ```text
//! seed  LrStart g1  LrStart g2 ...
//! ```
//!
//! where each growth round `gk` reads `opens LrEnd(P) rest`: `opens` are the
//! `Push` events of the nodes enclosing the self-reference and `rest` is
//! what followed it. The self-reference stood for everything before its
//! `LrStart`, so the tree is rebuilt from the inside out:
//!
//! ```text
//! tree0 = seed
//! treek = opens(gk) treek-1 rest(gk)
//! ```
//!
//! The rewrite only looks at the region past `start_len` and keeps no
//! state between calls, so sibling or nested growths cannot interfere.

use std::collections::VecDeque;

use smol_str::SmolStr;

use crate::chain::Chain;
use crate::error::InvariantViolation;
use crate::event::Event;
use crate::grammar::{Grammar, ProductionId};

pub(crate) fn rewrite(
    grammar: &Grammar,
    production: ProductionId,
    output: &Chain<Event>,
    start_len: usize,
) -> Result<Chain<Event>, InvariantViolation> {
    let name = || SmolStr::new(grammar.production(production).name());
    let (base, region) = output.split_tail(output.len().saturating_sub(start_len));

    let mut segments = region.split(|event| *event == Event::LrStart);
    let seed = segments.next().unwrap_or_default();
    match seed.first() {
        Some(Event::Push(variant)) if grammar.variant(*variant).production() == production => {}
        _ => return Err(InvariantViolation::MalformedSeed { production: name() }),
    }

    let mut tree: VecDeque<Event> = seed.iter().cloned().collect();
    for growth in segments {
        let call = growth
            .iter()
            .position(|event| *event == Event::LrEnd(production))
            .ok_or_else(|| InvariantViolation::MissingGrowthCall { production: name() })?;
        let (opens, rest) = (&growth[..call], &growth[call + 1..]);

        let mut depth = 0usize;
        for event in opens {
            match event {
                Event::Push(_) => depth += 1,
                Event::Pop if depth > 0 => depth -= 1,
                other => {
                    return Err(InvariantViolation::UnexpectedGrowthEvent {
                        production: name(),
                        found: describe(grammar, other),
                    });
                }
            }
        }
        if rest.contains(&Event::LrEnd(production)) {
            return Err(InvariantViolation::StrayGrowthMarker { production: name() });
        }

        for event in opens.iter().rev() {
            tree.push_front(event.clone());
        }
        tree.extend(rest.iter().cloned());
    }

    Ok(base.extend(tree))
}

fn describe(grammar: &Grammar, event: &Event) -> String {
    match event {
        Event::Push(variant) => format!("push {}", grammar.variant_path(*variant)),
        Event::Pop => "an unmatched pop".to_string(),
        Event::Token(text) => format!("token {text:?}"),
        Event::Content(text) => format!("content {text:?}"),
        Event::LrStart => "a growth start".to_string(),
        Event::LrEnd(other) => format!("the growth call of `{}`", grammar.production(*other).name()),
    }
}
