//! First-character analysis.
//!
//! Computes, for every production, the set of characters a successful
//! parse can start with and whether it can match the empty string. Both are
//! fixed points over the grammar. Productions that reach themselves in
//! leftmost position are left recursive; references to them get no
//! lookahead, since while growing they consume nothing.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::combinator::Combinator;
use crate::grammar::ProductionId;

/// A set of characters stored as sorted, disjoint, non-adjacent ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharSet {
    ranges: Vec<(char, char)>,
}

impl CharSet {
    /// The empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The set holding only `ch`.
    #[must_use]
    pub fn singleton(ch: char) -> Self {
        Self {
            ranges: vec![(ch, ch)],
        }
    }

    /// Returns `true` if no character is in the set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns `true` if `ch` is in the set.
    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if hi < ch {
                    std::cmp::Ordering::Less
                } else if lo > ch {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Returns `true` if a parse starting at `next` may succeed. The end of
    /// input is never admitted.
    #[must_use]
    pub fn admits(&self, next: Option<char>) -> bool {
        next.is_some_and(|ch| self.contains(ch))
    }

    /// Returns the ranges of the set.
    pub fn ranges(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.ranges.iter().copied()
    }

    /// Adds every character of `other`. Returns `true` if the set grew.
    pub fn union_with(&mut self, other: &CharSet) -> bool {
        if other.ranges.iter().all(|&(lo, hi)| self.covers(lo, hi)) {
            return false;
        }
        let mut all: Vec<(char, char)> = self.ranges.iter().chain(&other.ranges).copied().collect();
        all.sort_unstable();
        let mut merged: Vec<(char, char)> = Vec::with_capacity(all.len());
        for (lo, hi) in all {
            match merged.last_mut() {
                Some((_, last_hi)) if u32::from(lo) <= u32::from(*last_hi) + 1 => {
                    *last_hi = (*last_hi).max(hi);
                }
                _ => merged.push((lo, hi)),
            }
        }
        self.ranges = merged;
        true
    }

    fn covers(&self, lo: char, hi: char) -> bool {
        self.ranges.iter().any(|&(a, b)| a <= lo && hi <= b)
    }
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (lo, hi)) in self.ranges().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if lo == hi {
                write!(f, "`{lo}`")?;
            } else {
                write!(f, "`{lo}`..`{hi}`")?;
            }
        }
        Ok(())
    }
}

/// The message reported when a pruned alternative was skipped.
pub(crate) fn expectation(set: &CharSet) -> String {
    match set.ranges.as_slice() {
        [(lo, hi)] if lo == hi => format!("expected `{lo}`"),
        _ => format!("expected one of {set}"),
    }
}

/// What a combinator can start with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct First {
    pub(crate) chars: CharSet,
    pub(crate) nullable: bool,
    /// Set when the start cannot be described by `chars`, e.g. for patterns.
    pub(crate) unknown: bool,
}

impl First {
    fn nullable() -> Self {
        Self {
            nullable: true,
            ..Self::default()
        }
    }

    fn unknown(nullable: bool) -> Self {
        Self {
            chars: CharSet::empty(),
            nullable,
            unknown: true,
        }
    }

    /// The set usable for pruning, if any.
    pub(crate) fn lookahead1(&self) -> Option<CharSet> {
        (!self.unknown && !self.nullable).then(|| self.chars.clone())
    }

    fn absorb(&mut self, other: &First) {
        self.chars.union_with(&other.chars);
        self.unknown |= other.unknown;
    }
}

/// Per-production results, indexed by production.
pub(crate) struct Analysis<'a> {
    pub(crate) firsts: &'a [First],
    /// Left-recursive productions, when references to them must be treated
    /// as unknown.
    pub(crate) left_recursive: Option<&'a FxHashSet<ProductionId>>,
}

pub(crate) fn first_of(combinator: &Combinator, analysis: &Analysis<'_>) -> First {
    match combinator {
        Combinator::Empty | Combinator::Lookahead(_) => First::nullable(),
        Combinator::Literal(literal) => First {
            chars: literal.lookahead1(),
            nullable: false,
            unknown: false,
        },
        Combinator::Pattern(pattern) => First::unknown(pattern.is_nullable()),
        Combinator::Concatenation(children) => {
            let mut first = First::nullable();
            for child in children {
                let next = first_of(child, analysis);
                first.absorb(&next);
                if !next.nullable {
                    first.nullable = false;
                    break;
                }
            }
            first
        }
        Combinator::Alternation(arms) => {
            let mut first = First::default();
            for arm in arms {
                let next = first_of(&arm.body, analysis);
                first.absorb(&next);
                first.nullable |= next.nullable;
            }
            first
        }
        Combinator::Repetition(body) => First {
            nullable: true,
            ..first_of(body, analysis)
        },
        Combinator::Reference(production) => {
            let first = &analysis.firsts[production.index()];
            match analysis.left_recursive {
                Some(lr) if lr.contains(production) => First::unknown(first.nullable),
                _ => first.clone(),
            }
        }
    }
}

/// Productions that can be reached in leftmost position from `combinator`.
pub(crate) fn leftmost_references(
    combinator: &Combinator,
    firsts: &[First],
    out: &mut FxHashSet<ProductionId>,
) {
    let analysis = Analysis {
        firsts,
        left_recursive: None,
    };
    match combinator {
        Combinator::Empty | Combinator::Literal(_) | Combinator::Pattern(_) => {}
        Combinator::Lookahead(body) | Combinator::Repetition(body) => {
            leftmost_references(body, firsts, out);
        }
        Combinator::Concatenation(children) => {
            for child in children {
                leftmost_references(child, firsts, out);
                if !first_of(child, &analysis).nullable {
                    break;
                }
            }
        }
        Combinator::Alternation(arms) => {
            for arm in arms {
                leftmost_references(&arm.body, firsts, out);
            }
        }
        Combinator::Reference(production) => {
            out.insert(*production);
        }
    }
}

/// Computes production firsts by iterating to a fixed point. `variants[p]`
/// lists the variant bodies of production `p`.
pub(crate) fn production_firsts(variants: &[Vec<&Combinator>]) -> Vec<First> {
    let mut firsts = vec![First::default(); variants.len()];
    loop {
        let mut changed = false;
        for (index, bodies) in variants.iter().enumerate() {
            let analysis = Analysis {
                firsts: &firsts,
                left_recursive: None,
            };
            let mut next = First::default();
            for body in bodies {
                let first = first_of(body, &analysis);
                next.absorb(&first);
                next.nullable |= first.nullable;
            }
            if next != firsts[index] {
                firsts[index] = next;
                changed = true;
            }
        }
        if !changed {
            return firsts;
        }
    }
}

/// Productions that reach themselves through leftmost references.
pub(crate) fn left_recursive(
    variants: &[Vec<&Combinator>],
    firsts: &[First],
) -> FxHashSet<ProductionId> {
    let edges: Vec<FxHashSet<ProductionId>> = variants
        .iter()
        .map(|bodies| {
            let mut out = FxHashSet::default();
            for body in bodies {
                leftmost_references(body, firsts, &mut out);
            }
            out
        })
        .collect();

    let mut result = FxHashSet::default();
    for start in 0..variants.len() {
        let start = ProductionId::from_index(start);
        let mut seen = FxHashSet::default();
        let mut work: Vec<ProductionId> = edges[start.index()].iter().copied().collect();
        while let Some(next) = work.pop() {
            if next == start {
                result.insert(start);
                break;
            }
            if seen.insert(next) {
                work.extend(edges[next.index()].iter().copied());
            }
        }
    }
    result
}
