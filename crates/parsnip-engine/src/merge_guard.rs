//! Token merge hazards.
//!
//! The engine matches literals directly against characters, so nothing
//! stops `new` from matching the front of `newer` or `<` from matching the
//! front of `<=`. A [`MergeGuard`] rejects a literal match whose end would
//! split what a tokenizer would read as one token.

use smol_str::SmolStr;

/// Returns `true` if `ch` may begin an identifier.
#[must_use]
pub fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

/// Returns `true` if `ch` may continue an identifier.
#[must_use]
pub fn is_ident_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// A check applied to the text right after a literal match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeGuard {
    /// The literal is a word; it must not be followed by an identifier
    /// character.
    Word,
    /// The literal is a proper prefix of longer punctuation tokens; these
    /// are the remainders that would complete one of them.
    Punctuation {
        /// Text that, if it follows the literal, completes a longer token.
        suffixes: Vec<SmolStr>,
    },
}

impl MergeGuard {
    /// Picks the guard for a literal, given every punctuation token of the
    /// grammar.
    #[must_use]
    pub fn for_literal(text: &str, punctuation: &[SmolStr]) -> Option<Self> {
        let first = text.chars().next()?;
        if is_ident_start(first) {
            return Some(Self::Word);
        }
        let suffixes = punctuation_suffixes(text, punctuation);
        (!suffixes.is_empty()).then_some(Self::Punctuation { suffixes })
    }

    /// Returns `true` if a match ending at `end` would split a token.
    #[must_use]
    pub fn is_hazard(&self, content: &str, end: usize) -> bool {
        let rest = &content[end..];
        match self {
            Self::Word => rest.chars().next().is_some_and(is_ident_part),
            Self::Punctuation { suffixes } => {
                suffixes.iter().any(|suffix| rest.starts_with(suffix.as_str()))
            }
        }
    }
}

/// The remainders of every punctuation token that `token` is a proper
/// prefix of, e.g. `=` and `<=` for `<` when `<=` and `<<=` exist.
#[must_use]
pub fn punctuation_suffixes(token: &str, punctuation: &[SmolStr]) -> Vec<SmolStr> {
    let mut suffixes: Vec<SmolStr> = punctuation
        .iter()
        .filter(|longer| longer.len() > token.len() && longer.starts_with(token))
        .map(|longer| SmolStr::new(&longer[token.len()..]))
        .collect();
    suffixes.sort();
    suffixes.dedup();
    suffixes
}

/// Returns `true` if writing `next` right after `previous` would read back
/// differently: two words run together, or a punctuation token of the
/// grammar straddles the boundary.
#[must_use]
pub fn would_merge(previous: &str, next: &str, punctuation: &[SmolStr]) -> bool {
    let (Some(last), Some(first)) = (previous.chars().next_back(), next.chars().next()) else {
        return false;
    };
    if is_ident_part(last) && is_ident_part(first) {
        return true;
    }
    punctuation.iter().any(|token| {
        token
            .char_indices()
            .skip(1)
            .any(|(split, _)| previous.ends_with(&token[..split]) && next.starts_with(&token[split..]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[&str]) -> Vec<SmolStr> {
        list.iter().map(|s| SmolStr::new(s)).collect()
    }

    #[test]
    fn word_guard_rejects_identifier_continuation() {
        let guard = MergeGuard::for_literal("new", &[]).unwrap();
        assert_eq!(guard, MergeGuard::Word);
        assert!(guard.is_hazard("newer", 3));
        assert!(!guard.is_hazard("new Foo", 3));
        assert!(!guard.is_hazard("new(", 3));
        assert!(!guard.is_hazard("new", 3));
    }

    #[test]
    fn punctuation_guard_rejects_longer_tokens() {
        let punctuation = tokens(&["<", "<=", "<<", "<<=", "-", "--"]);
        let guard = MergeGuard::for_literal("<", &punctuation).unwrap();
        assert_eq!(
            guard,
            MergeGuard::Punctuation {
                suffixes: tokens(&["<", "<=", "="]),
            }
        );
        assert!(guard.is_hazard("a<=b", 2));
        assert!(guard.is_hazard("a<<b", 2));
        assert!(!guard.is_hazard("a< b", 2));

        let minus = MergeGuard::for_literal("-", &punctuation).unwrap();
        assert!(minus.is_hazard("--", 1));
        assert!(!minus.is_hazard("- -", 1));
    }

    #[test]
    fn longest_tokens_need_no_guard() {
        let punctuation = tokens(&["-", "--"]);
        assert_eq!(MergeGuard::for_literal("--", &punctuation), None);
        assert_eq!(MergeGuard::for_literal("+", &punctuation), None);
        assert_eq!(MergeGuard::for_literal("", &punctuation), None);
    }

    #[test]
    fn would_merge_detects_boundaries() {
        let punctuation = tokens(&["-", "--", "<<"]);
        assert!(would_merge("new", "Foo", &punctuation));
        assert!(would_merge("-", "-", &punctuation));
        assert!(would_merge("<", "<", &punctuation));
        assert!(!would_merge("1", "+", &punctuation));
        assert!(!would_merge("(", "x", &punctuation));
        assert!(!would_merge("", "x", &punctuation));
    }
}
