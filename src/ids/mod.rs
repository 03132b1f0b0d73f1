//! Element identifier synthesis
//!
//! Class-bearing elements without an `id` get one derived from their class
//! list: the first letter of each class word (`"card shadow-lg"` → `cs`),
//! disambiguated with the smallest free numeric suffix (`cs1`, `cs2`, …).
//! Uniqueness is tracked per generation cycle by an [`IdRegistry`].

mod inject;

pub use inject::{inject_ids, Injection};

use std::collections::HashSet;

/// Longest prefix derived from a class list.
pub const MAX_PREFIX_LEN: usize = 7;

/// Identifiers handed out (or reserved) during one generation cycle.
#[derive(Debug, Default, Clone)]
pub struct IdRegistry {
    used: HashSet<String>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an identifier that already exists in the tree so synthesized
    /// ones never collide with it.
    pub fn reserve(&mut self, id: &str) {
        if !self.used.contains(id) {
            self.used.insert(id.to_string());
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Claim `prefix`, or `prefix` + the smallest positive integer that is
    /// still free, and record it.
    pub fn claim(&mut self, prefix: &str) -> String {
        let id = if !self.used.contains(prefix) {
            prefix.to_string()
        } else {
            (1u64..)
                .map(|n| format!("{prefix}{n}"))
                .find(|candidate| !self.used.contains(candidate))
                .unwrap_or_else(|| prefix.to_string())
        };
        self.used.insert(id.clone());
        id
    }
}

/// First ASCII letter of each space-separated word, lowercased, capped at
/// [`MAX_PREFIX_LEN`]. Words that don't start with a letter (`-mt-2`,
/// `2xl:flex`) contribute nothing, so the result is always letters only.
pub fn derive_prefix(class_value: &str) -> String {
    class_value
        .split_ascii_whitespace()
        .filter_map(|word| word.chars().next())
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .take(MAX_PREFIX_LEN)
        .collect()
}

/// True for identifiers shaped like the ones [`IdRegistry::claim`] produces:
/// one or more lowercase ASCII letters followed by zero or more digits.
pub fn is_generated_identifier(s: &str) -> bool {
    let letters = s.bytes().take_while(|b| b.is_ascii_lowercase()).count();
    letters > 0 && s.bytes().skip(letters).all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_prefix() {
        assert_eq!(derive_prefix("flex p-4"), "fp");
        assert_eq!(derive_prefix("Card  Shadow"), "cs");
        assert_eq!(derive_prefix("a b c d e f g h i"), "abcdefg");
        assert_eq!(derive_prefix("-mt-2 2xl:flex grid"), "g");
        assert_eq!(derive_prefix("   "), "");
    }

    #[test]
    fn test_claim_appends_smallest_free_suffix() {
        let mut registry = IdRegistry::new();
        assert_eq!(registry.claim("fp"), "fp");
        assert_eq!(registry.claim("fp"), "fp1");
        assert_eq!(registry.claim("fp"), "fp2");
        assert_eq!(registry.claim("c"), "c");
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_claim_skips_reserved_ids() {
        let mut registry = IdRegistry::new();
        registry.reserve("fp");
        registry.reserve("fp1");

        assert_eq!(registry.claim("fp"), "fp2");
    }

    #[test]
    fn test_is_generated_identifier() {
        assert!(is_generated_identifier("btn1"));
        assert!(is_generated_identifier("card12"));
        assert!(is_generated_identifier("fp"));

        assert!(!is_generated_identifier(""));
        assert!(!is_generated_identifier("1btn"));
        assert!(!is_generated_identifier("BTN"));
        assert!(!is_generated_identifier("btn-1"));
        assert!(!is_generated_identifier("btn1a"));
        assert!(!is_generated_identifier("hero_section"));
    }
}
