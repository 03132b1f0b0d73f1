//! Property-based tests for the diff reporter and id synthesis.

use dx_styles::diff::{diff, Delta, SortedSet};
use dx_styles::extract::RegexScanner;
use dx_styles::ids::{derive_prefix, inject_ids, is_generated_identifier, IdRegistry};
use proptest::prelude::*;
use std::collections::HashSet;

// Small alphabet so generated sets overlap often
fn token_strategy() -> impl Strategy<Value = String> {
    "[a-d]{1,3}"
}

fn class_value_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9-]{0,5}", 1..=4).prop_map(|words| words.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn diff_matches_set_difference(
        old in prop::collection::vec(token_strategy(), 0..20),
        new in prop::collection::vec(token_strategy(), 0..20),
    ) {
        let old_set: HashSet<_> = old.iter().cloned().collect();
        let new_set: HashSet<_> = new.iter().cloned().collect();
        let expected = Delta {
            added: new_set.difference(&old_set).count(),
            removed: old_set.difference(&new_set).count(),
        };

        let old_sorted: SortedSet = old.into_iter().collect();
        let new_sorted: SortedSet = new.into_iter().collect();
        prop_assert_eq!(diff(&old_sorted, &new_sorted), expected);
    }

    #[test]
    fn diff_with_itself_is_empty(values in prop::collection::vec(token_strategy(), 0..20)) {
        let set: SortedSet = values.into_iter().collect();
        prop_assert!(diff(&set, &set).is_empty());
    }

    #[test]
    fn claimed_ids_are_unique(prefixes in prop::collection::vec("[a-c]{1,2}", 1..50)) {
        let mut registry = IdRegistry::new();
        let mut seen = HashSet::new();

        for prefix in &prefixes {
            let id = registry.claim(prefix);
            prop_assert!(id.starts_with(prefix.as_str()));
            prop_assert!(is_generated_identifier(&id));
            prop_assert!(seen.insert(id));
        }
        prop_assert_eq!(registry.len(), prefixes.len());
    }

    #[test]
    fn injected_ids_are_unique_and_stable(values in prop::collection::vec(class_value_strategy(), 1..12)) {
        let source: String = values
            .iter()
            .map(|value| format!("<div className=\"{value}\" />\n"))
            .collect();

        let mut registry = IdRegistry::new();
        let first = inject_ids(&source, &RegexScanner.scan(&source), &mut registry);

        let unique: HashSet<_> = first.injected.iter().collect();
        prop_assert_eq!(unique.len(), first.injected.len());
        for id in &first.injected {
            prop_assert!(is_generated_identifier(id));
        }
        let expected = values.iter().filter(|v| !derive_prefix(v).is_empty()).count();
        prop_assert_eq!(first.injected.len(), expected);

        let second = inject_ids(&first.content, &RegexScanner.scan(&first.content), &mut IdRegistry::new());
        prop_assert!(!second.changed());
        prop_assert_eq!(second.content, first.content);
    }
}
