//! Sorted-set bookkeeping between generation cycles.

use serde::Serialize;

/// Sorted, duplicate-free list of strings.
///
/// The only way to build one is through [`SortedSet::from_iter`] (or
/// `collect`), which sorts and dedups, so every value handed to
/// [`diff_sorted`] satisfies its precondition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortedSet(Vec<String>);

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0
            .binary_search_by(|probe| probe.as_str().cmp(value))
            .is_ok()
    }
}

impl<S: Into<String>> FromIterator<S> for SortedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut values: Vec<String> = iter.into_iter().map(Into::into).collect();
        values.sort_unstable();
        values.dedup();
        SortedSet(values)
    }
}

impl<'a> IntoIterator for &'a SortedSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Added / removed counts between two cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Delta {
    pub added: usize,
    pub removed: usize,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Two-pointer merge over sorted, deduplicated inputs. Unsorted input gives
/// wrong counts rather than an error.
pub fn diff_sorted<T: Ord>(old: &[T], new: &[T]) -> Delta {
    let (mut i, mut j) = (0, 0);
    let mut delta = Delta::default();

    while i < old.len() && j < new.len() {
        match old[i].cmp(&new[j]) {
            std::cmp::Ordering::Less => {
                delta.removed += 1;
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                delta.added += 1;
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }

    delta.removed += old.len() - i;
    delta.added += new.len() - j;
    delta
}

/// [`diff_sorted`] over two [`SortedSet`]s.
pub fn diff(old: &SortedSet, new: &SortedSet) -> Delta {
    diff_sorted(old.as_slice(), new.as_slice())
}
