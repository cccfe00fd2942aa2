//! Key occurrence-count comparison between two datasets

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::model::{KeyDeriver, Row, TabularDataset};

/// A derived key that occurs a different number of times in each dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMismatch<'a> {
    /// Normalized derived key
    pub key: String,
    /// First row in the old dataset carrying this key
    pub first_row: &'a Row,
    pub old_count: usize,
    pub new_count: usize,
}

#[derive(Debug)]
struct KeyCount<'a> {
    count: usize,
    first_row: &'a Row,
}

/// Flags keys whose occurrence count differs between the two datasets, even
/// when every individual occurrence is textually identical.
///
/// Only keys present in the old dataset are checked.
pub struct DuplicateCountChecker<'a> {
    old_keys: KeyDeriver<'a>,
    new_keys: KeyDeriver<'a>,
}

impl<'a> DuplicateCountChecker<'a> {
    pub fn new(old_keys: KeyDeriver<'a>, new_keys: KeyDeriver<'a>) -> Self {
        Self { old_keys, new_keys }
    }

    /// Compare per-key counts, in first-seen order of the old dataset
    pub fn check(&self, old: &'a TabularDataset, new: &TabularDataset) -> Vec<CountMismatch<'a>> {
        let mut old_counts: IndexMap<String, KeyCount<'a>, FxBuildHasher> = IndexMap::default();
        for row in &old.rows {
            old_counts
                .entry(self.old_keys.derive(row))
                .and_modify(|entry| entry.count += 1)
                .or_insert(KeyCount {
                    count: 1,
                    first_row: row,
                });
        }

        let mut new_counts: FxHashMap<String, usize> = FxHashMap::default();
        for row in &new.rows {
            *new_counts.entry(self.new_keys.derive(row)).or_default() += 1;
        }

        old_counts
            .into_iter()
            .filter_map(|(key, entry)| {
                let new_count = new_counts.get(&key).copied().unwrap_or(0);
                (entry.count != new_count).then(|| CountMismatch {
                    key,
                    first_row: entry.first_row,
                    old_count: entry.count,
                    new_count,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Normalizer;

    fn dataset(records: Vec<Vec<&str>>) -> TabularDataset {
        TabularDataset::from_records(records)
    }

    fn check<'a>(
        old: &'a TabularDataset,
        new: &'a TabularDataset,
        keys: &'a [String],
    ) -> Vec<CountMismatch<'a>> {
        let checker = DuplicateCountChecker::new(
            KeyDeriver::for_dataset(keys, old, Normalizer::default()),
            KeyDeriver::for_dataset(keys, new, Normalizer::default()),
        );
        checker.check(old, new)
    }

    #[test]
    fn test_equal_counts() {
        let old = dataset(vec![vec!["id", "v"], vec!["1", "a"], vec!["1", "a"]]);
        let new = dataset(vec![vec!["id", "v"], vec!["1", "a"], vec!["1", "a"]]);
        assert!(check(&old, &new, &[]).is_empty());
    }

    #[test]
    fn test_extra_copy_detected() {
        let old = dataset(vec![vec!["id", "v"], vec!["1", "a"], vec!["1", "a"], vec!["2", "b"]]);
        let new = dataset(vec![vec!["id", "v"], vec!["1", "a"], vec!["2", "b"]]);
        let mismatches = check(&old, &new, &[]);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].key, "1|a");
        assert_eq!(mismatches[0].old_count, 2);
        assert_eq!(mismatches[0].new_count, 1);
        assert_eq!(mismatches[0].first_row.source_line, 2);
    }

    #[test]
    fn test_key_missing_from_new_counts_as_zero() {
        let keys = vec!["id".to_string()];
        let old = dataset(vec![vec!["id", "v"], vec!["1", "a"], vec!["2", "b"]]);
        let new = dataset(vec![vec!["id", "v"], vec!["1", "a"]]);
        let mismatches = check(&old, &new, &keys);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].key, "2");
        assert_eq!(mismatches[0].new_count, 0);
    }

    #[test]
    fn test_keys_only_in_new_are_not_checked() {
        let keys = vec!["id".to_string()];
        let old = dataset(vec![vec!["id", "v"], vec!["1", "a"]]);
        let new = dataset(vec![vec!["id", "v"], vec!["1", "a"], vec!["3", "c"], vec!["3", "c"]]);
        assert!(check(&old, &new, &keys).is_empty());
    }
}
