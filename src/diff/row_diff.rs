//! Row matching algorithm

use indexmap::IndexMap;
use log::debug;
use rustc_hash::FxBuildHasher;

use crate::model::{KeyDeriver, Row, TabularDataset};

/// How rows of the two datasets are paired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Pair rows with equal index
    Positional,
    /// Pair rows with equal derived key
    Keyed,
}

impl MatchStrategy {
    pub fn from_strict_order(strict_row_order: bool) -> Self {
        if strict_row_order {
            MatchStrategy::Positional
        } else {
            MatchStrategy::Keyed
        }
    }
}

/// Outcome of matching for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMatch<'a> {
    /// Same record on both sides; goes on to cell comparison
    Pair(&'a Row, &'a Row),
    /// Only in the old dataset
    Removed(&'a Row),
    /// Only in the new dataset
    Added(&'a Row),
}

/// Derived key to row, built in file order.
///
/// When several rows share a key the last one wins; earlier rows are
/// superseded and take no further part in matching.
#[derive(Debug)]
pub struct KeyIndex<'a> {
    rows: IndexMap<String, &'a Row, FxBuildHasher>,
    superseded: usize,
}

impl<'a> KeyIndex<'a> {
    pub fn build(dataset: &'a TabularDataset, keys: &KeyDeriver<'_>) -> Self {
        let mut rows: IndexMap<String, &'a Row, FxBuildHasher> =
            IndexMap::with_capacity_and_hasher(dataset.row_count(), FxBuildHasher);
        let mut superseded = 0;
        for row in &dataset.rows {
            if rows.insert(keys.derive(row), row).is_some() {
                superseded += 1;
            }
        }
        Self { rows, superseded }
    }

    /// Row currently holding a key
    pub fn get(&self, key: &str) -> Option<&'a Row> {
        self.rows.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    /// Rows dropped because a later row had the same key
    pub fn superseded(&self) -> usize {
        self.superseded
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Entries in first-seen key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &'a Row)> + '_ {
        self.rows.iter().map(|(key, row)| (key.as_str(), *row))
    }
}

/// Result of a matching pass
#[derive(Debug, Default)]
pub struct MatchOutcome<'a> {
    pub matches: Vec<RowMatch<'a>>,
    /// Rows ignored by the last-wins rule, both sides combined
    pub superseded: usize,
}

/// Pairs rows between the old and new dataset
pub struct RowMatcher<'a> {
    strategy: MatchStrategy,
    old_keys: KeyDeriver<'a>,
    new_keys: KeyDeriver<'a>,
}

impl<'a> RowMatcher<'a> {
    /// Create a new row matcher
    pub fn new(strategy: MatchStrategy, old_keys: KeyDeriver<'a>, new_keys: KeyDeriver<'a>) -> Self {
        Self {
            strategy,
            old_keys,
            new_keys,
        }
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Match rows between old and new datasets
    pub fn match_rows<'d>(&self, old: &'d TabularDataset, new: &'d TabularDataset) -> MatchOutcome<'d> {
        match self.strategy {
            MatchStrategy::Positional => MatchOutcome {
                matches: match_positional(old, new),
                superseded: 0,
            },
            MatchStrategy::Keyed => self.match_keyed(old, new),
        }
    }

    fn match_keyed<'d>(&self, old: &'d TabularDataset, new: &'d TabularDataset) -> MatchOutcome<'d> {
        let old_index = KeyIndex::build(old, &self.old_keys);
        let new_index = KeyIndex::build(new, &self.new_keys);
        debug!(
            "Keyed matching: {} old keys, {} new keys ({} + {} superseded rows)",
            old_index.len(),
            new_index.len(),
            old_index.superseded(),
            new_index.superseded()
        );

        let mut matches = Vec::with_capacity(old_index.len().max(new_index.len()));

        for (key, old_row) in old_index.iter() {
            match new_index.get(key) {
                Some(new_row) => matches.push(RowMatch::Pair(old_row, new_row)),
                None => matches.push(RowMatch::Removed(old_row)),
            }
        }

        for (key, new_row) in new_index.iter() {
            if !old_index.contains(key) {
                matches.push(RowMatch::Added(new_row));
            }
        }

        MatchOutcome {
            matches,
            superseded: old_index.superseded() + new_index.superseded(),
        }
    }
}

fn match_positional<'d>(old: &'d TabularDataset, new: &'d TabularDataset) -> Vec<RowMatch<'d>> {
    let len = old.row_count().max(new.row_count());
    (0..len)
        .map(|i| match (old.rows.get(i), new.rows.get(i)) {
            (Some(old_row), Some(new_row)) => RowMatch::Pair(old_row, new_row),
            (Some(old_row), None) => RowMatch::Removed(old_row),
            (None, Some(new_row)) => RowMatch::Added(new_row),
            (None, None) => unreachable!("index below the longer row count"),
        })
        .collect()
}
