//! Diff engine for comparing datasets

pub mod cell_diff;
mod duplicates;
mod row_diff;
mod schema_diff;

use std::error::Error as _;

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{ComparisonOptions, CountMismatchPolicy, FailurePolicy};
use crate::error::{DiffError, Result, Side};
use crate::model::{KeyDeriver, Row, TabularDataset};

pub use cell_diff::CellComparator;
pub use duplicates::{CountMismatch, DuplicateCountChecker};
pub use row_diff::{KeyIndex, MatchOutcome, MatchStrategy, RowMatch, RowMatcher};
pub use schema_diff::{all_columns, ColumnDiff};

/// Classification of a row-level difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowDiffKind {
    Added,
    Removed,
    Modified,
}

impl std::fmt::Display for RowDiffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowDiffKind::Added => write!(f, "added"),
            RowDiffKind::Removed => write!(f, "removed"),
            RowDiffKind::Modified => write!(f, "modified"),
        }
    }
}

/// Occurrence counts of one key in each dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCounts {
    pub old: usize,
    pub new: usize,
}

/// The outcome of comparing, or failing to match, one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDiff {
    pub kind: RowDiffKind,
    /// Raw values of the key columns, in key-column order
    pub key_values: Vec<String>,
    /// Full old row; empty for added rows
    pub old_values: IndexMap<String, String>,
    /// Full new row; empty for removed rows
    pub new_values: IndexMap<String, String>,
    /// Columns whose values differ; empty for added/removed rows and count mismatches
    pub modified_columns: IndexSet<String>,
    /// Line of the row in its source file (old side unless added)
    pub source_line: usize,
    /// Set on the sentinel diffs produced by the duplicate-count pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_mismatch: Option<KeyCounts>,
}

impl RowDiff {
    pub fn added(key_values: Vec<String>, row: &Row) -> Self {
        Self {
            kind: RowDiffKind::Added,
            key_values,
            old_values: IndexMap::new(),
            new_values: row.values.clone(),
            modified_columns: IndexSet::new(),
            source_line: row.source_line,
            count_mismatch: None,
        }
    }

    pub fn removed(key_values: Vec<String>, row: &Row) -> Self {
        Self {
            kind: RowDiffKind::Removed,
            key_values,
            old_values: row.values.clone(),
            new_values: IndexMap::new(),
            modified_columns: IndexSet::new(),
            source_line: row.source_line,
            count_mismatch: None,
        }
    }

    pub fn modified(
        key_values: Vec<String>,
        old_row: &Row,
        new_row: &Row,
        modified_columns: IndexSet<String>,
    ) -> Self {
        Self {
            kind: RowDiffKind::Modified,
            key_values,
            old_values: old_row.values.clone(),
            new_values: new_row.values.clone(),
            modified_columns,
            source_line: old_row.source_line,
            count_mismatch: None,
        }
    }

    /// Sentinel for a key whose occurrence count differs.
    ///
    /// Both sides carry the first matching old row and no column is marked
    /// modified.
    pub fn count_mismatch(key_values: Vec<String>, mismatch: &CountMismatch<'_>) -> Self {
        Self {
            kind: RowDiffKind::Modified,
            key_values,
            old_values: mismatch.first_row.values.clone(),
            new_values: mismatch.first_row.values.clone(),
            modified_columns: IndexSet::new(),
            source_line: mismatch.first_row.source_line,
            count_mismatch: Some(KeyCounts {
                old: mismatch.old_count,
                new: mismatch.new_count,
            }),
        }
    }

    pub fn is_count_mismatch(&self) -> bool {
        self.kind == RowDiffKind::Modified && self.modified_columns.is_empty()
    }

    /// Key values joined for display
    pub fn key_label(&self) -> String {
        self.key_values.join(", ")
    }
}

/// Statistics about the diff
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub columns_added: usize,
    pub columns_removed: usize,
    pub rows_added: usize,
    pub rows_removed: usize,
    pub rows_modified: usize,
    pub rows_unchanged: usize,
    pub cells_changed: usize,
    pub count_mismatches: usize,
    /// Rows skipped because a later row had the same key
    pub rows_superseded: usize,
    pub old_row_count: usize,
    pub new_row_count: usize,
}

impl DiffStats {
    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.columns_added > 0
            || self.columns_removed > 0
            || self.rows_added > 0
            || self.rows_removed > 0
            || self.rows_modified > 0
    }
}

/// Result of comparing two datasets
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Header list of the new dataset
    pub headers: Vec<String>,
    pub added_columns: IndexSet<String>,
    pub removed_columns: IndexSet<String>,
    pub added_rows: Vec<RowDiff>,
    pub removed_rows: Vec<RowDiff>,
    pub modified_rows: Vec<RowDiff>,
    pub stats: DiffStats,
}

impl DiffResult {
    fn new(headers: Vec<String>, columns: ColumnDiff) -> Self {
        Self {
            headers,
            added_columns: columns.added,
            removed_columns: columns.removed,
            ..Default::default()
        }
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        !self.added_columns.is_empty()
            || !self.removed_columns.is_empty()
            || !self.added_rows.is_empty()
            || !self.removed_rows.is_empty()
            || !self.modified_rows.is_empty()
    }

    /// All row diffs: added, then removed, then modified
    pub fn row_diffs(&self) -> impl Iterator<Item = &RowDiff> {
        self.added_rows
            .iter()
            .chain(&self.removed_rows)
            .chain(&self.modified_rows)
    }

    /// Sentinel diffs from the duplicate-count pass
    pub fn count_mismatches(&self) -> impl Iterator<Item = &RowDiff> {
        self.modified_rows.iter().filter(|d| d.count_mismatch.is_some())
    }

    fn push(&mut self, diff: RowDiff) {
        match diff.kind {
            RowDiffKind::Added => self.added_rows.push(diff),
            RowDiffKind::Removed => self.removed_rows.push(diff),
            RowDiffKind::Modified => self.modified_rows.push(diff),
        }
    }

    fn finish_stats(&mut self) {
        self.stats.columns_added = self.added_columns.len();
        self.stats.columns_removed = self.removed_columns.len();
        self.stats.rows_added = self.added_rows.len();
        self.stats.rows_removed = self.removed_rows.len();
        self.stats.rows_modified = self.modified_rows.len();
        self.stats.count_mismatches = self.count_mismatches().count();
        self.stats.cells_changed = self
            .modified_rows
            .iter()
            .map(|d| d.modified_columns.len())
            .sum();
    }
}

/// Outcome of the duplicate-count pass
#[derive(Debug)]
enum DuplicatePhase<'a> {
    Skipped,
    Consistent,
    Mismatched(Vec<CountMismatch<'a>>),
}

/// Main diff engine
pub struct DiffEngine {
    options: ComparisonOptions,
    cell_comparator: CellComparator,
}

impl DiffEngine {
    /// Create a new diff engine with options
    pub fn new(options: ComparisonOptions) -> Self {
        let cell_comparator = CellComparator::with_normalizer(options.normalizer());
        Self {
            options,
            cell_comparator,
        }
    }

    pub fn options(&self) -> &ComparisonOptions {
        &self.options
    }

    /// Compare two datasets, applying the configured failure policy
    pub fn diff(&self, old: &TabularDataset, new: &TabularDataset) -> Result<DiffResult> {
        self.settle(self.try_diff(old, new))
    }

    /// Compare the outcome of two external reads.
    ///
    /// A reader failure is an internal comparison failure and is subject to
    /// the failure policy like any other.
    pub fn diff_loaded(
        &self,
        old: anyhow::Result<TabularDataset>,
        new: anyhow::Result<TabularDataset>,
    ) -> Result<DiffResult> {
        let outcome = match (old, new) {
            (Ok(old), Ok(new)) => self.try_diff(&old, &new),
            (Err(err), _) => Err(DiffError::internal("failed to load old input", err)),
            (_, Err(err)) => Err(DiffError::internal("failed to load new input", err)),
        };
        self.settle(outcome)
    }

    /// Compare two datasets, surfacing every failure
    pub fn try_diff(&self, old: &TabularDataset, new: &TabularDataset) -> Result<DiffResult> {
        if old.is_empty() {
            return Err(DiffError::EmptyInput { side: Side::Old });
        }
        if new.is_empty() {
            return Err(DiffError::EmptyInput { side: Side::New });
        }
        if self.options.validate_key_columns {
            validate_key_columns(old, &self.options.key_columns, Side::Old)?;
            validate_key_columns(new, &self.options.key_columns, Side::New)?;
        }

        let columns = ColumnDiff::compare(&old.headers, &new.headers);
        debug!(
            "Column reconciliation: {} added, {} removed",
            columns.added.len(),
            columns.removed.len()
        );

        let mut result = DiffResult::new(new.headers.clone(), columns);
        result.stats.old_row_count = old.row_count();
        result.stats.new_row_count = new.row_count();

        let normalizer = self.options.normalizer();
        let old_keys = KeyDeriver::for_dataset(&self.options.key_columns, old, normalizer);
        let new_keys = KeyDeriver::for_dataset(&self.options.key_columns, new, normalizer);

        if let DuplicatePhase::Mismatched(mismatches) = self.duplicate_phase(old, new, old_keys, new_keys) {
            for mismatch in &mismatches {
                result.push(RowDiff::count_mismatch(old_keys.key_values(mismatch.first_row), mismatch));
            }
            if self.options.count_mismatch == CountMismatchPolicy::ShortCircuit {
                info!(
                    "{} key(s) occur a different number of times; skipping row comparison",
                    mismatches.len()
                );
                result.finish_stats();
                return Ok(result);
            }
        }

        let strategy = MatchStrategy::from_strict_order(self.options.strict_row_order);
        debug!("Matching rows using {:?} strategy", strategy);
        let outcome = RowMatcher::new(strategy, old_keys, new_keys).match_rows(old, new);
        result.stats.rows_superseded = outcome.superseded;

        for row_match in outcome.matches {
            match row_match {
                RowMatch::Pair(old_row, new_row) => {
                    let modified = self.cell_comparator.modified_columns(
                        old_row,
                        new_row,
                        &old.headers,
                        &new.headers,
                    );
                    if modified.is_empty() {
                        result.stats.rows_unchanged += 1;
                    } else {
                        result.push(RowDiff::modified(
                            old_keys.key_values(old_row),
                            old_row,
                            new_row,
                            modified,
                        ));
                    }
                }
                RowMatch::Removed(row) => result.push(RowDiff::removed(old_keys.key_values(row), row)),
                RowMatch::Added(row) => result.push(RowDiff::added(new_keys.key_values(row), row)),
            }
        }

        result.finish_stats();
        debug!(
            "Diff complete: +{} -{} ~{} ({} unchanged)",
            result.stats.rows_added,
            result.stats.rows_removed,
            result.stats.rows_modified,
            result.stats.rows_unchanged
        );
        Ok(result)
    }

    fn duplicate_phase<'a>(
        &self,
        old: &'a TabularDataset,
        new: &'a TabularDataset,
        old_keys: KeyDeriver<'a>,
        new_keys: KeyDeriver<'a>,
    ) -> DuplicatePhase<'a> {
        if self.options.ignore_duplicates {
            return DuplicatePhase::Skipped;
        }

        let mismatches = DuplicateCountChecker::new(old_keys, new_keys).check(old, new);
        if mismatches.is_empty() {
            DuplicatePhase::Consistent
        } else {
            DuplicatePhase::Mismatched(mismatches)
        }
    }

    fn settle(&self, outcome: Result<DiffResult>) -> Result<DiffResult> {
        match outcome {
            Err(err) if err.is_internal() && self.options.failure_policy == FailurePolicy::Swallow => {
                warn!("{}; reporting no differences", err);
                let mut source = err.source();
                while let Some(cause) = source {
                    warn!("  caused by: {}", cause);
                    source = cause.source();
                }
                Ok(DiffResult::default())
            }
            other => other,
        }
    }
}

/// Check that every key column exists in a dataset's headers
pub fn validate_key_columns(dataset: &TabularDataset, key_columns: &[String], side: Side) -> Result<()> {
    match key_columns.iter().find(|column| !dataset.has_column(column)) {
        Some(column) => Err(DiffError::InvalidKeyColumn {
            column: column.clone(),
            side,
        }),
        None => Ok(()),
    }
}

/// Compare two datasets with the given key columns
pub fn compare(
    old: &TabularDataset,
    new: &TabularDataset,
    key_columns: &[String],
    options: &ComparisonOptions,
) -> Result<DiffResult> {
    engine_for(key_columns, options).diff(old, new)
}

/// Like [`compare`], but internal failures are always returned
pub fn try_compare(
    old: &TabularDataset,
    new: &TabularDataset,
    key_columns: &[String],
    options: &ComparisonOptions,
) -> Result<DiffResult> {
    engine_for(key_columns, options).try_diff(old, new)
}

fn engine_for(key_columns: &[String], options: &ComparisonOptions) -> DiffEngine {
    DiffEngine::new(options.clone().with_key_columns(key_columns.to_vec()))
}
