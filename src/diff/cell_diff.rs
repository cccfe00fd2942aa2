//! Cell-level comparison logic

use indexmap::IndexSet;

use crate::model::{Normalizer, Row};

use super::schema_diff::all_columns;

/// Cell comparator with configurable normalization
#[derive(Debug, Clone, Copy, Default)]
pub struct CellComparator {
    normalizer: Normalizer,
}

impl CellComparator {
    /// Create a new cell comparator
    pub fn new(ignore_case: bool, ignore_whitespace: bool) -> Self {
        Self::with_normalizer(Normalizer::new(ignore_case, ignore_whitespace))
    }

    pub fn with_normalizer(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    /// Compare two cell values for equality after normalization
    pub fn equal(&self, a: &str, b: &str) -> bool {
        if self.normalizer.is_identity() {
            return a == b;
        }
        self.normalizer.apply(a) == self.normalizer.apply(b)
    }

    /// Columns whose values differ between two matched rows.
    ///
    /// Every column of either header list is visited. A column missing from
    /// either row is not comparable and is skipped.
    pub fn modified_columns(
        &self,
        old_row: &Row,
        new_row: &Row,
        old_headers: &[String],
        new_headers: &[String],
    ) -> IndexSet<String> {
        let mut modified = IndexSet::new();
        for column in all_columns(old_headers, new_headers) {
            let (Some(old_value), Some(new_value)) = (old_row.get(column), new_row.get(column))
            else {
                continue;
            };
            if !self.equal(old_value, new_value) {
                modified.insert(column.to_string());
            }
        }
        modified
    }
}
