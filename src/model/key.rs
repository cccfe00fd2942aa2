//! Composite key derivation

use super::normalize::Normalizer;
use super::table::{Row, TabularDataset};

/// Separator placed between key fields. Never removed by normalization.
pub const KEY_SEPARATOR: char = '|';

/// Turns a row into a single comparable key string.
///
/// The key is a matching token only: two rows with the same derived key are
/// treated as the same record whether or not the columns are really unique.
#[derive(Debug, Clone, Copy)]
pub struct KeyDeriver<'a> {
    columns: &'a [String],
    normalizer: Normalizer,
}

impl<'a> KeyDeriver<'a> {
    /// Create a deriver over an explicit column list
    pub fn new(columns: &'a [String], normalizer: Normalizer) -> Self {
        Self {
            columns,
            normalizer,
        }
    }

    /// Create a deriver for one dataset.
    ///
    /// An empty key list falls back to that dataset's own full header list.
    pub fn for_dataset(
        key_columns: &'a [String],
        dataset: &'a TabularDataset,
        normalizer: Normalizer,
    ) -> Self {
        let columns = if key_columns.is_empty() {
            dataset.headers.as_slice()
        } else {
            key_columns
        };
        Self::new(columns, normalizer)
    }

    /// Build the normalized key string for a row.
    ///
    /// Missing columns contribute an empty field.
    pub fn derive(&self, row: &Row) -> String {
        let mut key = String::new();
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                key.push(KEY_SEPARATOR);
            }
            let value = row.get(column).unwrap_or("");
            key.push_str(&self.normalizer.apply(value));
        }
        key
    }

    /// Raw (unnormalized) key values of a row, in key-column order
    pub fn key_values(&self, row: &Row) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| row.get(column).unwrap_or("").to_string())
            .collect()
    }

    /// The columns this deriver reads
    pub fn columns(&self) -> &'a [String] {
        self.columns
    }
}
