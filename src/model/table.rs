//! Dataset and row structures

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single data row: column name to cell text.
///
/// Columns the source line did not reach are absent from the map rather than
/// stored as empty strings, so a short row never compares equal (or unequal)
/// on its missing trailing columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Cell values keyed by column name, in header order
    pub values: IndexMap<String, String>,
    /// Original line/row number in source file (1-indexed)
    pub source_line: usize,
}

impl Row {
    /// Zip a header list against one data line.
    ///
    /// Cells beyond the header length are dropped. When a header name repeats,
    /// the last occurrence wins.
    pub fn from_cells<I, S>(headers: &[String], cells: I, source_line: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = IndexMap::with_capacity(headers.len());
        for (name, cell) in headers.iter().zip(cells) {
            values.insert(name.clone(), cell.into());
        }
        Self {
            values,
            source_line,
        }
    }

    /// Build a row from an already keyed map
    pub fn from_map(values: IndexMap<String, String>, source_line: usize) -> Self {
        Self {
            values,
            source_line,
        }
    }

    /// Get a cell value by column name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Number of cells present in this row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One parsed tabular input: a header list plus ordered rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularDataset {
    /// Header names in file order (may contain duplicates)
    pub headers: Vec<String>,
    /// All data rows in file order
    pub rows: Vec<Row>,
}

impl TabularDataset {
    /// Create an empty dataset with the given headers
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a dataset from raw records where the first record is the header.
    ///
    /// An empty record list produces a dataset without headers, which the diff
    /// engine rejects as empty input.
    pub fn from_records<R, S>(records: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut records = records.into_iter();
        let Some(header) = records.next() else {
            return Self::default();
        };

        let mut dataset = Self::new(header.into_iter().map(Into::into).collect());
        for (idx, record) in records.enumerate() {
            // +2 for 1-indexing and header
            dataset.push_record(record, idx + 2);
        }
        dataset
    }

    /// Add a data line, zipping it against this dataset's headers
    pub fn push_record<I, S>(&mut self, cells: I, source_line: usize)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row = Row::from_cells(&self.headers, cells, source_line);
        self.rows.push(row);
    }

    /// Add a pre-built row
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// True when no header line was read
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Check whether a column name appears in the header list
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Get column index by name (first occurrence)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}
