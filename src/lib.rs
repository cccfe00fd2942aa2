//! tabcompare - Key-aware diff for tabular data
//!
//! Compares two datasets (a header row plus data rows of text cells) and
//! reports added/removed columns and added, removed, and modified rows under
//! a configurable matching policy.

pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;

pub use config::{ComparisonOptions, Config, CountMismatchPolicy, FailurePolicy};
pub use diff::{compare, try_compare, DiffEngine, DiffResult, RowDiff, RowDiffKind};
pub use error::{DiffError, Side};
pub use model::{Row, TabularDataset};
