//! Error types for comparison operations

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiffError>;

/// Boxed cause carried by an internal failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which input an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => write!(f, "old"),
            Side::New => write!(f, "new"),
        }
    }
}

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("{side} dataset is empty (no header row)")]
    EmptyInput { side: Side },

    #[error("key column '{column}' not found in {side} dataset")]
    InvalidKeyColumn { column: String, side: Side },

    #[error("comparison failed: {message}")]
    InternalComparisonFailure {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl DiffError {
    /// Wrap an unexpected failure with a short description
    pub fn internal(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        DiffError::InternalComparisonFailure {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// True for failures that a `Swallow` policy may absorb
    pub fn is_internal(&self) -> bool {
        matches!(self, DiffError::InternalComparisonFailure { .. })
    }
}
