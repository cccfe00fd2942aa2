//! Configuration handling for tabcompare

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::Normalizer;

/// Output format for diff results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// What to do with an unexpected failure during comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the cause and return an empty result
    #[default]
    Swallow,
    /// Return the failure to the caller
    Propagate,
}

/// How key-count mismatches found by the duplicate pass are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMismatchPolicy {
    /// Return only the count-mismatch diffs and skip row matching
    #[default]
    ShortCircuit,
    /// Report count mismatches, then run the full row comparison as well
    Merge,
}

/// Options controlling how two datasets are matched and compared
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonOptions {
    /// Columns identifying the same record; empty means every header column
    pub key_columns: Vec<String>,
    /// Lowercase values before key derivation and cell comparison
    pub ignore_case: bool,
    /// Trim leading/trailing whitespace before key derivation and cell comparison
    pub ignore_whitespace: bool,
    /// Match rows by position instead of by key
    pub strict_row_order: bool,
    /// Skip the duplicate-count pass
    pub ignore_duplicates: bool,
    /// Reject key columns missing from either header list
    pub validate_key_columns: bool,
    pub failure_policy: FailurePolicy,
    pub count_mismatch: CountMismatchPolicy,
}

impl ComparisonOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set key columns for row matching
    pub fn with_key_columns(mut self, keys: Vec<String>) -> Self {
        self.key_columns = keys;
        self
    }

    /// Enable case-insensitive comparison
    pub fn with_ignore_case(mut self, ignore: bool) -> Self {
        self.ignore_case = ignore;
        self
    }

    /// Enable whitespace-insensitive comparison
    pub fn with_ignore_whitespace(mut self, ignore: bool) -> Self {
        self.ignore_whitespace = ignore;
        self
    }

    /// Enable positional matching
    pub fn with_strict_row_order(mut self, strict: bool) -> Self {
        self.strict_row_order = strict;
        self
    }

    /// Disable the duplicate-count pass
    pub fn with_ignore_duplicates(mut self, ignore: bool) -> Self {
        self.ignore_duplicates = ignore;
        self
    }

    pub fn with_key_validation(mut self, validate: bool) -> Self {
        self.validate_key_columns = validate;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_count_mismatch_policy(mut self, policy: CountMismatchPolicy) -> Self {
        self.count_mismatch = policy;
        self
    }

    /// Normalization flags as a value
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.ignore_case, self.ignore_whitespace)
    }
}

/// Configuration for a command-line run
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path to the old/original file
    pub old_file: PathBuf,
    /// Path to the new file
    pub new_file: PathBuf,
    /// Output format
    pub output_format: OutputFormat,
    /// For Excel files: which sheet to compare
    pub sheet_name: Option<String>,
    /// Only show statistics, not detailed changes
    pub stats_only: bool,
    /// Emit ANSI colors in terminal output
    pub color: bool,
    /// Matching and normalization options
    pub options: ComparisonOptions,
}

impl Config {
    /// Create a new Config with file paths
    pub fn new(old_file: PathBuf, new_file: PathBuf) -> Self {
        Self {
            old_file,
            new_file,
            ..Default::default()
        }
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set Excel sheet name
    pub fn with_sheet_name(mut self, name: String) -> Self {
        self.sheet_name = Some(name);
        self
    }

    /// Enable stats-only mode
    pub fn with_stats_only(mut self, stats_only: bool) -> Self {
        self.stats_only = stats_only;
        self
    }

    pub fn with_options(mut self, options: ComparisonOptions) -> Self {
        self.options = options;
        self
    }
}
