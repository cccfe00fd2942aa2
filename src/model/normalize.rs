//! Text normalization applied before key derivation and cell comparison

use std::borrow::Cow;

/// Case-folding and whitespace-trimming flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalizer {
    pub ignore_case: bool,
    pub ignore_whitespace: bool,
}

impl Normalizer {
    pub fn new(ignore_case: bool, ignore_whitespace: bool) -> Self {
        Self {
            ignore_case,
            ignore_whitespace,
        }
    }

    /// Trim (if enabled), then lowercase (if enabled).
    pub fn apply<'a>(&self, value: &'a str) -> Cow<'a, str> {
        let value = if self.ignore_whitespace {
            value.trim()
        } else {
            value
        };

        if self.ignore_case {
            Cow::Owned(value.to_lowercase())
        } else {
            Cow::Borrowed(value)
        }
    }

    /// True when neither flag is set
    pub fn is_identity(&self) -> bool {
        !self.ignore_case && !self.ignore_whitespace
    }
}
