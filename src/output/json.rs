//! JSON output format

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::diff::DiffResult;

use super::OutputFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonDiffOutput<'a> {
    old_file: String,
    new_file: String,
    has_changes: bool,
    #[serde(flatten)]
    result: &'a DiffResult,
}

impl OutputFormatter for JsonOutput {
    fn render(
        &self,
        diff: &DiffResult,
        old_path: &Path,
        new_path: &Path,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let output = JsonDiffOutput {
            old_file: old_path.display().to_string(),
            new_file: new_path.display().to_string(),
            has_changes: diff.has_changes(),
            result: diff,
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &output)?;
        } else {
            serde_json::to_writer(&mut *writer, &output)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
