//! Output formatting for diff results

mod json;
mod terminal;

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::config::{Config, OutputFormat};
use crate::diff::DiffResult;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render diff result to a writer
    fn render(
        &self,
        diff: &DiffResult,
        old_path: &Path,
        new_path: &Path,
        writer: &mut dyn Write,
    ) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat, color: bool) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new(color)),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render diff result to stdout
pub fn render_to_stdout(diff: &DiffResult, config: &Config) -> Result<()> {
    let formatter = OutputFactory::create(config.output_format, config.color);
    let mut stdout = std::io::stdout().lock();
    formatter.render(diff, &config.old_file, &config.new_file, &mut stdout)
}
