//! Parser layer for reading tabular files into datasets

mod csv;
mod excel;
mod json;

use std::path::Path;

use anyhow::{bail, Context, Result};
use log::debug;

use crate::config::Config;
use crate::model::TabularDataset;

pub use self::csv::CsvParser;
pub use self::excel::ExcelParser;
pub use self::json::JsonParser;

/// Trait for parsing tabular data files
pub trait Parser: Send + Sync {
    /// Parse a file into a dataset of text cells
    fn parse(&self, path: &Path, config: &Config) -> Result<TabularDataset>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for creating parsers based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(CsvParser), Box::new(ExcelParser), Box::new(JsonParser)],
        }
    }

    /// Get a parser for the given file path
    pub fn get_parser(&self, path: &Path) -> Result<&dyn Parser> {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_lowercase(),
            None => detect_format(path).unwrap_or("csv").to_string(),
        };

        for parser in &self.parsers {
            if parser.supports_extension(&ext) {
                return Ok(parser.as_ref());
            }
        }

        bail!("Unsupported file format: {}", ext)
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path, config: &Config) -> Result<TabularDataset> {
        let parser = self.get_parser(path)?;
        let dataset = parser
            .parse(path, config)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        debug!(
            "Loaded {}: {} column(s), {} row(s)",
            path.display(),
            dataset.column_count(),
            dataset.row_count()
        );
        Ok(dataset)
    }

    /// Read the old and new inputs of a run concurrently
    pub fn load_pair(&self, config: &Config) -> (Result<TabularDataset>, Result<TabularDataset>) {
        rayon::join(
            || self.parse(&config.old_file, config),
            || self.parse(&config.new_file, config),
        )
    }
}

/// Detect file format from content (for files without extension)
pub fn detect_format(path: &Path) -> Option<&'static str> {
    use std::fs::File;
    use std::io::Read;

    let mut file = File::open(path).ok()?;
    let mut buffer = [0u8; 512];
    let bytes_read = file.read(&mut buffer).ok()?;
    let head = &buffer[..bytes_read];

    // Excel ZIP format (xlsx) and old Excel format (xls)
    if head.starts_with(b"PK\x03\x04") {
        return Some("xlsx");
    }
    if head.starts_with(b"\xD0\xCF\x11\xE0") {
        return Some("xls");
    }

    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return Some("json");
    }

    Some("csv")
}
