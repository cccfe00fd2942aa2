//! CSV file parser

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::model::TabularDataset;

use super::Parser;

/// Parser for CSV files
pub struct CsvParser;

impl Parser for CsvParser {
    fn parse(&self, path: &Path, _config: &Config) -> Result<TabularDataset> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
            _ => b',',
        };
        read_csv(BufReader::new(file), delimiter)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "csv" | "tsv" | "txt")
    }
}

/// Read delimited text into a dataset, keeping every cell verbatim
pub fn read_csv<R: Read>(reader: R, delimiter: u8) -> Result<TabularDataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut dataset = TabularDataset::new(headers);

    for (line_num, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read CSV row {}", line_num + 2))?; // +2 for 1-indexing and header
        dataset.push_record(record.iter(), line_num + 2);
    }

    Ok(dataset)
}
