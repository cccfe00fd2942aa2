//! JSON array parser

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::config::Config;
use crate::model::{Row, TabularDataset};

use super::Parser;

/// Parser for JSON array files
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, path: &Path, _config: &Config) -> Result<TabularDataset> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;
        read_json(BufReader::new(file))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "json")
    }
}

/// Read an array of objects (or a single object) into a dataset.
///
/// Headers are the union of object keys in first-seen order. A key an object
/// lacks is absent from its row.
pub fn read_json<R: Read>(reader: R) -> Result<TabularDataset> {
    let value: Value = serde_json::from_reader(reader).context("Failed to parse JSON file")?;

    let array = match value {
        Value::Array(arr) => arr,
        Value::Object(_) => vec![value],
        _ => bail!("JSON must be an array or object"),
    };

    let mut column_names: IndexSet<String> = IndexSet::new();
    for (idx, item) in array.iter().enumerate() {
        match item {
            Value::Object(obj) => column_names.extend(obj.keys().cloned()),
            _ => bail!("JSON array element {} is not an object", idx),
        }
    }

    let mut dataset = TabularDataset::new(column_names.into_iter().collect());
    for (idx, item) in array.iter().enumerate() {
        if let Value::Object(obj) = item {
            let values: IndexMap<String, String> = obj
                .iter()
                .map(|(key, value)| (key.clone(), value_to_text(value)))
                .collect();
            dataset.push_row(Row::from_map(values, idx + 1));
        }
    }

    Ok(dataset)
}

/// Scalars as their plain text, nested values as compact JSON
fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
