//! Excel file parser (xlsx, xls, ods)

use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::config::Config;
use crate::model::TabularDataset;

use super::Parser;

/// Parser for Excel files
pub struct ExcelParser;

impl Parser for ExcelParser {
    fn parse(&self, path: &Path, config: &Config) -> Result<TabularDataset> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

        let sheet_name = match config.sheet_name {
            Some(ref name) => name.clone(),
            None => match workbook.sheet_names().first() {
                Some(first) => first.clone(),
                None => bail!("No sheets found in workbook"),
            },
        };

        let range: Range<Data> = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        Ok(range_to_dataset(&range))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "xlsx" | "xls" | "ods" | "xlsm")
    }
}

/// First row is the header; an empty sheet yields a dataset without headers
fn range_to_dataset(range: &Range<Data>) -> TabularDataset {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return TabularDataset::default();
    };

    let headers = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell_to_string(cell);
            if name.is_empty() {
                format!("Column{}", i + 1)
            } else {
                name
            }
        })
        .collect();

    let mut dataset = TabularDataset::new(headers);
    for (line_num, row) in rows.enumerate() {
        dataset.push_record(row.iter().map(cell_to_string), line_num + 2); // +2 for 1-indexing and header
    }
    dataset
}

/// Render a spreadsheet cell as text
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::Float(100.0)), "100");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
        assert_eq!(cell_to_string(&Data::String(" x ".into())), " x ");
    }

    #[test]
    fn test_range_to_dataset() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("id".into()));
        range.set_value((0, 1), Data::String("name".into()));
        range.set_value((1, 0), Data::Float(1.0));
        range.set_value((1, 1), Data::String("John".into()));
        range.set_value((2, 0), Data::Float(2.0));

        let dataset = range_to_dataset(&range);
        assert_eq!(dataset.headers, vec!["id", "name", "Column3"]);
        assert_eq!(dataset.rows[0].get("id"), Some("1"));
        assert_eq!(dataset.rows[0].get("name"), Some("John"));
        assert_eq!(dataset.rows[1].get("name"), Some(""));
        assert_eq!(dataset.rows[1].source_line, 3);
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        assert!(range_to_dataset(&range).is_empty());
    }
}
