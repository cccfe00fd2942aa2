//! Colored terminal output

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use indexmap::{IndexMap, IndexSet};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::diff::{DiffResult, RowDiff};

use super::OutputFormatter;

/// Terminal output, optionally colored
pub struct TerminalOutput {
    color: bool,
}

impl TerminalOutput {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn buffer(&self) -> Buffer {
        if self.color {
            Buffer::ansi()
        } else {
            Buffer::no_color()
        }
    }

    fn write_header(&self, out: &mut Buffer, old_path: &Path, new_path: &Path) -> Result<()> {
        writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            out,
            " tabcompare: {} → {}",
            old_path.display(),
            new_path.display()
        )?;
        writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(out)?;
        Ok(())
    }

    fn write_column_changes(&self, diff: &DiffResult, out: &mut Buffer) -> Result<()> {
        if diff.added_columns.is_empty() && diff.removed_columns.is_empty() {
            return Ok(());
        }

        writeln!(out, "Column Changes:")?;
        for name in &diff.added_columns {
            colored(out, Color::Green, |out| writeln!(out, "  + {}", name))?;
        }
        for name in &diff.removed_columns {
            colored(out, Color::Red, |out| writeln!(out, "  - {}", name))?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn write_summary(&self, diff: &DiffResult, out: &mut Buffer) -> Result<()> {
        let stats = &diff.stats;
        writeln!(
            out,
            "Summary: +{} added, -{} removed, ~{} modified (out of {} → {} rows)",
            stats.rows_added,
            stats.rows_removed,
            stats.rows_modified,
            stats.old_row_count,
            stats.new_row_count
        )?;
        writeln!(
            out,
            "Columns: +{} added, -{} removed",
            stats.columns_added, stats.columns_removed
        )?;
        if stats.rows_superseded > 0 {
            writeln!(
                out,
                "Note: {} row(s) skipped because a later row had the same key",
                stats.rows_superseded
            )?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn write_rows(&self, title: &str, color: Color, rows: &[RowDiff], new_side: bool, out: &mut Buffer) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        colored(out, color, |out| writeln!(out, "{}:", title))?;

        let columns: IndexSet<&str> = rows
            .iter()
            .flat_map(|d| side_values(d, new_side).keys())
            .map(String::as_str)
            .collect();

        let mut table_data: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
        table_data.push(columns.iter().map(|c| c.to_string()).collect());
        for diff in rows {
            let values = side_values(diff, new_side);
            table_data.push(
                columns
                    .iter()
                    .map(|c| values.get(*c).cloned().unwrap_or_default())
                    .collect(),
            );
        }

        write!(out, "{}", build_table(&table_data))?;
        writeln!(out)?;
        Ok(())
    }

    fn write_modified_rows(&self, diff: &DiffResult, out: &mut Buffer) -> Result<()> {
        if diff.modified_rows.is_empty() {
            return Ok(());
        }

        colored(out, Color::Yellow, |out| writeln!(out, "Modified Rows:"))?;
        for row in &diff.modified_rows {
            if let Some(counts) = row.count_mismatch {
                writeln!(
                    out,
                    "  [{}]: occurs {} time(s) in old, {} time(s) in new",
                    row.key_label(),
                    counts.old,
                    counts.new
                )?;
                continue;
            }

            writeln!(out, "  [{}] (line {}):", row.key_label(), row.source_line)?;
            for column in &row.modified_columns {
                let old = row.old_values.get(column).map(String::as_str).unwrap_or("");
                let new = row.new_values.get(column).map(String::as_str).unwrap_or("");
                write!(out, "    {}: ", column)?;
                colored(out, Color::Red, |out| write!(out, "{:?}", old))?;
                write!(out, " → ")?;
                colored(out, Color::Green, |out| writeln!(out, "{:?}", new))?;
            }
        }
        writeln!(out)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new(false)
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(
        &self,
        diff: &DiffResult,
        old_path: &Path,
        new_path: &Path,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let mut out = self.buffer();
        self.write_header(&mut out, old_path, new_path)?;

        if !diff.has_changes() {
            writeln!(out, "No differences found.")?;
        } else {
            self.write_column_changes(diff, &mut out)?;
            self.write_summary(diff, &mut out)?;
            self.write_rows("Added Rows", Color::Green, &diff.added_rows, true, &mut out)?;
            self.write_rows("Removed Rows", Color::Red, &diff.removed_rows, false, &mut out)?;
            self.write_modified_rows(diff, &mut out)?;
        }

        writer.write_all(out.as_slice())?;
        Ok(())
    }
}

fn side_values(diff: &RowDiff, new_side: bool) -> &IndexMap<String, String> {
    if new_side {
        &diff.new_values
    } else {
        &diff.old_values
    }
}

fn colored<F>(out: &mut Buffer, color: Color, f: F) -> Result<()>
where
    F: FnOnce(&mut Buffer) -> std::io::Result<()>,
{
    out.set_color(ColorSpec::new().set_fg(Some(color)))?;
    f(out)?;
    out.reset()?;
    Ok(())
}

/// Build a formatted table from data
fn build_table(data: &[Vec<String>]) -> String {
    if data.is_empty() || data[0].is_empty() {
        return String::new();
    }

    let col_count = data[0].len();

    let mut col_widths: Vec<usize> = vec![0; col_count];
    for row in data {
        for (i, cell) in row.iter().enumerate() {
            if i < col_widths.len() {
                col_widths[i] = col_widths[i].max(cell.chars().count());
            }
        }
    }

    let border = |left: char, mid: char, right: char| {
        let mut line = String::new();
        line.push(left);
        for (i, width) in col_widths.iter().enumerate() {
            line.push_str(&"─".repeat(*width + 2));
            if i < col_widths.len() - 1 {
                line.push(mid);
            }
        }
        line.push(right);
        line.push('\n');
        line
    };

    let data_row = |row: &[String]| {
        let mut line = String::from("│");
        for (i, cell) in row.iter().enumerate() {
            let width = col_widths.get(i).copied().unwrap_or(0);
            line.push_str(&format!(" {:width$} │", cell, width = width));
        }
        line.push('\n');
        line
    };

    let mut output = border('┌', '┬', '┐');
    output.push_str(&data_row(&data[0]));
    output.push_str(&border('├', '┼', '┤'));
    for row in data.iter().skip(1) {
        output.push_str(&data_row(row));
    }
    output.push_str(&border('└', '┴', '┘'));

    output
}
