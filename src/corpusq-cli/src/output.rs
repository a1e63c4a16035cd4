//! Output formatting for the corpusq CLI
//!
//! Results are rendered to a `String` first so that commands stay testable;
//! `main` prints whatever comes back.

use crate::cli::OutputFormat;
use crate::config::Config;
use corpusq_core::{QueryResult, Table, Value};
use corpusq_shared::error::operation_error;
use corpusq_shared::Result;
use serde::Serialize;
use std::fmt::Write;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Renders query results, tables and documents in the configured format
#[derive(Debug, Clone)]
pub struct OutputWriter {
    format: OutputFormat,
    limit: Option<usize>,
    color: bool,
}

impl OutputWriter {
    /// Create a writer from the display configuration
    pub fn new(config: &Config) -> Self {
        Self {
            format: config.display.format,
            limit: config.display.limit,
            color: config.should_use_color(),
        }
    }

    /// Create a writer with explicit settings
    pub fn with_settings(format: OutputFormat, limit: Option<usize>, color: bool) -> Self {
        Self {
            format,
            limit,
            color,
        }
    }

    /// Output format in use
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Row limit in use
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Serialize a document as pretty JSON
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        serde_json::to_string_pretty(value)
            .map_err(|e| operation_error(format!("JSON serialization error: {}", e)))
    }

    /// Apply the row limit to a table
    pub fn limited(&self, table: &Table) -> Table {
        let mut table = table.clone();
        if let Some(limit) = self.limit {
            table.truncate(limit);
        }
        table
    }

    /// Render a query answer under a heading
    pub fn render_result(&self, heading: &str, result: &QueryResult) -> String {
        let mut out = String::new();
        match result {
            QueryResult::Scalar(scalar) => {
                let _ = writeln!(out, "{}: {}", self.heading(heading), scalar.render());
            }
            QueryResult::Table(table) => {
                let _ = writeln!(out, "{}", self.heading(heading));
                out.push_str(&self.render_table(&self.limited(table)));
            }
        }
        out
    }

    /// Render a table as aligned plain-text columns
    pub fn render_table(&self, table: &Table) -> String {
        let cells: Vec<Vec<String>> = table
            .rows()
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        let mut widths: Vec<usize> = table.columns().iter().map(|c| display_width(c)).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(display_width(cell));
            }
        }

        let mut out = String::new();
        let header = pad_line(table.columns().iter().map(String::as_str), &widths);
        if self.color {
            let _ = writeln!(out, "{BOLD}{header}{RESET}");
        } else {
            let _ = writeln!(out, "{header}");
        }
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let _ = writeln!(out, "{}", rule.join("  "));
        for row in &cells {
            let _ = writeln!(out, "{}", pad_line(row.iter().map(String::as_str), &widths));
        }
        if table.is_empty() {
            let _ = writeln!(out, "(no rows)");
        }
        out
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            format!("{BOLD}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

fn cell_text(value: &Value) -> String {
    value.to_text().unwrap_or_default()
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}

fn pad_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let fill = width.saturating_sub(display_width(cell));
            format!("{cell}{}", " ".repeat(fill))
        })
        .collect();
    padded.join("  ").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpusq_core::{Scalar, Shape};
    use pretty_assertions::assert_eq;

    fn writer(limit: Option<usize>) -> OutputWriter {
        OutputWriter::with_settings(OutputFormat::Text, limit, false)
    }

    #[test]
    fn test_render_table_aligned() {
        let table = Table::from_counts("Author", "Count", vec![("Chalam", 12), ("Sri Sri", 3)]);
        assert_eq!(
            writer(None).render_table(&table),
            "Author   Count\n-------  -----\nChalam   12\nSri Sri  3\n"
        );
    }

    #[test]
    fn test_nulls_render_blank() {
        let mut table = Table::new(["Title", "Link"]);
        table.push_row(vec![Value::from("X"), Value::Null]).unwrap();
        assert_eq!(
            writer(None).render_table(&table),
            "Title  Link\n-----  ----\nX\n"
        );
    }

    #[test]
    fn test_render_result_scalar_and_limit() {
        let w = writer(Some(1));
        assert_eq!(
            w.render_result("Works", &Scalar::count(1234).into_result()),
            "Works: 1,234\n"
        );

        let table = Table::from_counts("Year", "Count", vec![(1990, 2), (1991, 1)]);
        let text = w.render_result("By year", &table.into_result());
        assert!(text.contains("1990"));
        assert!(!text.contains("1991"));
    }

    #[test]
    fn test_empty_table_marker() {
        let text = writer(None).render_table(&Table::new(["Magazine"]));
        assert!(text.ends_with("(no rows)\n"));
    }

    #[test]
    fn test_json_output() {
        let w = OutputWriter::with_settings(OutputFormat::Json, None, false);
        let text = w.json(&Scalar::year(1990).into_result()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["kind"], "scalar");
        assert_eq!(parsed["value"], 1990);
    }
}
