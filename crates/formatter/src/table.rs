use crate::{labels::derive_column_labels, sanitize::ResultFormatter};
use model::{
    core::{cell::Cell, column::ColumnLabel},
    records::result_set::ResultSet,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt::Write;

const COLUMN_SEPARATOR: &str = " | ";
const CLIPPED: char = '…';
const REPLACEMENT: char = '\u{FFFD}';

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub max_column_width: usize,
    pub null_marker: String,
    pub empty_message: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_column_width: 40,
            null_marker: "NULL".to_string(),
            empty_message: "No data available".to_string(),
        }
    }
}

/// Labels and sanitized rows ready for display. Labels and rows are matched
/// by position only; either side may be shorter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultTable {
    #[serde(rename = "columns")]
    pub labels: Vec<ColumnLabel>,
    pub rows: ResultSet,
}

impl ResultTable {
    pub fn new(labels: Vec<ColumnLabel>, rows: ResultSet) -> Self {
        Self { labels, rows }
    }

    pub fn from_query(formatter: &ResultFormatter, sql: &str, result: &JsonValue) -> Self {
        Self::new(derive_column_labels(sql), formatter.sanitize_json(result))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        let widest_row = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        widest_row.max(self.labels.len())
    }

    pub fn to_json(&self) -> JsonValue {
        serde_json::json!({
            "columns": self.labels,
            "rows": self.rows,
        })
    }

    pub fn render_text(&self, options: &RenderOptions) -> String {
        if self.is_empty() {
            return format!("{}\n", options.empty_message);
        }

        let columns = self.column_count();
        let header: Vec<String> = (0..columns)
            .map(|idx| {
                self.labels
                    .get(idx)
                    .map(|label| display_text(label))
                    .unwrap_or_default()
            })
            .collect();
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                (0..columns)
                    .map(|idx| match row.get(idx) {
                        Some(Cell::Null) => options.null_marker.clone(),
                        Some(cell) => display_text(&cell.to_string()),
                        None => String::new(),
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = (0..columns)
            .map(|idx| {
                let cells = body.iter().map(|row| row[idx].chars().count());
                let natural = cells.chain([header[idx].chars().count()]).max().unwrap_or(0);
                natural.clamp(1, options.max_column_width.max(1))
            })
            .collect();

        let mut out = String::new();
        push_line(&mut out, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let _ = writeln!(out, "{}", rule.join("-+-"));
        for row in &body {
            push_line(&mut out, row, &widths);
        }

        let noun = if self.row_count() == 1 { "row" } else { "rows" };
        let _ = writeln!(out, "({} {noun})", self.row_count());
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", clip(cell, *width), width = *width))
        .collect::<Vec<_>>()
        .join(COLUMN_SEPARATOR);
    let _ = writeln!(out, "{}", line.trim_end());
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}{CLIPPED}")
}

/// Replaces control characters so cell content cannot drive the terminal.
pub fn display_text(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_control() { REPLACEMENT } else { ch })
        .collect()
}
