use crate::{
    error::CellError,
    rules::{RuleContext, TextRulePipeline, currency::format_currency_f64, text::truncate},
    settings::FormatSettings,
};
use model::{
    core::{cell::Cell, column::ColumnKind},
    records::{
        decode::{decode_result_set, raw_rows},
        result_set::{RawCell, RawRow, ResultSet, Row},
    },
};
use serde_json::Value as JsonValue;
use tracing::error;

/// Turns raw query results into display-safe cells.
///
/// Every entry point is total: malformed structure degrades to empty rows,
/// unparseable values pass through, and a cell that fails classification is
/// replaced by the error sentinel without affecting its neighbours.
#[derive(Clone)]
pub struct ResultFormatter {
    settings: FormatSettings,
    rules: TextRulePipeline,
}

impl ResultFormatter {
    pub fn new(settings: FormatSettings) -> Self {
        let rules = TextRulePipeline::standard(&settings);
        Self { settings, rules }
    }

    /// Sanitizes an untyped JSON result body.
    pub fn sanitize_json(&self, value: &JsonValue) -> ResultSet {
        self.sanitize_rows(&decode_result_set(value), &[])
    }

    /// Sanitizes an untyped JSON result body using per-column type hints.
    /// Columns without a hint fall back to the heuristics.
    pub fn sanitize_with_kinds(&self, value: &JsonValue, kinds: &[ColumnKind]) -> ResultSet {
        self.sanitize_rows(&decode_result_set(value), kinds)
    }

    pub fn sanitize(&self, result: &ResultSet) -> ResultSet {
        self.sanitize_rows(&raw_rows(result), &[])
    }

    pub fn sanitize_rows(&self, rows: &[RawRow], kinds: &[ColumnKind]) -> ResultSet {
        rows.iter()
            .enumerate()
            .map(|(row_index, row)| match row {
                RawRow::Cells(cells) => self.sanitize_row(row_index, cells, kinds),
                RawRow::Malformed => Row::new(),
            })
            .collect()
    }

    fn sanitize_row(&self, row_index: usize, cells: &[RawCell], kinds: &[ColumnKind]) -> Row {
        cells
            .iter()
            .enumerate()
            .map(|(cell_index, cell)| {
                let kind = kinds.get(cell_index).copied().unwrap_or_default();
                self.format_cell(cell, kind).unwrap_or_else(|err| {
                    error!("Error processing cell [{row_index}][{cell_index}]: {err}");
                    Cell::Text(self.settings.error_sentinel.clone())
                })
            })
            .collect()
    }

    /// Classifies a single cell. Errors are for the caller to recover from.
    pub fn format_cell(&self, cell: &RawCell, kind: ColumnKind) -> Result<Cell, CellError> {
        let ctx = RuleContext {
            settings: &self.settings,
            kind,
        };

        match cell {
            RawCell::Scalar(Cell::Null) => Ok(Cell::Null),
            RawCell::Scalar(Cell::Text(text)) => self.rules.apply(text, &ctx),
            RawCell::Scalar(Cell::Number(value)) => Ok(self.format_number(*value, kind)),
            RawCell::Scalar(Cell::Boolean(value)) => Ok(Cell::Text(value.to_string())),
            RawCell::Other(value) => {
                let text =
                    serde_json::to_string(value).map_err(|e| CellError::Serialize(e.to_string()))?;
                Ok(Cell::Text(truncate(
                    &text,
                    self.settings.max_text_len,
                    &self.settings.ellipsis,
                )))
            }
        }
    }

    fn format_number(&self, value: f64, kind: ColumnKind) -> Cell {
        if !value.is_finite() {
            return Cell::Text(self.settings.invalid_number.clone());
        }

        if kind == ColumnKind::Currency {
            if let Some(text) = format_currency_f64(value, &self.settings.currency_symbol) {
                return Cell::Text(text);
            }
        }

        Cell::Number(value)
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(FormatSettings::default())
    }
}

/// Sanitizes a JSON result body with default settings.
pub fn sanitize(value: &JsonValue) -> ResultSet {
    ResultFormatter::default().sanitize_json(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    #[test]
    fn test_non_finite_numbers() {
        let formatter = ResultFormatter::default();
        let result = formatter.sanitize(&vec![vec![
            Cell::Number(f64::NAN),
            Cell::Number(f64::INFINITY),
            Cell::Number(-2.5),
        ]]);
        assert_eq!(
            result,
            vec![vec![
                Cell::text("Invalid Number"),
                Cell::text("Invalid Number"),
                Cell::Number(-2.5)
            ]]
        );
    }

    #[test]
    fn test_nested_values_are_stringified() {
        let result = sanitize(&json!([[{"a": 1}, [1, 2]]]));
        assert_eq!(result, vec![vec![Cell::text(r#"{"a":1}"#), Cell::text("[1,2]")]]);
    }

    #[traced_test]
    #[test]
    fn test_failing_cell_is_isolated() {
        let result = sanitize(&json!([
            ["ok", "datetime.datetime(2024, 2, 30, 10, 0, 0)", 3],
            ["next row"]
        ]));
        assert_eq!(
            result,
            vec![
                vec![Cell::text("ok"), Cell::text("Error"), Cell::Number(3.0)],
                vec![Cell::text("next row")]
            ]
        );
        assert!(logs_contain("Error processing cell [0][1]"));
    }

    #[test]
    fn test_render_failure_uses_sentinel() {
        let formatter = ResultFormatter::new(FormatSettings {
            datetime_format: "%Y-%".to_string(),
            error_sentinel: "ERR".to_string(),
            ..Default::default()
        });
        let result = formatter.sanitize_json(&json!([["2024-01-15T10:30:00", "fine"]]));
        assert_eq!(result, vec![vec![Cell::text("ERR"), Cell::text("fine")]]);
    }

    #[test]
    fn test_kind_hints() {
        let formatter = ResultFormatter::default();
        let kinds = [
            ColumnKind::Integer,
            ColumnKind::Currency,
            ColumnKind::Text,
            ColumnKind::Decimal,
        ];
        let result = formatter.sanitize_with_kinds(
            &json!([["50", 5, "2024-01-15T10:30:00", "19.99", "42.5"]]),
            &kinds,
        );
        assert_eq!(
            result,
            vec![vec![
                Cell::text("50"),
                Cell::text("$5.00"),
                Cell::text("2024-01-15T10:30:00"),
                Cell::text("19.99"),
                Cell::text("$42.50"),
            ]]
        );
    }

    #[test]
    fn test_huge_decimal_exponent_passes_through() {
        let result = sanitize(&json!([["Decimal('1E+2000000')", "after"]]));
        assert_eq!(
            result,
            vec![vec![Cell::text("Decimal('1E+2000000')"), Cell::text("after")]]
        );
    }

    #[test]
    fn test_legacy_patterns_can_be_disabled() {
        let formatter = ResultFormatter::new(FormatSettings {
            legacy_patterns: false,
            ..Default::default()
        });
        let result = formatter.sanitize_json(&json!([["Decimal('1.50')"]]));
        assert_eq!(result, vec![vec![Cell::text("Decimal('1.50')")]]);
    }
}
