use crate::records::result_set::{RawCell, RawRow, ResultSet};
use serde_json::Value as JsonValue;
use tracing::warn;

/// Structural decode of a JSON result body into raw rows.
///
/// Never fails: a top level that is not an array decodes to no rows, and an
/// entry that is not an array decodes to [`RawRow::Malformed`] so sibling rows
/// keep their positions.
pub fn decode_result_set(value: &JsonValue) -> Vec<RawRow> {
    let Some(rows) = value.as_array() else {
        warn!("Invalid result format: expected array, got {}", json_kind(value));
        return Vec::new();
    };

    rows.iter()
        .enumerate()
        .map(|(row_index, row)| match row.as_array() {
            Some(cells) => RawRow::Cells(cells.iter().map(RawCell::from).collect()),
            None => {
                warn!(
                    "Invalid row format at index {row_index}: expected array, got {}",
                    json_kind(row)
                );
                RawRow::Malformed
            }
        })
        .collect()
}

/// Lifts an already typed result set into raw rows.
pub fn raw_rows(result: &ResultSet) -> Vec<RawRow> {
    result.iter().map(RawRow::from).collect()
}

pub fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cell::Cell;
    use serde_json::json;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_non_array_top_level() {
        assert!(decode_result_set(&json!({"rows": []})).is_empty());
        assert!(decode_result_set(&json!("[[1]]")).is_empty());
        assert!(decode_result_set(&JsonValue::Null).is_empty());
        assert!(logs_contain("expected array, got object"));
    }

    #[traced_test]
    #[test]
    fn test_malformed_row_keeps_position() {
        let rows = decode_result_set(&json!([[1, "a"], 7, [null]]));
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            RawRow::Cells(vec![
                RawCell::Scalar(Cell::Number(1.0)),
                RawCell::Scalar(Cell::text("a"))
            ])
        );
        assert_eq!(rows[1], RawRow::Malformed);
        assert_eq!(rows[2], RawRow::Cells(vec![RawCell::Scalar(Cell::Null)]));
        assert!(logs_contain("Invalid row format at index 1"));
    }

    #[test]
    fn test_nested_values_are_kept_raw() {
        let rows = decode_result_set(&json!([[{"k": 1}, [1, 2]]]));
        match &rows[0] {
            RawRow::Cells(cells) => {
                assert_eq!(cells[0], RawCell::Other(json!({"k": 1})));
                assert_eq!(cells[1], RawCell::Other(json!([1, 2])));
            }
            RawRow::Malformed => panic!("row should decode"),
        }
    }
}
