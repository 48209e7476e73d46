use crate::core::cell::Cell;
use serde_json::Value as JsonValue;

pub type Row = Vec<Cell>;
pub type ResultSet = Vec<Row>;

/// A cell as it arrived over the wire, before any formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Scalar(Cell),
    /// Objects and arrays nested inside a row.
    Other(JsonValue),
}

/// A row as it arrived over the wire. `Malformed` keeps the position of an
/// entry that was not a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRow {
    Cells(Vec<RawCell>),
    Malformed,
}

impl From<&JsonValue> for RawCell {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => RawCell::Scalar(Cell::Null),
            JsonValue::Bool(v) => RawCell::Scalar(Cell::Boolean(*v)),
            JsonValue::Number(n) => match n.as_f64() {
                Some(v) => RawCell::Scalar(Cell::Number(v)),
                None => RawCell::Other(value.clone()),
            },
            JsonValue::String(s) => RawCell::Scalar(Cell::Text(s.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => RawCell::Other(value.clone()),
        }
    }
}

impl From<Cell> for RawCell {
    fn from(value: Cell) -> Self {
        RawCell::Scalar(value)
    }
}

impl From<&Row> for RawRow {
    fn from(row: &Row) -> Self {
        RawRow::Cells(row.iter().cloned().map(RawCell::from).collect())
    }
}
