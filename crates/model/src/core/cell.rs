use serde::{Deserialize, Serialize};
use std::fmt;

/// A single display-ready scalar in a query result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "NULL"),
            Cell::Boolean(v) => write!(f, "{v}"),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Boolean(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_round_trip_shape() {
        let row: Vec<Cell> = serde_json::from_str(r#"[null, true, 42, "plain"]"#).unwrap();
        assert_eq!(
            row,
            vec![
                Cell::Null,
                Cell::Boolean(true),
                Cell::Number(42.0),
                Cell::text("plain")
            ]
        );

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[null,true,42.0,"plain"]"#);
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::Null.to_string(), "NULL");
        assert_eq!(Cell::Number(42.0).to_string(), "42");
        assert_eq!(Cell::Number(1.5).to_string(), "1.5");
        assert_eq!(Cell::Boolean(false).to_string(), "false");
    }

    #[test]
    fn test_option_conversion() {
        let none: Option<i64> = None;
        assert_eq!(Cell::from(none), Cell::Null);
        assert_eq!(Cell::from(Some("x")), Cell::text("x"));
    }
}
