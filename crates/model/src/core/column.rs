use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

/// Display label for a result column, derived positionally from the query text.
pub type ColumnLabel = String;

/// Declared type of a result column, when the backend reports one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Integer,
    Decimal,
    Currency,
    Timestamp,
    Boolean,
    #[default]
    Unknown,
}

lazy_static! {
    static ref SQL_TYPE_MAP: HashMap<&'static str, ColumnKind> = build_sql_type_map();
}

impl ColumnKind {
    /// Maps a database type name (`"numeric(10,2)"`, `"TIMESTAMP WITH TIME ZONE"`,
    /// `"varchar"`) onto a column kind. Unrecognized names map to `Unknown`.
    pub fn from_sql_type(type_name: &str) -> Self {
        let normalized = Self::normalize_type_name(type_name);
        SQL_TYPE_MAP
            .get(normalized.as_str())
            .copied()
            .unwrap_or(ColumnKind::Unknown)
    }

    fn normalize_type_name(type_name: &str) -> String {
        let lower = type_name.trim().to_ascii_lowercase();
        let base = match lower.find('(') {
            Some(idx) => &lower[..idx],
            None => lower.as_str(),
        };
        base.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Text => "text",
            ColumnKind::Integer => "integer",
            ColumnKind::Decimal => "decimal",
            ColumnKind::Currency => "currency",
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

fn build_sql_type_map() -> HashMap<&'static str, ColumnKind> {
    use ColumnKind::*;

    let mut map = HashMap::new();
    for name in ["text", "varchar", "character varying", "char", "character", "string", "uuid"] {
        map.insert(name, Text);
    }
    for name in [
        "int", "integer", "int2", "int4", "int8", "smallint", "bigint", "tinyint", "mediumint",
        "serial", "bigserial",
    ] {
        map.insert(name, Integer);
    }
    for name in ["decimal", "numeric", "real", "float", "float4", "float8", "double", "double precision"] {
        map.insert(name, Decimal);
    }
    map.insert("money", Currency);
    for name in [
        "timestamp",
        "timestamptz",
        "timestamp with time zone",
        "timestamp without time zone",
        "datetime",
        "date",
    ] {
        map.insert(name, Timestamp);
    }
    for name in ["bool", "boolean"] {
        map.insert(name, Boolean);
    }
    map
}
