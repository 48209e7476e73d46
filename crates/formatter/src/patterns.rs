//! Compiled patterns shared by the cell rules and the label heuristic.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref ISO_DATETIME_PREFIX: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").unwrap();

    pub static ref BARE_DECIMAL: Regex = Regex::new(r"^\d+\.?\d*$").unwrap();

    pub static ref LEGACY_DATETIME: Regex = Regex::new(
        r"datetime\.datetime\((\d+),\s*(\d+),\s*(\d+),\s*(\d+),\s*(\d+),\s*(\d+)(?:,\s*(\d+))?\)"
    )
    .unwrap();

    pub static ref LEGACY_DECIMAL: Regex = Regex::new(r"Decimal\('(.+)'\)").unwrap();

    pub static ref FROM_KEYWORD: Regex = Regex::new(r"(?i)\bfrom\b").unwrap();

    pub static ref LEADING_SELECT: Regex = Regex::new(r"(?i)^\s*select\b").unwrap();

    pub static ref AS_TOKEN: Regex = Regex::new(r"(?i)\s+as\s+").unwrap();
}

pub const LEGACY_DATETIME_MARKER: &str = "datetime.datetime";
pub const LEGACY_DECIMAL_OPEN: &str = "Decimal('";
pub const LEGACY_DECIMAL_CLOSE: &str = "')";
