use crate::error::FormatError;
use chrono::format::{Item, StrftimeItems};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Knobs for the result formatter. Defaults reproduce the behavior of the
/// web table: US-style timestamps in UTC, dollar amounts, 100 character
/// cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    pub max_text_len: usize,
    pub ellipsis: String,

    pub currency_symbol: String,
    /// Bare integers strictly between `currency_min` and `currency_max` are
    /// rendered as currency when `detect_integer_currency` is set.
    pub currency_min: f64,
    pub currency_max: f64,
    pub detect_integer_currency: bool,

    pub timezone: Tz,
    pub datetime_format: String,

    /// Reverse-engineer `datetime.datetime(...)` and `Decimal('...')` strings.
    pub legacy_patterns: bool,

    pub invalid_number: String,
    pub error_sentinel: String,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            max_text_len: 100,
            ellipsis: "...".to_string(),
            currency_symbol: "$".to_string(),
            currency_min: 10.0,
            currency_max: 10000.0,
            detect_integer_currency: true,
            timezone: Tz::UTC,
            datetime_format: "%-m/%-d/%Y, %-I:%M:%S %p".to_string(),
            legacy_patterns: true,
            invalid_number: "Invalid Number".to_string(),
            error_sentinel: "Error".to_string(),
        }
    }
}

impl FormatSettings {
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.currency_min.is_nan()
            || self.currency_max.is_nan()
            || self.currency_min >= self.currency_max
        {
            return Err(FormatError::InvalidCurrencyRange {
                min: self.currency_min,
                max: self.currency_max,
            });
        }

        if self.max_text_len == 0 {
            return Err(FormatError::InvalidSetting {
                name: "max_text_len".to_string(),
                message: "must be positive".to_string(),
            });
        }

        if self.datetime_format.trim().is_empty()
            || StrftimeItems::new(&self.datetime_format).any(|item| matches!(item, Item::Error))
        {
            return Err(FormatError::InvalidDatetimeFormat(
                self.datetime_format.clone(),
            ));
        }

        Ok(())
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }
}
