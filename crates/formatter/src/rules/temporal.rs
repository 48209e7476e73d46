use super::{CellRule, RuleContext};
use crate::{
    error::CellError,
    patterns::{ISO_DATETIME_PREFIX, LEGACY_DATETIME, LEGACY_DATETIME_MARKER},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use model::core::{cell::Cell, column::ColumnKind};
use regex::Captures;
use std::fmt::Write;
use tracing::debug;

/// `2024-01-15T10:30:00[.fff][offset]` strings.
pub struct IsoTimestampRule;

impl CellRule for IsoTimestampRule {
    fn name(&self) -> &'static str {
        "iso_timestamp"
    }

    fn accepts(&self, kind: ColumnKind) -> bool {
        matches!(kind, ColumnKind::Unknown | ColumnKind::Timestamp)
    }

    fn apply(&self, text: &str, ctx: &RuleContext) -> Result<Option<Cell>, CellError> {
        if !ISO_DATETIME_PREFIX.is_match(text) {
            return Ok(None);
        }

        match parse_iso_datetime(text, ctx.settings.timezone) {
            Some(datetime) => render_datetime(&datetime, &ctx.settings.datetime_format)
                .map(|rendered| Some(Cell::Text(rendered))),
            None => {
                debug!("Unparseable ISO timestamp passed through: {text}");
                Ok(Some(Cell::text(text)))
            }
        }
    }
}

/// `datetime.datetime(2024, 1, 15, 10, 30, 0[, 123456])` debug strings.
pub struct LegacyDateTimeRule;

impl CellRule for LegacyDateTimeRule {
    fn name(&self) -> &'static str {
        "legacy_datetime"
    }

    fn accepts(&self, kind: ColumnKind) -> bool {
        matches!(kind, ColumnKind::Unknown | ColumnKind::Timestamp)
    }

    fn apply(&self, text: &str, ctx: &RuleContext) -> Result<Option<Cell>, CellError> {
        if !text.contains(LEGACY_DATETIME_MARKER) {
            return Ok(None);
        }
        let Some(caps) = LEGACY_DATETIME.captures(text) else {
            return Ok(None);
        };

        let naive = legacy_components(&caps)?;
        let local = ctx
            .settings
            .timezone
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| CellError::InvalidTimestamp(caps[0].to_string()))?;

        render_datetime(&local, &ctx.settings.datetime_format).map(|s| Some(Cell::Text(s)))
    }
}

/// Parses an ISO-8601 date-time. Values with an offset are converted to
/// `tz`; values without one are read as wall-clock time in `tz`.
pub fn parse_iso_datetime(text: &str, tz: Tz) -> Option<DateTime<Tz>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&tz));
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&tz));
    }

    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
}

pub fn render_datetime(datetime: &DateTime<Tz>, format: &str) -> Result<String, CellError> {
    let mut out = String::new();
    write!(out, "{}", datetime.format(format)).map_err(|_| CellError::Render(format.to_string()))?;
    Ok(out)
}

fn legacy_components(caps: &Captures) -> Result<NaiveDateTime, CellError> {
    // Months are 1-based in the upstream representation, as in chrono.
    let year = component::<i32>(caps, 1, "year")?;
    let month = component::<u32>(caps, 2, "month")?;
    let day = component::<u32>(caps, 3, "day")?;
    let hour = component::<u32>(caps, 4, "hour")?;
    let minute = component::<u32>(caps, 5, "minute")?;
    let second = component::<u32>(caps, 6, "second")?;
    let micro = match caps.get(7) {
        Some(_) => component::<u32>(caps, 7, "microsecond")?,
        None => 0,
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_micro_opt(hour, minute, second, micro))
        .ok_or_else(|| CellError::InvalidTimestamp(caps[0].to_string()))
}

fn component<T: std::str::FromStr>(
    caps: &Captures,
    idx: usize,
    field: &'static str,
) -> Result<T, CellError> {
    let raw = caps.get(idx).map(|m| m.as_str()).unwrap_or_default();
    raw.parse::<T>().map_err(|_| CellError::ComponentOutOfRange {
        field,
        value: raw.to_string(),
    })
}
