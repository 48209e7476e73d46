use super::{CellRule, RuleContext};
use crate::{
    error::CellError,
    patterns::{BARE_DECIMAL, LEGACY_DECIMAL, LEGACY_DECIMAL_CLOSE, LEGACY_DECIMAL_OPEN},
};
use bigdecimal::{BigDecimal, RoundingMode};
use model::core::{cell::Cell, column::ColumnKind};
use std::str::FromStr;
use tracing::debug;

/// Largest scale, in either direction, accepted as an amount. Beyond it the
/// two-place rendering would expand to an unbounded number of digits.
const MAX_DECIMAL_SCALE: i64 = 400;

/// Bare positive numerals that look like prices: anything with a decimal
/// point, plus integers inside the configured range.
///
/// The integer range is a guess and misreads quantities such as `"50"`;
/// backends that report column types avoid it through [`ColumnKind`] hints.
pub struct BareDecimalRule;

impl CellRule for BareDecimalRule {
    fn name(&self) -> &'static str {
        "bare_decimal"
    }

    fn accepts(&self, kind: ColumnKind) -> bool {
        matches!(kind, ColumnKind::Unknown | ColumnKind::Currency)
    }

    fn apply(&self, text: &str, ctx: &RuleContext) -> Result<Option<Cell>, CellError> {
        if !BARE_DECIMAL.is_match(text) {
            return Ok(None);
        }
        let Ok(approx) = text.parse::<f64>() else {
            return Ok(None);
        };
        if approx <= 0.0 {
            return Ok(None);
        }

        let settings = ctx.settings;
        let looks_like_price = ctx.kind == ColumnKind::Currency
            || text.contains('.')
            || (settings.detect_integer_currency
                && approx > settings.currency_min
                && approx < settings.currency_max);
        if !looks_like_price {
            return Ok(None);
        }

        Ok(parse_decimal(text)
            .map(|value| Cell::Text(format_currency(&value, &settings.currency_symbol))))
    }
}

/// `Decimal('19.99')` debug strings.
pub struct LegacyDecimalRule;

impl CellRule for LegacyDecimalRule {
    fn name(&self) -> &'static str {
        "legacy_decimal"
    }

    fn accepts(&self, kind: ColumnKind) -> bool {
        matches!(
            kind,
            ColumnKind::Unknown | ColumnKind::Currency | ColumnKind::Decimal
        )
    }

    fn apply(&self, text: &str, ctx: &RuleContext) -> Result<Option<Cell>, CellError> {
        if !(text.contains(LEGACY_DECIMAL_OPEN) && text.contains(LEGACY_DECIMAL_CLOSE)) {
            return Ok(None);
        }
        let Some(caps) = LEGACY_DECIMAL.captures(text) else {
            return Ok(None);
        };

        let rendered = match parse_decimal(&caps[1]) {
            Some(value) if ctx.kind == ColumnKind::Decimal => value.to_string(),
            Some(value) => format_currency(&value, &ctx.settings.currency_symbol),
            None => {
                debug!("Decimal wrapper with non-numeric content passed through: {text}");
                text.to_string()
            }
        };
        Ok(Some(Cell::Text(rendered)))
    }
}

/// Parses a decimal numeral. Accepts a trailing point (`"19."`) and rejects
/// exponents that would put the value more than `MAX_DECIMAL_SCALE` places
/// away from the point.
pub fn parse_decimal(text: &str) -> Option<BigDecimal> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    let value = BigDecimal::from_str(trimmed).ok()?;

    let (_, scale) = value.as_bigint_and_exponent();
    if scale.abs() > MAX_DECIMAL_SCALE {
        debug!("Decimal {trimmed} has scale {scale}, not treated as an amount");
        return None;
    }
    Some(value)
}

/// Two decimal places, half-up, prefixed with `symbol`.
pub fn format_currency(value: &BigDecimal, symbol: &str) -> String {
    format!("{symbol}{}", value.with_scale_round(2, RoundingMode::HalfUp))
}

/// Currency rendering for numeric cells in columns declared as currency.
pub fn format_currency_f64(value: f64, symbol: &str) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    parse_decimal(&value.to_string()).map(|v| format_currency(&v, symbol))
}
