use crate::{
    error::ReprError,
    parser::{ReprParser, Rule},
};
use chrono::NaiveDate;
use pest::{Parser, iterators::Pair};
use serde_json::{Number, Value as JsonValue};
use tracing::debug;

/// Placeholder emitted for datetime components that do not form a real
/// calendar value.
pub const INVALID_DATE: &str = "Invalid Date";

/// Parses a Python `repr()` payload into JSON.
///
/// Tuples become arrays, `Decimal('x')` becomes the string `"x"`, and
/// `datetime.datetime(...)` / `datetime.date(...)` become ISO-8601 strings.
pub fn parse_repr(input: &str) -> Result<JsonValue, ReprError> {
    let mut pairs = ReprParser::parse(Rule::payload, input).map_err(ReprError::from_pest_error)?;

    let value = pairs
        .next()
        .and_then(|payload| payload.into_inner().next())
        .ok_or_else(|| ReprError::Unexpected("empty payload".to_string()))?;

    convert_value(value)
}

fn convert_value(pair: Pair<Rule>) -> Result<JsonValue, ReprError> {
    match pair.as_rule() {
        Rule::list | Rule::tuple => pair
            .into_inner()
            .map(convert_value)
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        Rule::none => Ok(JsonValue::Null),
        Rule::boolean => Ok(JsonValue::Bool(pair.as_str() == "True")),
        Rule::number => convert_number(pair.as_str()),
        Rule::string => Ok(JsonValue::String(string_content(pair))),
        Rule::decimal => {
            let inner = pair
                .into_inner()
                .next()
                .map(string_content)
                .unwrap_or_default();
            Ok(JsonValue::String(inner))
        }
        Rule::datetime => Ok(JsonValue::String(convert_datetime(pair)?)),
        Rule::date => Ok(JsonValue::String(convert_date(pair)?)),
        other => Err(ReprError::Unexpected(format!("{other:?}"))),
    }
}

fn convert_number(raw: &str) -> Result<JsonValue, ReprError> {
    let is_float = raw.contains(['.', 'e', 'E']);
    if !is_float {
        if let Ok(v) = raw.parse::<i64>() {
            return Ok(JsonValue::Number(v.into()));
        }
        if let Ok(v) = raw.parse::<u64>() {
            return Ok(JsonValue::Number(v.into()));
        }
    }

    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(JsonValue::Number)
        .ok_or_else(|| ReprError::InvalidNumber(raw.to_string()))
}

fn integer_components(pair: Pair<Rule>) -> Result<(Vec<i64>, Vec<String>), ReprError> {
    let mut numbers = Vec::new();
    let mut keywords = Vec::new();

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::integer => {
                let v = part
                    .as_str()
                    .parse::<i64>()
                    .map_err(|_| ReprError::InvalidNumber(part.as_str().to_string()))?;
                numbers.push(v);
            }
            Rule::keyword_arg => keywords.push(part.as_str().to_string()),
            other => return Err(ReprError::Unexpected(format!("{other:?}"))),
        }
    }

    Ok((numbers, keywords))
}

fn convert_datetime(pair: Pair<Rule>) -> Result<String, ReprError> {
    let raw = pair.as_str().to_string();
    let (parts, keywords) = integer_components(pair)?;

    // Python omits trailing zero components (seconds, microseconds).
    if !(3..=7).contains(&parts.len()) {
        debug!("Datetime with {} components: {raw}", parts.len());
        return Ok(INVALID_DATE.to_string());
    }
    let component = |idx: usize| parts.get(idx).copied().unwrap_or(0);

    let datetime = to_u32(component(1))
        .zip(to_u32(component(2)))
        .and_then(|(month, day)| NaiveDate::from_ymd_opt(i32::try_from(parts[0]).ok()?, month, day))
        .and_then(|date| {
            date.and_hms_micro_opt(
                to_u32(component(3))?,
                to_u32(component(4))?,
                to_u32(component(5))?,
                to_u32(component(6))?,
            )
        });

    let Some(datetime) = datetime else {
        debug!("Datetime components out of range: {raw}");
        return Ok(INVALID_DATE.to_string());
    };

    let mut iso = if component(6) > 0 {
        datetime.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    } else {
        datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
    };

    if keywords.iter().any(|kw| is_utc_tzinfo(kw)) {
        iso.push_str("+00:00");
    }

    Ok(iso)
}

fn convert_date(pair: Pair<Rule>) -> Result<String, ReprError> {
    let raw = pair.as_str().to_string();
    let (parts, _) = integer_components(pair)?;

    let date = match parts.as_slice() {
        [year, month, day] => i32::try_from(*year)
            .ok()
            .zip(to_u32(*month))
            .zip(to_u32(*day))
            .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d)),
        _ => None,
    };

    match date {
        Some(date) => Ok(date.format("%Y-%m-%d").to_string()),
        None => {
            debug!("Invalid date literal: {raw}");
            Ok(INVALID_DATE.to_string())
        }
    }
}

fn to_u32(v: i64) -> Option<u32> {
    u32::try_from(v).ok()
}

fn is_utc_tzinfo(keyword_arg: &str) -> bool {
    let lower = keyword_arg.to_ascii_lowercase();
    lower.starts_with("tzinfo") && lower.contains("utc")
}

fn string_content(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|inner| unescape(inner.as_str()))
        .unwrap_or_default()
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('x') => push_code_point(&mut out, &mut chars, 2, 'x'),
            Some('u') => push_code_point(&mut out, &mut chars, 4, 'u'),
            Some('U') => push_code_point(&mut out, &mut chars, 8, 'U'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

fn push_code_point(out: &mut String, chars: &mut std::str::Chars<'_>, width: usize, marker: char) {
    let digits: String = chars.by_ref().take(width).collect();
    match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
        Some(ch) if digits.len() == width => out.push(ch),
        _ => {
            out.push('\\');
            out.push(marker);
            out.push_str(&digits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"it\'s"), "it's");
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r"caf\xe9"), "café");
        assert_eq!(unescape(r"été"), "été");
        assert_eq!(unescape(r"bad\xZ"), r"bad\xZ");
    }

    #[test]
    fn test_convert_number() {
        assert_eq!(convert_number("42").unwrap(), json!(42));
        assert_eq!(convert_number("-7").unwrap(), json!(-7));
        assert_eq!(convert_number("1.5").unwrap(), json!(1.5));
        assert_eq!(convert_number("1e-05").unwrap(), json!(0.00001));
        assert_eq!(
            convert_number("18446744073709551615").unwrap(),
            json!(18446744073709551615u64)
        );
    }

    #[test]
    fn test_utc_tzinfo_detection() {
        assert!(is_utc_tzinfo("tzinfo=datetime.timezone.utc"));
        assert!(is_utc_tzinfo("tzinfo=<UTC>"));
        assert!(!is_utc_tzinfo("fold=1"));
    }
}
