//! Coercions over render-context values shared by validation and helpers.
//!
//! Context values are plain [`serde_json::Value`]s. Documents are usually
//! filled from loosely-typed sources (forms, JSON APIs), so these coercions are
//! permissive: a date may arrive as an ISO string or as epoch milliseconds, a
//! number as a numeric string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Truthiness as template authors expect it: `false`, `0`, `""` and `null`
/// are false; everything else, including empty arrays and objects, is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text form of a value. `null` is empty, integral numbers have no
/// fractional part, arrays are comma-joined and objects render as JSON.
pub fn to_display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                n.as_f64().map(format_number).unwrap_or_default()
            }
        }
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(to_display).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// Numeric value of a number or a numeric string. Non-finite results are rejected.
pub fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// `n` with `decimals` fraction digits, rounding halves away from zero.
///
/// Rounding works on the exact value of `n`: `0.125` is a half and becomes
/// `0.13`, while `1.005` is stored as `1.00499...` and becomes `1.00`.
pub fn to_fixed(n: f64, decimals: usize) -> String {
    let Ok(half_bits) = i32::try_from(decimals + 1) else {
        return format!("{n:.decimals$}");
    };
    // A half at `decimals` digits has at most `decimals + 1` binary fraction
    // digits, so formatting it with one more digit is exact.
    let on_half = (n * 2f64.powi(half_bits)).fract() == 0.0
        && format!("{:.*}", decimals + 1, n).ends_with('5');
    let n = if on_half {
        f64::from_bits(n.to_bits() + 1)
    } else {
        n
    };
    format!("{n:.decimals$}")
}

/// Date value of a date string or epoch milliseconds, in UTC.
pub fn to_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_date(s),
        Value::Number(n) => {
            let millis = n.as_f64()?;
            if !millis.is_finite() {
                return None;
            }
            DateTime::<Utc>::from_timestamp_millis(millis.trunc() as i64).map(|dt| dt.naive_utc())
        }
        _ => None,
    }
}

/// Parse the date notations found in practice: RFC 3339, RFC 2822, ISO-like
/// date-times without offset, and common US/long-form dates.
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Insert `,` every three digits of an unsigned integer string.
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
