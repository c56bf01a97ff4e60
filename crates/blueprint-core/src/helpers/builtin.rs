//! Built-in helpers.
//!
//! Each helper has a typed function (usable directly from Rust) and an
//! argument-list wrapper registered under its template name. Output follows
//! en-US conventions; dates are rendered in UTC.

use std::sync::Arc;

use serde_json::Value;

use super::Helper;
use crate::value;

pub const FORMAT_DATE: &str = "formatDate";
pub const CURRENCY: &str = "currency";
pub const PERCENTAGE: &str = "percentage";
pub const CONDITIONAL: &str = "conditional";
pub const LIST: &str = "list";

const DEFAULT_PERCENTAGE_DECIMALS: usize = 2;
const MAX_DECIMALS: usize = 100;
const DEFAULT_LIST_SEPARATOR: &str = ", ";

static NULL: Value = Value::Null;

/// Output style of [`format_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `1/15/2024`
    Short,
    /// `Monday, January 15, 2024`
    Long,
    /// `3:45:30 PM`
    Time,
    /// `1/15/2024, 3:45:30 PM`
    DateTime,
}

impl DateStyle {
    /// Resolve a style name; unknown names fall back to [`DateStyle::Short`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "long" => Self::Long,
            "time" => Self::Time,
            "datetime" => Self::DateTime,
            _ => Self::Short,
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            Self::Short => "%-m/%-d/%Y",
            Self::Long => "%A, %B %-d, %Y",
            Self::Time => "%-I:%M:%S %p",
            Self::DateTime => "%-m/%-d/%Y, %-I:%M:%S %p",
        }
    }
}

/// Format a date value (date string or epoch milliseconds) in `style`.
/// Values that are not dates yield `""`.
pub fn format_date(value: &Value, style: &str) -> String {
    value::to_datetime(value)
        .map(|dt| dt.format(DateStyle::from_name(style).pattern()).to_string())
        .unwrap_or_default()
}

/// Format `value` as an amount of currency `code` with two fraction digits
/// and thousands separators. Non-numeric values and malformed codes yield `""`.
pub fn currency(value: &Value, code: &str) -> String {
    let Some(amount) = value::to_number(value) else {
        return String::new();
    };
    let code = code.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return String::new();
    }

    let fixed = value::to_fixed(amount.abs(), 2);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let digits = format!("{}.{}", value::group_thousands(int_part), frac_part);
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };

    match currency_symbol(&code) {
        Some(symbol) => format!("{sign}{symbol}{digits}"),
        None => format!("{sign}{code}\u{a0}{digits}"),
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "INR" => "₹",
        "KRW" => "₩",
        "ILS" => "₪",
        "VND" => "₫",
        "PHP" => "₱",
        "CNY" => "CN¥",
        "CAD" => "CA$",
        "AUD" => "A$",
        "NZD" => "NZ$",
        "HKD" => "HK$",
        "MXN" => "MX$",
        "BRL" => "R$",
        "TWD" => "NT$",
        _ => return None,
    };
    Some(symbol)
}

/// `value * 100` with `decimals` fraction digits and a trailing `%`.
/// Non-numeric values yield `""`.
pub fn percentage(value: &Value, decimals: usize) -> String {
    match value::to_number(value) {
        Some(n) if decimals <= MAX_DECIMALS => {
            format!("{}%", value::to_fixed(n * 100.0, decimals))
        }
        _ => String::new(),
    }
}

/// `when_true` if `test` is truthy, else `when_false`.
pub fn conditional(test: &Value, when_true: &Value, when_false: &Value) -> String {
    if value::is_truthy(test) {
        value::to_display(when_true)
    } else {
        value::to_display(when_false)
    }
}

/// Array items joined by `separator`. Anything but an array yields `""`.
pub fn list(items: &Value, separator: &str) -> String {
    match items {
        Value::Array(items) => items
            .iter()
            .map(value::to_display)
            .collect::<Vec<_>>()
            .join(separator),
        _ => String::new(),
    }
}

fn arg(args: &[Value], index: usize) -> &Value {
    args.get(index).unwrap_or(&NULL)
}

/// An optional argument: absent and `null` both mean "not given".
fn optional_arg(args: &[Value], index: usize) -> Option<&Value> {
    args.get(index).filter(|v| !v.is_null())
}

struct Currency {
    default_code: String,
}

impl Helper for Currency {
    fn call(&self, args: &[Value]) -> String {
        match optional_arg(args, 1) {
            None => currency(arg(args, 0), &self.default_code),
            Some(Value::String(code)) => currency(arg(args, 0), code),
            Some(_) => String::new(),
        }
    }
}

fn format_date_helper(args: &[Value]) -> String {
    let style = optional_arg(args, 1).and_then(Value::as_str).unwrap_or("short");
    format_date(arg(args, 0), style)
}

fn percentage_helper(args: &[Value]) -> String {
    let decimals = match optional_arg(args, 1) {
        None => DEFAULT_PERCENTAGE_DECIMALS,
        Some(d) => match value::to_number(d) {
            Some(n) if n >= 0.0 => n.trunc() as usize,
            _ => return String::new(),
        },
    };
    percentage(arg(args, 0), decimals)
}

fn conditional_helper(args: &[Value]) -> String {
    conditional(arg(args, 0), arg(args, 1), arg(args, 2))
}

fn list_helper(args: &[Value]) -> String {
    let separator = optional_arg(args, 1)
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_LIST_SEPARATOR);
    list(arg(args, 0), separator)
}

/// The built-in helpers under their template names.
pub(crate) fn builtins(default_currency: &str) -> Vec<(&'static str, Arc<dyn Helper>)> {
    vec![
        (FORMAT_DATE, Arc::new(format_date_helper) as Arc<dyn Helper>),
        (
            CURRENCY,
            Arc::new(Currency {
                default_code: default_currency.to_string(),
            }) as Arc<dyn Helper>,
        ),
        (PERCENTAGE, Arc::new(percentage_helper) as Arc<dyn Helper>),
        (CONDITIONAL, Arc::new(conditional_helper) as Arc<dyn Helper>),
        (LIST, Arc::new(list_helper) as Arc<dyn Helper>),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_date_styles() {
        let date = json!("2024-01-15T15:45:30Z");
        assert_eq!(format_date(&date, "short"), "1/15/2024");
        assert_eq!(format_date(&date, "long"), "Monday, January 15, 2024");
        assert_eq!(format_date(&date, "time"), "3:45:30 PM");
        assert_eq!(format_date(&date, "datetime"), "1/15/2024, 3:45:30 PM");
    }

    #[test]
    fn test_format_date_unknown_style_is_short() {
        assert_eq!(format_date(&json!("2024-03-05"), "fancy"), "3/5/2024");
    }

    #[test]
    fn test_format_date_long_contains_year() {
        assert!(format_date(&json!("1999-12-31"), "long").contains("1999"));
    }

    #[test]
    fn test_format_date_invalid_input() {
        assert_eq!(format_date(&json!(null), "short"), "");
        assert_eq!(format_date(&json!(null), "long"), "");
        assert_eq!(format_date(&json!("yesterday-ish"), "short"), "");
        assert_eq!(format_date(&json!({"y": 2024}), "short"), "");
    }

    #[test]
    fn test_format_date_epoch_millis() {
        assert_eq!(format_date(&json!(0), "short"), "1/1/1970");
    }

    #[test]
    fn test_currency() {
        assert_eq!(currency(&json!(0), "USD"), "$0.00");
        assert_eq!(currency(&json!(1234567.891), "USD"), "$1,234,567.89");
        assert_eq!(currency(&json!(-42.5), "usd"), "-$42.50");
        assert_eq!(currency(&json!(99.99), "EUR"), "€99.99");
        assert_eq!(currency(&json!("1000"), "GBP"), "£1,000.00");
        assert_eq!(currency(&json!(5), "CHF"), "CHF\u{a0}5.00");
    }

    #[test]
    fn test_currency_rounds_halves_up() {
        assert_eq!(currency(&json!(0.125), "USD"), "$0.13");
        assert_eq!(currency(&json!(-0.125), "USD"), "-$0.13");
        assert_eq!(currency(&json!(999.995), "USD"), "$1,000.00");
        assert_eq!(currency(&json!(0.005), "EUR"), "€0.01");
    }

    #[test]
    fn test_currency_invalid_input() {
        assert_eq!(currency(&json!(null), "USD"), "");
        assert_eq!(currency(&json!("abc"), "USD"), "");
        assert_eq!(currency(&json!(true), "USD"), "");
        assert_eq!(currency(&json!(10), "DOLLARS"), "");
        assert_eq!(currency(&json!(-0.001), "USD"), "$0.00");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(&json!(0.5), 2), "50.00%");
        assert_eq!(percentage(&json!(0.12345), 0), "12%");
        assert_eq!(percentage(&json!(1), 1), "100.0%");
        assert_eq!(percentage(&json!(null), 2), "");
        assert_eq!(percentage(&json!(0.5), 101), "");
    }

    #[test]
    fn test_percentage_rounds_halves_up() {
        assert_eq!(percentage(&json!(0.125), 0), "13%");
        assert_eq!(percentage(&json!(0.0125), 1), "1.3%");
        assert_eq!(percentage(&json!(-0.125), 0), "-13%");
    }

    #[test]
    fn test_conditional() {
        assert_eq!(conditional(&json!(true), &json!("yes"), &json!("no")), "yes");
        assert_eq!(conditional(&json!(0), &json!("yes"), &json!("no")), "no");
        assert_eq!(conditional(&json!("x"), &json!(1), &json!(2)), "1");
        assert_eq!(conditional(&json!(null), &json!("yes"), &json!(null)), "");
    }

    #[test]
    fn test_list() {
        assert_eq!(list(&json!(["a", "b", "c"]), ", "), "a, b, c");
        assert_eq!(list(&json!([1, 2]), " | "), "1 | 2");
        assert_eq!(list(&json!([]), ", "), "");
        assert_eq!(list(&json!(null), ", "), "");
        assert_eq!(list(&json!("not-an-array"), ", "), "");
    }

    #[test]
    fn test_wrappers_defaults() {
        assert_eq!(format_date_helper(&[json!("2024-01-15")]), "1/15/2024");
        assert_eq!(percentage_helper(&[json!(0.5)]), "50.00%");
        assert_eq!(percentage_helper(&[json!(0.12345), json!(0)]), "12%");
        assert_eq!(percentage_helper(&[json!(0.5), json!(-1)]), "");
        assert_eq!(list_helper(&[json!(["a", "b", "c"])]), "a, b, c");
        assert_eq!(list_helper(&[]), "");
        assert_eq!(conditional_helper(&[json!(true), json!("a")]), "a");
        assert_eq!(conditional_helper(&[json!(false), json!("a")]), "");
    }

    #[test]
    fn test_currency_wrapper() {
        let helper = Currency {
            default_code: "USD".into(),
        };
        assert_eq!(helper.call(&[json!(0)]), "$0.00");
        assert_eq!(helper.call(&[json!(0), json!("EUR")]), "€0.00");
        assert_eq!(helper.call(&[json!(0), json!(5)]), "");
        assert_eq!(helper.call(&[]), "");
    }
}
