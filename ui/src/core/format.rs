//! Formatting helpers for presenting report metrics.

use serde_json::Value;
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

/// Placeholder shown for metrics the report does not carry.
pub const NOT_AVAILABLE: &str = "N/A";

/// Render a single metric value for a summary card.
///
/// Missing and `null` values collapse to [`NOT_AVAILABLE`]; nested lists and objects are not
/// card material and do the same.
pub fn format_metric(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(number)) => {
            if let Some(int) = number.as_i64() {
                int.to_string()
            } else if let Some(int) = number.as_u64() {
                int.to_string()
            } else {
                number
                    .as_f64()
                    .map(|float| format_number(float, 2))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string())
            }
        }
        Some(Value::String(text)) => format_timestamp(text).unwrap_or_else(|| text.clone()),
        Some(Value::Bool(flag)) => if *flag { "Yes" } else { "No" }.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Fixed-precision number with trailing zeros trimmed (`12.50` -> `12.5`, `3.00` -> `3`).
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let fixed = format!("{value:.decimals$}");
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}

/// Numbers with exactly `decimals` places (`12.5` -> `12.50`); anything else as
/// [`format_metric`].
pub fn format_fixed(value: Option<&Value>, decimals: usize) -> String {
    match value.and_then(Value::as_f64) {
        Some(number) if number.is_finite() => format!("{number:.decimals$}"),
        _ => format_metric(value),
    }
}

/// RFC 3339 timestamps render as `YYYY-MM-DD HH:MM`; anything else is left to the caller.
pub fn format_timestamp(raw: &str) -> Option<String> {
    let parsed = OffsetDateTime::parse(raw, &Rfc3339).ok()?;
    parsed
        .format(&format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .ok()
}

/// `YYYY-MM-DD` stamp used in export filenames.
pub fn iso_date(date: Date) -> String {
    date.format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| "report".into())
}
