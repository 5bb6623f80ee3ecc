//! Display formatting for money, percentages, dates and metric values.
//!
//! Output follows en-US conventions with USD amounts. Every formatter is total:
//! values that cannot be shown render as [`PLACEHOLDER`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::domain::rounding::round_to;

pub const PLACEHOLDER: &str = "—";

const COMPACT_UNITS: [(f64, &str); 3] = [(1e12, "T"), (1e9, "B"), (1e6, "M")];

/// Format a USD amount.
///
/// Amounts of a million and above use compact notation (`$1.5M`); amounts from
/// 1,000 carry one decimal (`$12,345.7`) and smaller amounts two (`$999.50`).
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    if value >= 1_000_000.0 {
        return format_compact_currency(value);
    }

    let digits = if value >= 1_000.0 { 1 } else { 2 };
    let rounded = round_to(value.abs(), digits);
    let sign = if value < 0.0 && rounded > 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(rounded, digits as usize))
}

fn format_compact_currency(value: f64) -> String {
    let mut unit_index = COMPACT_UNITS
        .iter()
        .position(|(scale, _)| value >= *scale)
        .unwrap_or(COMPACT_UNITS.len() - 1);

    let mut mantissa = round_to(value / COMPACT_UNITS[unit_index].0, 1);
    // 999.96M rounds up into the next unit.
    if mantissa >= 1_000.0 && unit_index > 0 {
        unit_index -= 1;
        mantissa = round_to(value / COMPACT_UNITS[unit_index].0, 1);
    }

    let digits = if mantissa.fract() == 0.0 { 0 } else { 1 };
    format!(
        "${}{}",
        group_thousands(mantissa, digits),
        COMPACT_UNITS[unit_index].1
    )
}

/// Render a non-negative, already rounded value with comma grouping.
fn group_thousands(value: f64, digits: usize) -> String {
    let rendered = format!("{value:.digits$}");
    let (integer, fraction) = match rendered.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::with_capacity(rendered.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Fixed-decimal percentage with a trailing `%`. Non-finite input reads as 0.
///
/// Rounds the stored binary value, so `0.15` at one digit is `0.1%`.
pub fn format_percent(value: f64, digits: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:.digits$}%")
}

/// Read a timestamp as a calendar date.
///
/// Accepts RFC 3339 timestamps (converted to UTC), naive ISO date-times, plain
/// ISO dates and epoch milliseconds.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(ts.date());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        return value
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .map(|ts| ts.date_naive());
    }
    None
}

/// Short date such as `Jan 5, 2024`.
pub fn format_date_short(value: Option<&str>) -> String {
    value
        .and_then(parse_date)
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Realized multiple, e.g. `1.35x`.
pub fn format_moic(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.2}x", round_to(v, 2)),
        None => PLACEHOLDER.to_string(),
    }
}

/// How a numeric metric is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Currency,
    Percent,
    Months,
    Ratio,
    Number,
}

pub fn format_metric_value(value: Option<f64>, kind: MetricKind) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return PLACEHOLDER.to_string();
    };
    match kind {
        MetricKind::Currency => format_currency(value),
        MetricKind::Percent => format_percent(value, 1),
        MetricKind::Months => format!("{:.1} mo", round_to(value, 1)),
        MetricKind::Ratio => format!("{:.2}", round_to(value, 2)),
        MetricKind::Number => format!("{:.1}", round_to(value, 1)),
    }
}
