//! Date formatting.
//!
//! Two formatters, one per call site:
//! - [`format_date`] feeds the dossier view: `MM/DD/YYYY`, `N/A` when the
//!   value does not parse.
//! - [`format_export_date`] feeds document export: `YYYY-MM-DD`, the original
//!   text when it does not parse, `N/A` only for a missing value.
//!
//! The two failure values disagree. Keep them separate until one is chosen.

use super::{value_text, NOT_AVAILABLE};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%d %B %Y"];

/// Parse a loosely formatted date string into a UTC calendar date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    // Partial dates: "2020-05" and "2020"
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Some(date);
    }
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().ok().and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    None
}

/// Strings parse as dates, numbers as epoch milliseconds
fn date_of(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date(s),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.date_naive())
        }
        _ => None,
    }
}

/// Dossier-facing date: `MM/DD/YYYY`, or `N/A` when unparseable
pub fn format_date(value: &Value) -> String {
    match date_of(value) {
        Some(date) => date.format("%m/%d/%Y").to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Export-facing date: `YYYY-MM-DD`, the original text when unparseable,
/// `N/A` when missing
pub fn format_export_date(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(v) => match date_of(v) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => value_text(v),
        },
    }
}

/// Report timestamp: `YYYY-MM-DD HH:MM UTC`
pub fn format_date_time(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M UTC").to_string()
}
