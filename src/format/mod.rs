//! Value and key formatting.
//!
//! Pure, total functions turning arbitrary record values into display
//! strings. Every entity type shares [`format_display_value`]; its object
//! fallback chain is what lets a name, phone, email or url render through
//! the same code path.

pub mod date;
pub mod key;

pub use date::{format_date, format_date_time, format_export_date};
pub use key::{capitalize_first, format_csv_header, format_key, is_metadata_key};

use crate::record::keys;
use serde_json::{Map, Number, Value};

/// Placeholder for missing values
pub const NOT_AVAILABLE: &str = "N/A";

/// Render any record value for display.
///
/// - missing / null -> `N/A`
/// - a date-like `key_hint` (`date`, `since`, `seen`) -> dossier date format
/// - primitives -> their text
/// - objects -> first truthy of `display`, `content`, `address`, `url`,
///   `number`; else the space-joined name parts; else compact JSON
pub fn format_display_value(value: Option<&Value>, key_hint: Option<&str>) -> String {
    let value = match value {
        None | Some(Value::Null) => return NOT_AVAILABLE.to_string(),
        Some(v) => v,
    };

    if key_hint.is_some_and(keys::is_date_hint) {
        return date::format_date(value);
    }

    match value {
        Value::Object(map) => display_object(map),
        Value::Array(_) => value.to_string(),
        scalar => value_text(scalar),
    }
}

/// Shared object chain: display fields, then name parts, then compact JSON
pub fn display_object(map: &Map<String, Value>) -> String {
    if let Some(found) = first_truthy(map, keys::DISPLAY_CHAIN) {
        return format_display_value(Some(found), None);
    }
    if let Some(name) = name_from_parts(map) {
        return name;
    }
    Value::Object(map.clone()).to_string()
}

/// Space-joined `first middle last`, when any part is present
pub fn name_from_parts(map: &Map<String, Value>) -> Option<String> {
    let parts: Vec<String> = keys::NAME_PARTS
        .iter()
        .filter_map(|k| map.get(*k))
        .filter(|v| is_truthy(v))
        .map(value_text)
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// First field of `chain` holding a truthy value
pub fn first_truthy<'a>(map: &'a Map<String, Value>, chain: &[&str]) -> Option<&'a Value> {
    chain
        .iter()
        .filter_map(|k| map.get(*k))
        .find(|v| is_truthy(v))
}

/// First field of `chain` holding a truthy value, rendered as text
pub fn first_text(map: &Map<String, Value>, chain: &[&str]) -> Option<String> {
    first_truthy(map, chain).map(|v| format_display_value(Some(v), None))
}

/// Loose truthiness: null, false, 0 and "" are empty
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Plain text of a value as written into CSV cells and joined lists.
///
/// Strings are unquoted, integral floats drop their `.0`, arrays join their
/// elements with `,`, and objects fall back to compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn number_text(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// Regroup phone digits for display.
///
/// 12 digits -> `+XX XXX XXX XXXX`, 11 -> `+X XXX XXX XXXX`,
/// 10 -> `XXX XXX XXXX`; anything else is returned unchanged.
pub fn format_phone_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        12 => format!(
            "+{} {} {} {}",
            &digits[..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..]
        ),
        11 => format!(
            "+{} {} {} {}",
            &digits[..1],
            &digits[1..4],
            &digits[4..7],
            &digits[7..]
        ),
        10 => format!("{} {} {}", &digits[..3], &digits[3..6], &digits[6..]),
        _ => raw.to_string(),
    }
}
