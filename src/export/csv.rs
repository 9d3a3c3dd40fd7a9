//! CSV export.
//!
//! One header row of formatted path labels and one data row. Every value is
//! quoted with inner quotes doubled; headers are quoted only when they need
//! it.

use crate::config::ExportOptions;
use crate::error::{ExportError, ExportResult};
use crate::flatten::flatten;
use crate::format::{format_csv_header, value_text};
use crate::sanitize::sanitize;
use serde_json::Value;

/// Request metadata attached by the proxy layer; not part of the record.
/// Only the root key is dropped: a nested `metadata` field is record data
/// and stays in the row.
const METADATA_KEY: &str = "metadata";

/// Export `record` as a two-line CSV blob.
///
/// Fails with [`ExportError::NoData`] when nothing survives sanitization.
pub fn export_csv(record: &Value, options: &ExportOptions) -> ExportResult<String> {
    let mut clean = sanitize(record, options.sanitize_options());
    if let Value::Object(map) = &mut clean {
        map.remove(METADATA_KEY);
    }

    let row = flatten(&clean);
    if row.is_empty() {
        return Err(ExportError::NoData);
    }

    let header = row
        .keys()
        .map(|path| quote_if_needed(&format_csv_header(path)))
        .collect::<Vec<_>>()
        .join(",");
    let values = row
        .iter()
        .map(|(_, value)| quote(&value_text(value)))
        .collect::<Vec<_>>()
        .join(",");

    tracing::info!(columns = row.len(), "[CsvExport] Exported record");
    Ok(format!("{header}\n{values}"))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn quote_if_needed(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quote(field)
    } else {
        field.to_string()
    }
}
