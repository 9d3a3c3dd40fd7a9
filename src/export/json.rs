//! JSON export.

use crate::config::ExportOptions;
use crate::error::{ExportError, ExportResult};
use crate::sanitize::sanitize;
use serde_json::Value;

/// Pretty-printed, export-sanitized copy of `record`
pub fn export_json(record: &Value, options: &ExportOptions) -> ExportResult<String> {
    if record.is_null() {
        return Err(ExportError::NoData);
    }

    let clean = sanitize(record, options.sanitize_options());
    let text = serde_json::to_string_pretty(&clean)?;

    tracing::info!(bytes = text.len(), "[JsonExport] Exported record");
    Ok(text)
}
