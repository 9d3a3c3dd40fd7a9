//! Export error types.

use thiserror::Error;

/// Errors surfaced at the export boundary.
///
/// Extraction and formatting never fail; only locating the record and
/// producing an output blob can.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// The input carried nothing to render.
    #[error("No data to export")]
    NoData,

    /// Requested export format is not one of csv, json or docx.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Failed to serialize a record tree.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The document writer rejected the report.
    #[error("DOCX generation failed: {0}")]
    Docx(String),

    /// The blocking render task did not complete.
    #[error("Render task failed: {0}")]
    Task(String),
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
