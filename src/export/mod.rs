//! Export blobs.
//!
//! Every export starts from the raw record, sanitizes it in export mode and
//! then renders one of three formats:
//!
//! ```text
//! raw -> sanitize(export) -> flatten -> CSV text
//! raw -> sanitize(export) -> pretty JSON text
//! raw -> sanitize(export) -> dossier -> report -> DOCX bytes
//! ```

pub mod csv;
pub mod docx;
pub mod json;

pub use self::csv::export_csv;
pub use self::docx::{docx_for_record, generate_docx, render_docx, report_file_name};
pub use self::json::export_json;

use crate::error::ExportError;
use std::str::FromStr;

/// Output formats offered for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
    Docx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Docx => "docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// `<stem>.<extension>`
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "docx" | "doc" => Ok(Self::Docx),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}
