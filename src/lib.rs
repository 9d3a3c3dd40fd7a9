//! Normalization and rendering pipeline for identity-enrichment records.
//!
//! ## Architecture
//!
//! ```text
//!   raw record (serde_json::Value)
//!        │
//!        ▼
//!   sanitize ──────────────┬──────────────┬───────────────┐
//!        │                 │              │               │
//!        ▼                 ▼              ▼               ▼
//!   RecordView ──► build_dossier     flatten         pretty JSON
//!        │                 │              │
//!        ▼                 ▼              ▼
//!   record_sections   build_report      CSV
//!   (on-screen view)       │
//!                          ▼
//!                        DOCX
//! ```
//!
//! Every stage is a pure function over the record tree except DOCX packing,
//! which runs on the blocking pool behind [`export::generate_docx`].

pub mod config;
pub mod dossier;
pub mod error;
pub mod export;
pub mod flatten;
pub mod format;
pub mod record;
pub mod render;
pub mod sanitize;

pub use config::ExportOptions;
pub use dossier::{build_dossier, Dossier, DossierSummary, Entity, EntityKind};
pub use error::{ExportError, ExportResult};
pub use export::{
    docx_for_record, export_csv, export_json, generate_docx, report_file_name, ExportFormat,
};
pub use flatten::{flatten, FlatRow};
pub use format::format_display_value;
pub use record::RecordView;
pub use render::{build_report, dossier_sections, record_sections, Report, Section};
pub use sanitize::{sanitize, SanitizeOptions};

use tracing_subscriber::EnvFilter;

/// Install a `RUST_LOG`-filtered fmt subscriber.
///
/// Default: warn for dependencies, info for this crate. Does nothing when a
/// global subscriber is already set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,enrichment_dossier=info")),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> serde_json::Value {
        json!({
            "status": "success",
            "metadata": { "duration_ms": 41 },
            "data": { "data": {
                "@search_id": "s-77",
                "@search_pointer": "ptr",
                "QuotaCurrent": 10,
                "query": { "phones": [{ "number": 15550100, "display_international": "+1 555 0100" }] },
                "person": {
                    "@match": 0.87,
                    "names": [{ "display": "Jane Doe" }],
                    "phones": [{ "number": 15550100, "phone_md5": "abc" }],
                    "emails": [{ "address": "jane@example.com" }]
                }
            } }
        })
    }

    #[test]
    fn test_pipeline_view() {
        init_tracing();
        let clean = sanitize(&record(), SanitizeOptions::for_display());
        let view = RecordView::locate(&clean).unwrap();
        let dossier = build_dossier(view.person()).unwrap();

        let summary = dossier.summary();
        assert_eq!(summary.name, "Jane Doe");
        assert_eq!(summary.email, "jane@example.com");

        let sections = record_sections(&view, Some(&dossier));
        assert!(render::find(&sections, "Names").is_some());
        assert!(render::find(&sections, "Email Addresses").is_some());
    }

    #[test]
    fn test_pipeline_exports() {
        let options = ExportOptions::default();

        let csv = export_csv(&record(), &options).unwrap();
        assert!(!csv.contains("Duration"));
        assert!(!csv.contains("abc"));

        let json = export_json(&record(), &options).unwrap();
        assert!(json.contains("s-77"));
        assert!(!json.contains("ptr"));

        assert_eq!(
            report_file_name(&record(), None),
            "15550100 Enrichment.docx"
        );
    }
}
