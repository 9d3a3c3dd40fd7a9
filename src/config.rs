//! Export options.
//!
//! Loaded from the environment (with `.env` support) the same way the rest
//! of the service is configured; `Default` never touches the environment.

use crate::sanitize::SanitizeOptions;

/// Env var enabling quota/QPS/endpoint fields in exports
pub const DEBUG_MODE_VAR: &str = "DOSSIER_DEBUG_MODE";
/// Env var overriding the report subtitle
pub const SUBTITLE_VAR: &str = "DOSSIER_REPORT_SUBTITLE";

const DEFAULT_SUBTITLE: &str = "Enrichment Report";

/// Options shared by the CSV, JSON and DOCX exports
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Keep quota/rate-limit counters and the endpoint field in exports
    pub debug_mode: bool,
    /// Subtitle under the report title, also used in the footer
    pub report_subtitle: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            debug_mode: false,
            report_subtitle: DEFAULT_SUBTITLE.to_string(),
        }
    }
}

impl ExportOptions {
    /// Load options from the process environment
    pub fn from_env() -> Self {
        // During development CWD may be the crate or its parent
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_path("../.env");
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build options from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let debug_mode = lookup(DEBUG_MODE_VAR)
            .map(|v| parse_flag(&v))
            .unwrap_or(defaults.debug_mode);

        let report_subtitle = lookup(SUBTITLE_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.report_subtitle);

        tracing::debug!(debug_mode, "[ExportOptions] Loaded export options");

        Self {
            debug_mode,
            report_subtitle,
        }
    }

    /// Sanitizer options for export paths
    pub fn sanitize_options(&self) -> SanitizeOptions {
        SanitizeOptions {
            debug_mode: self.debug_mode,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
