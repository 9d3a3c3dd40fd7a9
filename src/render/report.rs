//! Document report sections.
//!
//! The report is the document-facing layout of a record: a query summary,
//! one table per populated entity type, demographics, available-data counts
//! and a generation stamp. Unlike the view, no table collapses.

use super::columns;
use super::{ColumnSpec, KvBlock, KvStyle, Section, Table};
use crate::dossier::{build_dossier, Dossier, Entity};
use crate::format::{capitalize_first, format_date_time, format_export_date, is_truthy, value_text};
use crate::record::RecordView;
use chrono::{DateTime, Utc};
use serde_json::Value;

const UNKNOWN_SELECTOR: &str = "Unknown";

/// A fully laid-out report, ready for a document writer
#[derive(Debug, Clone)]
pub struct Report<'a> {
    /// The queried phone, used as the document heading
    pub selector: String,
    pub title: String,
    pub subtitle: String,
    /// `YYYY-MM-DD HH:MM UTC`
    pub generated_at: String,
    pub sections: Vec<Section<'a>>,
}

/// Lay out the report for a located record and its dossier
pub fn build_report<'a>(
    view: &RecordView<'_>,
    dossier: &'a Dossier,
    subtitle: &str,
    now: DateTime<Utc>,
) -> Report<'a> {
    let selector = selector(view);
    let generated_at = format_date_time(now);
    let mut sections = Vec::new();

    sections.push(Section::KeyValue(query_summary(view, &selector, now)));

    let tables: [(&str, &'static [ColumnSpec], &'a [Entity]); 10] = [
        ("Names", columns::REPORT_NAMES, dossier.names.as_slice()),
        ("Phones", columns::REPORT_PHONES, dossier.phones.as_slice()),
        ("Emails", columns::REPORT_EMAILS, dossier.emails.as_slice()),
        ("Addresses", columns::REPORT_ADDRESSES, dossier.addresses.as_slice()),
        ("Usernames", columns::USERNAMES, dossier.usernames.as_slice()),
        ("User IDs", columns::USER_IDS, dossier.user_ids.as_slice()),
        ("URLs", columns::URLS, dossier.urls.as_slice()),
        ("Relationships", columns::RELATIONSHIPS, dossier.relationships.as_slice()),
        ("Employment", columns::JOBS, dossier.jobs.as_slice()),
        ("Education", columns::EDUCATIONS, dossier.educations.as_slice()),
    ];
    for (title, columns, rows) in tables {
        if !rows.is_empty() {
            sections.push(Section::Table(Table::new(title, columns, rows)));
        }
    }

    let demographics = demographics(dossier);
    if !demographics.is_empty() {
        sections.push(Section::KeyValue(demographics));
    }

    sections.push(Section::KeyValue(available_counts(dossier)));

    let mut stamp = KvBlock::new("Report Metadata", KvStyle::Inline);
    stamp.push("Generated", generated_at.clone());
    sections.push(Section::KeyValue(stamp));

    tracing::debug!(sections = sections.len(), "[Report] Built report layout");

    Report {
        title: selector.clone(),
        selector,
        subtitle: subtitle.to_string(),
        generated_at,
        sections,
    }
}

/// Dossier behind the report.
///
/// Records without a `person` object carry the entity lists (`names`,
/// `phones`, `gender`, ...) directly on the payload, next to `query`.
pub fn report_dossier(view: &RecordView<'_>) -> Dossier {
    let dossier = match view.person() {
        Some(person) => build_dossier(Some(person)),
        None => {
            tracing::debug!("[Report] No person object, reading entities from payload");
            build_dossier(Some(&Value::Object(view.payload().clone())))
        }
    };
    dossier.unwrap_or_default()
}

/// The query's first phone: `number`, else `raw`, else the bare value
fn first_query_phone<'v>(view: &RecordView<'v>) -> Option<&'v Value> {
    view.query()?
        .get("phones")?
        .as_array()?
        .first()
        .filter(|p| !p.is_null())
}

/// Queried phone shown as the report heading
pub fn selector(view: &RecordView<'_>) -> String {
    let Some(phone) = first_query_phone(view) else {
        return UNKNOWN_SELECTOR.to_string();
    };

    let picked = match phone {
        Value::Object(map) => ["number", "raw"]
            .iter()
            .filter_map(|k| map.get(*k))
            .find(|v| is_truthy(v))
            .map(value_text),
        other if is_truthy(other) => Some(value_text(other)),
        _ => None,
    };

    picked.unwrap_or_else(|| UNKNOWN_SELECTOR.to_string())
}

fn query_summary(view: &RecordView<'_>, selector: &str, now: DateTime<Utc>) -> KvBlock {
    let mut block = KvBlock::new("Query Summary", KvStyle::Grid);
    block.push("Queried Phone", selector);

    let country_code = first_query_phone(view)
        .and_then(|p| p.get("country_code"))
        .filter(|v| is_truthy(v));
    if let Some(code) = country_code {
        block.push("Country Code", value_text(code));
    }

    let timestamp = view
        .query()
        .and_then(|q| q.get("timestamp"))
        .filter(|v| is_truthy(v));
    let query_date = match timestamp {
        Some(ts) => format_export_date(Some(ts)),
        None => now.format("%Y-%m-%d").to_string(),
    };
    block.push("Query Date", query_date);

    block
}

/// Languages as the report prints them: `language (region)`, `language`, or JSON
fn language_label(language: &Entity) -> String {
    match (language.text("language"), language.text("region")) {
        (Some(lang), Some(region)) => format!("{lang} ({region})"),
        (Some(lang), None) => lang,
        _ => Value::Object(language.fields.clone()).to_string(),
    }
}

fn demographics(dossier: &Dossier) -> KvBlock {
    let mut block = KvBlock::new("Demographics", KvStyle::Inline);
    if let Some(gender) = &dossier.gender {
        block.push("Gender", capitalize_first(gender));
    }
    if !dossier.languages.is_empty() {
        let labels: Vec<String> = dossier.languages.iter().map(language_label).collect();
        block.push("Languages", labels.join(", "));
    }
    block
}

fn available_counts(dossier: &Dossier) -> KvBlock {
    let mut block = KvBlock::new(
        "Available Data",
        KvStyle::Headed {
            key: "Data Type",
            value: "Count",
        },
    );
    let genders = usize::from(dossier.gender.is_some());
    let counts = [
        ("Addresses", dossier.addresses.len()),
        ("Phones", dossier.phones.len()),
        ("Emails", dossier.emails.len()),
        ("Names", dossier.names.len()),
        ("Genders", genders),
        ("Languages", dossier.languages.len()),
    ];
    for (label, count) in counts {
        block.push(label, count.to_string());
    }
    block
}
