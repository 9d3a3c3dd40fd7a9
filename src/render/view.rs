//! On-screen sections.
//!
//! [`dossier_sections`] lays out the dossier itself; [`record_sections`]
//! wraps it with the response status, request metadata, query echo and
//! quota panels. Empty sources produce no section.

use super::columns::{self, ACCOUNT_MAX_ROWS, DEFAULT_MAX_ROWS};
use super::{ColumnSpec, KvBlock, KvStyle, Section, Table};
use crate::dossier::{Dossier, Entity};
use crate::flatten::flatten;
use crate::format::{format_csv_header, format_display_value, format_key};
use crate::record::RecordView;
use serde_json::{Map, Value};

const PREMIUM_KEY: &str = "premium";

/// Sections of the dossier view, in display order
pub fn dossier_sections<'a>(dossier: &'a Dossier, available_data: Option<&Value>) -> Vec<Section<'a>> {
    let mut sections = Vec::new();
    let summary = dossier.summary();

    let mut header = KvBlock::new(summary.name, KvStyle::Grid);
    if let Some(badge) = summary.match_label {
        header.push("Match", badge);
    }
    header.push("Phone", summary.phone);
    header.push("Email", summary.email);
    header.push("Location", summary.location);
    sections.push(Section::KeyValue(header));

    if let Some(premium) = available_data
        .and_then(|a| a.get(PREMIUM_KEY))
        .and_then(Value::as_object)
    {
        push_kv(&mut sections, map_block("Premium Coverage", premium));
    }

    push_table(&mut sections, "Names", columns::NAMES, &dossier.names, DEFAULT_MAX_ROWS);
    push_table(&mut sections, "Phone Numbers", columns::PHONES, &dossier.phones, DEFAULT_MAX_ROWS);
    push_table(&mut sections, "Email Addresses", columns::EMAILS, &dossier.emails, DEFAULT_MAX_ROWS);
    push_table(&mut sections, "Addresses", columns::ADDRESSES, &dossier.addresses, DEFAULT_MAX_ROWS);
    push_table(&mut sections, "Usernames", columns::USERNAMES, &dossier.usernames, ACCOUNT_MAX_ROWS);
    push_table(&mut sections, "User IDs", columns::USER_IDS, &dossier.user_ids, ACCOUNT_MAX_ROWS);
    push_table(&mut sections, "URLs", columns::URLS, &dossier.urls, DEFAULT_MAX_ROWS);
    push_table(&mut sections, "Relationships", columns::RELATIONSHIPS, &dossier.relationships, DEFAULT_MAX_ROWS);

    let mut personal = KvBlock::new("Personal Information", KvStyle::Grid);
    if let Some(gender) = &dossier.gender {
        personal.push("Gender", gender.clone());
    }
    if let Some(dob) = &dossier.dob {
        personal.push("Date of Birth", dob.label());
    }
    if !dossier.languages.is_empty() {
        personal.push("Languages", dossier.language_labels().join(", "));
    }
    push_kv(&mut sections, personal);

    push_table(&mut sections, "Employment", columns::JOBS, &dossier.jobs, DEFAULT_MAX_ROWS);
    push_table(&mut sections, "Education", columns::EDUCATIONS, &dossier.educations, DEFAULT_MAX_ROWS);

    let mut additional = KvBlock::new("Additional Info", KvStyle::Grid);
    if !dossier.ethnicities.is_empty() {
        additional.push("Ethnicities", dossier.ethnicities.join(", "));
    }
    if !dossier.origin_countries.is_empty() {
        additional.push("Origin Countries", dossier.origin_countries.join(", "));
    }
    push_kv(&mut sections, additional);

    push_table(&mut sections, "Photos", columns::PHOTOS, &dossier.images, DEFAULT_MAX_ROWS);

    sections
}

/// Sections of the full record view.
///
/// `dossier` is the dossier built from `view.person()`, if any.
pub fn record_sections<'a>(view: &RecordView<'_>, dossier: Option<&'a Dossier>) -> Vec<Section<'a>> {
    let mut sections = Vec::new();

    let mut status = KvBlock::new("API Response Status", KvStyle::Grid);
    for (key, value) in view.status() {
        status.push(format_key(key), format_display_value(Some(value), None));
    }
    push_kv(&mut sections, status);

    if let Some(metadata) = view.metadata() {
        push_kv(&mut sections, flat_block("Request Metadata", metadata));
    }

    if let Some(dossier) = dossier {
        sections.extend(dossier_sections(dossier, view.available_data()));
    }

    if let Some(query) = view.query() {
        push_kv(&mut sections, flat_block("Query Details", query));
    }
    if let Some(available) = view.available_data() {
        push_kv(&mut sections, flat_block("Available Premium Data", available));
    }
    if let Some(search) = view.search_metadata() {
        push_kv(&mut sections, map_block("Search Metadata", &search));
    }

    let mut quota = KvBlock::new("API Quota & Rate Limits", KvStyle::Grid);
    for (key, value) in view.quota_panel() {
        quota.push(format_key(key), format_display_value(Some(value), None));
    }
    push_kv(&mut sections, quota);

    tracing::debug!(sections = sections.len(), "[RecordView] Built view sections");
    sections
}

fn push_kv(sections: &mut Vec<Section<'_>>, block: KvBlock) {
    if !block.is_empty() {
        sections.push(Section::KeyValue(block));
    }
}

fn push_table<'a>(
    sections: &mut Vec<Section<'a>>,
    title: &str,
    columns: &'static [ColumnSpec],
    rows: &'a [Entity],
    max_rows: usize,
) {
    if !rows.is_empty() {
        sections.push(Section::Table(Table::new(title, columns, rows).collapse_after(max_rows)));
    }
}

/// One entry per top-level key
fn map_block(title: &str, map: &Map<String, Value>) -> KvBlock {
    let mut block = KvBlock::new(title, KvStyle::Grid);
    for (key, value) in map {
        block.push(format_key(key), format_display_value(Some(value), None));
    }
    block
}

/// One entry per flattened path
fn flat_block(title: &str, tree: &Value) -> KvBlock {
    let mut block = KvBlock::new(title, KvStyle::Grid);
    for (path, value) in flatten(tree).iter() {
        block.push(format_csv_header(path), format_display_value(Some(value), None));
    }
    block
}
