//! Column sets and per-column render rules.
//!
//! View columns render missing values as `N/A` through the shared
//! formatter. Report columns follow the document layout instead: dates in
//! export format and an empty cell for anything missing.

use super::ColumnSpec;
use crate::dossier::Entity;
use crate::format::{format_display_value, format_export_date, format_phone_number};
use crate::record::keys;

/// URLs longer than this are cut in the view
pub const URL_DISPLAY_CHARS: usize = 60;

/// Row cap for most view tables
pub const DEFAULT_MAX_ROWS: usize = 3;
/// Row cap for usernames and user ids
pub const ACCOUNT_MAX_ROWS: usize = 5;

// View cells

fn display(e: &Entity) -> String {
    e.display()
}

fn type_tag(e: &Entity) -> String {
    e.type_label()
}

fn valid_since(e: &Entity) -> String {
    format_display_value(e.valid_since.as_ref(), Some("valid_since"))
}

fn last_seen(e: &Entity) -> String {
    format_display_value(e.last_seen.as_ref(), Some("last_seen"))
}

fn current(e: &Entity) -> String {
    let mark = if e.current == Some(true) { "✓" } else { "-" };
    mark.to_string()
}

fn url(e: &Entity) -> String {
    truncate_url(&e.display())
}

/// Cut to [`URL_DISPLAY_CHARS`] characters plus `...`
pub fn truncate_url(url: &str) -> String {
    if url.chars().count() <= URL_DISPLAY_CHARS {
        return url.to_string();
    }
    let cut: String = url.chars().take(URL_DISPLAY_CHARS).collect();
    format!("{cut}...")
}

pub const NAMES: &[ColumnSpec] = &[
    ColumnSpec::rendered("display", "Name", display),
    ColumnSpec::rendered("@type", "Type", type_tag),
    ColumnSpec::rendered("@valid_since", "Valid Since", valid_since),
    ColumnSpec::rendered("@last_seen", "Last Seen", last_seen),
];

pub const PHONES: &[ColumnSpec] = &[
    ColumnSpec::rendered("display_international", "Phone", display),
    ColumnSpec::rendered("@type", "Type", type_tag),
    ColumnSpec::rendered("@valid_since", "Valid Since", valid_since),
    ColumnSpec::rendered("@last_seen", "Last Seen", last_seen),
];

pub const EMAILS: &[ColumnSpec] = &[
    ColumnSpec::rendered("address", "Email", display),
    ColumnSpec::rendered("@type", "Type", type_tag),
    ColumnSpec::rendered("@valid_since", "Valid Since", valid_since),
    ColumnSpec::rendered("@current", "Current", current),
];

pub const ADDRESSES: &[ColumnSpec] = &[
    ColumnSpec::rendered("display", "Address", display),
    ColumnSpec::keyed("city", "City"),
    ColumnSpec::keyed("state", "State"),
    ColumnSpec::keyed("country", "Country"),
    ColumnSpec::rendered("@valid_since", "Valid Since", valid_since),
];

pub const USERNAMES: &[ColumnSpec] = &[
    ColumnSpec::rendered("content", "Username", display),
    ColumnSpec::keyed("platform", "Platform"),
];

pub const USER_IDS: &[ColumnSpec] = &[
    ColumnSpec::rendered("id", "ID", display),
    ColumnSpec::rendered("type", "Type", type_tag),
];

pub const URLS: &[ColumnSpec] = &[
    ColumnSpec::rendered("url", "URL", url),
    ColumnSpec::rendered("type", "Type", type_tag),
];

pub const RELATIONSHIPS: &[ColumnSpec] = &[
    ColumnSpec::rendered("name", "Name", display),
    ColumnSpec::keyed("relationship", "Relationship"),
    ColumnSpec::rendered("type", "Type", type_tag),
];

pub const JOBS: &[ColumnSpec] = &[
    ColumnSpec::keyed("title", "Title"),
    ColumnSpec::keyed("organization", "Organization"),
    ColumnSpec::keyed("industry", "Industry"),
];

pub const EDUCATIONS: &[ColumnSpec] = &[
    ColumnSpec::keyed("degree", "Degree"),
    ColumnSpec::keyed("school", "School"),
];

pub const PHOTOS: &[ColumnSpec] = &[ColumnSpec::rendered("url", "URL", url)];

// Report cells

fn text_or_empty(e: &Entity, key: &str) -> String {
    e.text(key).unwrap_or_default()
}

fn export_date(value: Option<&serde_json::Value>) -> String {
    value.map(|v| format_export_date(Some(v))).unwrap_or_default()
}

fn report_valid_since(e: &Entity) -> String {
    export_date(e.valid_since.as_ref())
}

fn report_last_seen(e: &Entity) -> String {
    export_date(e.last_seen.as_ref())
}

fn report_type(e: &Entity) -> String {
    e.entity_type.clone().unwrap_or_default()
}

fn report_name(e: &Entity) -> String {
    text_or_empty(e, "display")
}

fn report_first(e: &Entity) -> String {
    text_or_empty(e, "first")
}

fn report_middle(e: &Entity) -> String {
    text_or_empty(e, "middle")
}

fn report_last(e: &Entity) -> String {
    text_or_empty(e, "last")
}

fn report_phone_intl(e: &Entity) -> String {
    e.text("number")
        .map(|n| format_phone_number(&n))
        .unwrap_or_default()
}

fn report_phone_local(e: &Entity) -> String {
    e.first_text(&["display_international", "display"])
        .unwrap_or_default()
}

fn report_carrier(e: &Entity) -> String {
    text_or_empty(e, "carrier")
}

fn report_email(e: &Entity) -> String {
    e.first_text(keys::EMAIL_CHAIN).unwrap_or_default()
}

fn report_address(e: &Entity) -> String {
    e.first_text(&["display", "address"]).unwrap_or_default()
}

fn report_city(e: &Entity) -> String {
    text_or_empty(e, "city")
}

fn report_state(e: &Entity) -> String {
    text_or_empty(e, "state")
}

fn report_country(e: &Entity) -> String {
    text_or_empty(e, "country")
}

pub const REPORT_NAMES: &[ColumnSpec] = &[
    ColumnSpec::rendered("display", "Display Name", report_name),
    ColumnSpec::rendered("first", "First", report_first),
    ColumnSpec::rendered("middle", "Middle", report_middle),
    ColumnSpec::rendered("last", "Last", report_last),
    ColumnSpec::rendered("@valid_since", "Valid Since", report_valid_since),
    ColumnSpec::rendered("@last_seen", "Last Seen", report_last_seen),
];

pub const REPORT_PHONES: &[ColumnSpec] = &[
    ColumnSpec::rendered("number", "Phone (Intl)", report_phone_intl),
    ColumnSpec::rendered("display_international", "Phone (Local)", report_phone_local),
    ColumnSpec::rendered("@type", "Type", report_type),
    ColumnSpec::rendered("carrier", "Carrier", report_carrier),
    ColumnSpec::rendered("@valid_since", "Valid Since", report_valid_since),
    ColumnSpec::rendered("@last_seen", "Last Seen", report_last_seen),
];

pub const REPORT_EMAILS: &[ColumnSpec] = &[
    ColumnSpec::rendered("address", "Email", report_email),
    ColumnSpec::rendered("@type", "Type", report_type),
    ColumnSpec::rendered("@valid_since", "Valid Since", report_valid_since),
    ColumnSpec::rendered("@last_seen", "Last Seen", report_last_seen),
];

pub const REPORT_ADDRESSES: &[ColumnSpec] = &[
    ColumnSpec::rendered("display", "Address (Display)", report_address),
    ColumnSpec::rendered("city", "City", report_city),
    ColumnSpec::rendered("state", "State", report_state),
    ColumnSpec::rendered("country", "Country", report_country),
    ColumnSpec::rendered("@valid_since", "Valid Since", report_valid_since),
    ColumnSpec::rendered("@last_seen", "Last Seen", report_last_seen),
];
