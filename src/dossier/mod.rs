//! Dossier builder.
//!
//! Projects a sanitized `person` node onto a fixed shape. Each entity list
//! is normalized into [`Entity`] records; every list is present, possibly
//! empty, and nothing here can fail on malformed input.
//!
//! ## Relationships
//!
//! ```text
//! { type: "family", names: [A, B] }  ->  [ {name: A, type: family}, {name: B, type: family} ]
//! { type: "work", name: "C" }        ->  [ {name: C, type: work} ]
//! ```

pub mod entity;

#[cfg(test)]
mod tests;

pub use entity::{Entity, EntityKind};

use crate::format::{self, format_display_value, is_truthy, NOT_AVAILABLE};
use crate::record::keys;
use entity::scalar_label;
use serde::Serialize;
use serde_json::{Map, Value};

const GENDER_KEY: &str = "gender";
const DOB_KEY: &str = "dob";
const ETHNICITIES_KEY: &str = "ethnicities";
const ORIGIN_COUNTRIES_KEY: &str = "origin_countries";
const NAMES_KEY: &str = "names";

/// Canonical, display-facing projection of a person
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dossier {
    pub names: Vec<Entity>,
    pub phones: Vec<Entity>,
    pub emails: Vec<Entity>,
    pub addresses: Vec<Entity>,
    pub usernames: Vec<Entity>,
    pub user_ids: Vec<Entity>,
    pub urls: Vec<Entity>,
    pub relationships: Vec<Entity>,
    pub jobs: Vec<Entity>,
    pub educations: Vec<Entity>,
    pub images: Vec<Entity>,
    pub languages: Vec<Entity>,
    pub gender: Option<String>,
    pub dob: Option<DateOfBirth>,
    pub ethnicities: Vec<String>,
    pub origin_countries: Vec<String>,
    /// 0..1 confidence from `@match`
    pub match_score: Option<f64>,
}

/// Date of birth as upstream reports it: a display string and/or a range
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateOfBirth {
    pub display: Option<String>,
    pub start: Option<Value>,
    pub end: Option<Value>,
}

impl DateOfBirth {
    fn from_value(raw: &Value) -> Option<Self> {
        match raw {
            Value::Object(map) => {
                let range = map.get("date_range").and_then(Value::as_object);
                let dob = Self {
                    display: format::first_text(map, &["display"]),
                    start: range.and_then(|r| r.get("start")).cloned(),
                    end: range.and_then(|r| r.get("end")).cloned(),
                };
                (dob.display.is_some() || dob.start.is_some()).then_some(dob)
            }
            other if is_truthy(other) => Some(Self {
                display: None,
                start: Some(other.clone()),
                end: None,
            }),
            _ => None,
        }
    }

    /// `display`, else the range start as a dossier date
    pub fn label(&self) -> String {
        if let Some(display) = &self.display {
            return display.clone();
        }
        match &self.start {
            Some(start) => format::format_date(start),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}

/// Header values of the dossier view, taken from index 0 of each list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DossierSummary {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub location: String,
    pub image: Option<String>,
    /// `NN% Match`, absent without a score
    pub match_label: Option<String>,
}

impl Dossier {
    /// Primary values for the dossier header
    pub fn summary(&self) -> DossierSummary {
        let primary = |list: &[Entity]| list.first().map(Entity::display);

        DossierSummary {
            name: primary(&self.names).unwrap_or_else(|| "Unknown".to_string()),
            phone: primary(&self.phones).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            email: primary(&self.emails).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            location: self
                .addresses
                .first()
                .map(|a| a.text("display").or_else(|| city_state(a)).unwrap_or_else(|| a.display()))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            image: self.images.first().and_then(|i| i.first_text(&["url", "display"])),
            match_label: self.match_score.map(match_label),
        }
    }

    /// All entity lists, in dossier order
    pub fn lists(&self) -> [(EntityKind, &[Entity]); 12] {
        [
            (EntityKind::Name, self.names.as_slice()),
            (EntityKind::Phone, self.phones.as_slice()),
            (EntityKind::Email, self.emails.as_slice()),
            (EntityKind::Address, self.addresses.as_slice()),
            (EntityKind::Username, self.usernames.as_slice()),
            (EntityKind::UserId, self.user_ids.as_slice()),
            (EntityKind::Url, self.urls.as_slice()),
            (EntityKind::Relationship, self.relationships.as_slice()),
            (EntityKind::Job, self.jobs.as_slice()),
            (EntityKind::Education, self.educations.as_slice()),
            (EntityKind::Image, self.images.as_slice()),
            (EntityKind::Language, self.languages.as_slice()),
        ]
    }

    /// Languages as shown on screen: `display`, else `language`
    pub fn language_labels(&self) -> Vec<String> {
        self.languages.iter().map(Entity::display).collect()
    }
}

/// `round(score * 100)% Match`
pub fn match_label(score: f64) -> String {
    format!("{}% Match", (score * 100.0).round() as i64)
}

fn city_state(address: &Entity) -> Option<String> {
    let parts: Vec<String> = ["city", "state"]
        .iter()
        .filter_map(|k| address.text(k))
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Build a dossier from a `person` node.
///
/// `None` and `null` yield `None`. Any other value yields a dossier; a
/// non-object person simply has every list empty.
pub fn build_dossier(person: Option<&Value>) -> Option<Dossier> {
    let person = match person {
        None | Some(Value::Null) => return None,
        Some(Value::Object(map)) => map,
        Some(_) => {
            tracing::warn!("[DossierBuilder] Person node is not an object, building empty dossier");
            return Some(Dossier::default());
        }
    };

    let dossier = Dossier {
        names: entities(person, EntityKind::Name),
        phones: entities(person, EntityKind::Phone),
        emails: entities(person, EntityKind::Email),
        addresses: entities(person, EntityKind::Address),
        usernames: entities(person, EntityKind::Username),
        user_ids: entities(person, EntityKind::UserId),
        urls: entities(person, EntityKind::Url),
        relationships: relationships(person),
        jobs: entities(person, EntityKind::Job),
        educations: entities(person, EntityKind::Education),
        images: entities(person, EntityKind::Image),
        languages: entities(person, EntityKind::Language),
        gender: person
            .get(GENDER_KEY)
            .and_then(|g| scalar_label(g, &["content", "display"])),
        dob: person.get(DOB_KEY).and_then(DateOfBirth::from_value),
        ethnicities: labels(person, ETHNICITIES_KEY, &["display", "content", "ethnicity"]),
        origin_countries: labels(person, ORIGIN_COUNTRIES_KEY, &["display", "content", "country"]),
        match_score: person.get(keys::MATCH_KEY).and_then(Value::as_f64),
    };

    tracing::debug!(
        names = dossier.names.len(),
        phones = dossier.phones.len(),
        emails = dossier.emails.len(),
        addresses = dossier.addresses.len(),
        relationships = dossier.relationships.len(),
        "[DossierBuilder] Built dossier"
    );

    Some(dossier)
}

/// Items of an array field; anything else is an empty list
fn items<'a>(person: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    match person.get(key) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => &[],
        Some(_) => {
            tracing::debug!(key, "[DossierBuilder] Expected a list, ignoring field");
            &[]
        }
    }
}

fn entities(person: &Map<String, Value>, kind: EntityKind) -> Vec<Entity> {
    items(person, kind.source_key())
        .iter()
        .filter_map(|raw| Entity::normalize(kind, raw))
        .collect()
}

fn labels(person: &Map<String, Value>, key: &str, chain: &[&str]) -> Vec<String> {
    items(person, key)
        .iter()
        .filter_map(|v| scalar_label(v, chain))
        .collect()
}

/// One entry per associated name, or one entry for a relationship without names
fn relationships(person: &Map<String, Value>) -> Vec<Entity> {
    let mut out = Vec::new();

    for raw in items(person, EntityKind::Relationship.source_key()) {
        let relationship = match raw {
            Value::Object(map) => map,
            Value::Null => continue,
            scalar => {
                out.extend(Entity::normalize(EntityKind::Relationship, scalar));
                continue;
            }
        };

        let shared = Entity::from_fields(EntityKind::Relationship, relationship.clone());
        let subtype = format::first_text(relationship, keys::RELATIONSHIP_SUBTYPE_KEYS);

        let names: Vec<&Value> = relationship
            .get(NAMES_KEY)
            .and_then(Value::as_array)
            .map(|names| names.iter().filter(|n| !n.is_null()).collect())
            .unwrap_or_default();

        if names.is_empty() {
            let name = shared
                .first_text(keys::RELATIONSHIP_NAME_CHAIN)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            out.push(relationship_entry(name, &shared, subtype.as_deref(), None));
            continue;
        }

        for name in names {
            let own = name.as_object();
            let name_since = own.and_then(|n| format::first_truthy(n, keys::VALID_SINCE_KEYS));
            out.push(relationship_entry(
                format_display_value(Some(name), None),
                &shared,
                subtype.as_deref(),
                name_since,
            ));
        }
    }

    out
}

fn relationship_entry(
    name: String,
    shared: &Entity,
    subtype: Option<&str>,
    name_since: Option<&Value>,
) -> Entity {
    let mut fields = Map::new();
    fields.insert("name".to_string(), Value::String(name));
    if let Some(subtype) = subtype {
        fields.insert("relationship".to_string(), Value::String(subtype.to_string()));
    }
    if let Some(kind) = &shared.entity_type {
        fields.insert("type".to_string(), Value::String(kind.clone()));
    }
    if let Some(since) = name_since.cloned().or_else(|| shared.valid_since.clone()) {
        fields.insert("valid_since".to_string(), since);
    }
    if let Some(seen) = &shared.last_seen {
        fields.insert("last_seen".to_string(), seen.clone());
    }

    Entity::from_fields(EntityKind::Relationship, fields)
}
