//! Canonical entity record.
//!
//! Every list item of a person (a name, phone, email, ...) arrives as a
//! string, a number or an object. [`Entity::normalize`] converts all three
//! shapes into one record once, at ingestion, so renderers only ever look
//! up fields by key.

use crate::format::{self, first_text, format_display_value, is_truthy, value_text, NOT_AVAILABLE};
use crate::record::keys;
use serde::Serialize;
use serde_json::{Map, Value};

/// Which person collection an entity came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Name,
    Phone,
    Email,
    Address,
    Username,
    UserId,
    Url,
    Relationship,
    Job,
    Education,
    Image,
    Language,
}

impl EntityKind {
    /// Field of the person node holding this collection
    pub fn source_key(&self) -> &'static str {
        match self {
            Self::Name => "names",
            Self::Phone => "phones",
            Self::Email => "emails",
            Self::Address => "addresses",
            Self::Username => "usernames",
            Self::UserId => "user_ids",
            Self::Url => "urls",
            Self::Relationship => "relationships",
            Self::Job => "jobs",
            Self::Education => "educations",
            Self::Image => "images",
            Self::Language => "languages",
        }
    }

    /// Field a bare string item is stored under
    fn primary_key(&self) -> &'static str {
        match self {
            Self::Name | Self::Phone | Self::Address => "display",
            Self::Email => "address",
            Self::Username | Self::UserId => "content",
            Self::Url | Self::Image => "url",
            Self::Relationship => "name",
            Self::Job => "title",
            Self::Education => "school",
            Self::Language => "language",
        }
    }

    /// Display chain tried before the generic object chain
    fn display_chain(&self) -> &'static [&'static str] {
        match self {
            Self::Phone => keys::PHONE_CHAIN,
            Self::Email => keys::EMAIL_CHAIN,
            Self::UserId => keys::USER_ID_CHAIN,
            Self::Address => &["display"],
            Self::Relationship => keys::RELATIONSHIP_NAME_CHAIN,
            Self::Language => &["display", "language"],
            Self::Job => &["display", "title"],
            Self::Education => &["display", "degree", "school"],
            _ => &[],
        }
    }
}

/// One normalized list item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub kind: EntityKind,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_since: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<bool>,
    /// Source fields, verbatim for object items
    pub fields: Map<String, Value>,
}

impl Entity {
    /// Normalize one raw list item. `null` items yield nothing.
    pub fn normalize(kind: EntityKind, raw: &Value) -> Option<Self> {
        let fields = match raw {
            Value::Null => return None,
            Value::Object(map) => map.clone(),
            Value::Number(_) if kind == EntityKind::Phone => single("number", raw.clone()),
            other => single(kind.primary_key(), other.clone()),
        };
        Some(Self::from_fields(kind, fields))
    }

    /// Build an entity over an already-shaped field map
    pub fn from_fields(kind: EntityKind, fields: Map<String, Value>) -> Self {
        let entity_type = first_text(&fields, keys::TYPE_KEYS);
        let valid_since = first_present(&fields, keys::VALID_SINCE_KEYS);
        let last_seen = first_present(&fields, keys::LAST_SEEN_KEYS);
        let current = keys::CURRENT_KEYS
            .iter()
            .find_map(|k| fields.get(*k))
            .map(is_truthy);

        Self {
            kind,
            entity_type,
            valid_since,
            last_seen,
            current,
            fields,
        }
    }

    /// Raw field lookup
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// A truthy field rendered as text
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .filter(|v| is_truthy(v))
            .map(|v| format_display_value(Some(v), None))
    }

    /// First truthy field of `chain`, rendered as text
    pub fn first_text(&self, chain: &[&str]) -> Option<String> {
        first_text(&self.fields, chain)
    }

    /// Main display string: the kind's own chain, then the shared object chain
    pub fn display(&self) -> String {
        if let Some(text) = self.first_text(self.kind.display_chain()) {
            return text;
        }
        if self.kind == EntityKind::Address {
            if let Some(line) = self.locality() {
                return line;
            }
        }
        if self.fields.is_empty() {
            return NOT_AVAILABLE.to_string();
        }
        format::display_object(&self.fields)
    }

    /// `city state country` for addresses without a display line
    pub fn locality(&self) -> Option<String> {
        let parts: Vec<String> = ["city", "state", "country"]
            .iter()
            .filter_map(|k| self.text(k))
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Type tag, or `N/A`
    pub fn type_label(&self) -> String {
        self.entity_type
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

fn single(key: &str, value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    map
}

fn first_present(fields: &Map<String, Value>, chain: &[&str]) -> Option<Value> {
    chain
        .iter()
        .filter_map(|k| fields.get(*k))
        .find(|v| is_truthy(v))
        .cloned()
}

/// Plain text for scalar demographic fields (`gender`, ethnicities, ...)
pub(crate) fn scalar_label(value: &Value, chain: &[&str]) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Object(map) => first_text(map, chain),
        other if is_truthy(other) => Some(value_text(other)),
        _ => None,
    }
}
