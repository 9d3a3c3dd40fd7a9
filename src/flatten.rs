//! Record flattener.
//!
//! Collapses a sanitized tree into one level of dotted-path keys for the
//! CSV export:
//!
//! ```text
//! { person: { names: [], "@match": 0.9 }, tags: ["a", "b"] }
//!   -> { "person.names": "", "person.@match": 0.9, "tags": "a; b" }
//! ```
//!
//! Scalars are stored as-is; stringification happens at the CSV boundary.

use crate::format::value_text;
use crate::sanitize::MAX_DEPTH;
use serde::Serialize;
use serde_json::{Map, Value};

/// Separator between serialized items of an object array
pub const OBJECT_ITEM_SEPARATOR: &str = " | ";
/// Separator between items of a primitive array
pub const PRIMITIVE_ITEM_SEPARATOR: &str = "; ";

/// Ordered, single-level mapping of dotted paths to values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FlatRow(Map<String, Value>);

impl FlatRow {
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.0.get(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Insert under `path`, suffixing `#2`, `#3`, ... when it is already taken
    fn insert_unique(&mut self, path: String, value: Value) {
        if !self.0.contains_key(&path) {
            self.0.insert(path, value);
            return;
        }

        let mut n = 2;
        loop {
            let candidate = format!("{path}#{n}");
            if !self.0.contains_key(&candidate) {
                tracing::debug!(n, "[Flattener] Path collision, suffixing key");
                self.0.insert(candidate, value);
                return;
            }
            n += 1;
        }
    }
}

/// Flatten `tree` into a [`FlatRow`].
///
/// Only objects have keys to flatten; any other root yields an empty row.
pub fn flatten(tree: &Value) -> FlatRow {
    flatten_with_prefix(tree, "")
}

/// Flatten `tree`, prefixing every path with `prefix.`
pub fn flatten_with_prefix(tree: &Value, prefix: &str) -> FlatRow {
    let mut row = FlatRow::default();
    if let Value::Object(map) = tree {
        flatten_into(&mut row, map, prefix, 0);
    }
    row
}

fn flatten_into(row: &mut FlatRow, map: &Map<String, Value>, prefix: &str, depth: usize) {
    if depth > MAX_DEPTH {
        tracing::warn!(depth, "[Flattener] Subtree exceeds max depth, dropping");
        return;
    }

    for (key, value) in map {
        if value.is_null() {
            continue;
        }

        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            Value::Array(items) => row.insert_unique(path, Value::String(join_array(items))),
            Value::Object(child) => flatten_into(row, child, &path, depth + 1),
            scalar => row.insert_unique(path, scalar.clone()),
        }
    }
}

/// Object arrays join each item's JSON; other arrays join item text
fn join_array(items: &[Value]) -> String {
    let Some(first) = items.first() else {
        return String::new();
    };

    if first.is_object() || first.is_array() {
        items
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(OBJECT_ITEM_SEPARATOR)
    } else {
        items
            .iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(PRIMITIVE_ITEM_SEPARATOR)
    }
}
