//! Record sanitizer.
//!
//! Strips internal and volatile fields from a raw record tree before it is
//! displayed or exported. The walk never mutates its input; it builds a new
//! tree, so nothing done to the result can bleed back into the caller's copy.

use crate::record::keys;
use serde_json::{Map, Value};

/// Deepest nesting level the tree walkers descend into.
///
/// serde_json refuses to parse past 128 levels, so parsed input never gets
/// here; hand-built trees deeper than this are cut off.
pub const MAX_DEPTH: usize = 256;

/// Sanitizer behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Keep quota/rate-limit counters and the endpoint field
    pub debug_mode: bool,
}

impl SanitizeOptions {
    /// Options for the on-screen view, which shows its own quota panel
    pub fn for_display() -> Self {
        Self { debug_mode: true }
    }

    /// Options for exports
    pub fn for_export(debug_mode: bool) -> Self {
        Self { debug_mode }
    }

    fn drops(&self, key: &str) -> bool {
        keys::is_denied(key) || (!self.debug_mode && keys::is_volatile(key))
    }
}

/// Return a copy of `tree` with denied keys removed at every depth.
///
/// All other keys, including the remaining `@`-prefixed metadata, survive
/// untouched. Sanitizing twice yields the same tree as sanitizing once.
pub fn sanitize(tree: &Value, opts: SanitizeOptions) -> Value {
    sanitize_at(tree, opts, 0)
}

fn sanitize_at(value: &Value, opts: SanitizeOptions, depth: usize) -> Value {
    if depth > MAX_DEPTH {
        tracing::warn!(depth, "[Sanitizer] Subtree exceeds max depth, dropping");
        return Value::Null;
    }

    match value {
        Value::Object(map) => {
            let mut cleaned = Map::with_capacity(map.len());
            for (key, child) in map {
                if opts.drops(key) {
                    continue;
                }
                cleaned.insert(key.clone(), sanitize_at(child, opts, depth + 1));
            }
            Value::Object(cleaned)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| sanitize_at(item, opts, depth + 1))
                .collect(),
        ),
        leaf => leaf.clone(),
    }
}
