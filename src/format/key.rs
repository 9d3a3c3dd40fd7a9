//! Field-name to label formatting.

use crate::record::keys::METADATA_PREFIX;
use once_cell::sync::Lazy;
use regex::Regex;

/// Any uppercase letter; a space goes in front of each one
static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Lu}").expect("Invalid regex"));

/// Turn a raw field name into a human label.
///
/// `@` and `_` become spaces, a space is inserted before every capital and
/// each word is capitalized: `@search_id` -> `Search Id`, `QpsAllotted` ->
/// `Qps Allotted`. Acronyms split per letter (`ABC` -> `A B C`).
pub fn format_key(name: &str) -> String {
    let spaced: String = name
        .chars()
        .map(|c| if c == '@' || c == '_' { ' ' } else { c })
        .collect();

    let spaced = UPPERCASE.replace_all(&spaced, " $0");

    spaced
        .split_whitespace()
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Label for a dotted flattened path: every segment is formatted and the
/// results are joined, so `person.names` -> `Person Names`.
pub fn format_csv_header(path: &str) -> String {
    path.split('.')
        .map(format_key)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a key is upstream metadata (`@match`, `@valid_since`, ...)
pub fn is_metadata_key(key: &str) -> bool {
    key.starts_with(METADATA_PREFIX)
}

/// Uppercase the first character, leave the rest alone
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
