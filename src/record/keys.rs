//! Field-name table shared by the sanitizer, formatter and dossier builder.
//!
//! Every literal key the pipeline branches on lives here so the deny-list
//! and the display fallback chains cannot drift apart between passes.

/// Internal correlation pointers, removed at every depth
pub const SEARCH_POINTER_KEYS: &[&str] = &["@search_pointer", "search_pointer"];

/// Suffix carried by hashed PII fields (`email_md5`, `phone_md5`, ...)
pub const HASH_SUFFIX: &str = "_md5";

/// Inferred-flag marker
pub const INFERRED_KEY: &str = "@inferred";

/// Upstream internal identifier
pub const INTERNAL_ID_KEY: &str = "@id";

/// Substrings marking quota / rate-limit counters (matched case-insensitively)
pub const VOLATILE_SUBSTRINGS: &[&str] = &["quota", "qps"];

/// Endpoint-path reference attached by the proxy layer
pub const ENDPOINT_KEY: &str = "endpoint";

/// Prefix of upstream metadata keys (`@match`, `@valid_since`, ...)
pub const METADATA_PREFIX: char = '@';

/// Generic object display chain, first truthy field wins
pub const DISPLAY_CHAIN: &[&str] = &["display", "content", "address", "url", "number"];

/// Name parts joined when no display field exists
pub const NAME_PARTS: &[&str] = &["first", "middle", "last"];

/// Phone display chain
pub const PHONE_CHAIN: &[&str] = &["display_international", "display", "number"];

/// Email display chain
pub const EMAIL_CHAIN: &[&str] = &["address", "email", "display"];

/// User-id display chain
pub const USER_ID_CHAIN: &[&str] = &["id", "content", "value"];

/// Relationship name chain when no `names` list is attached
pub const RELATIONSHIP_NAME_CHAIN: &[&str] = &["name", "display", "content"];

/// Relationship subtype ("Sister", "Coworker", ...)
pub const RELATIONSHIP_SUBTYPE_KEYS: &[&str] = &["@subtype", "subtype", "relationship"];

/// Key-hint substrings that route a value through date formatting
pub const DATE_HINTS: &[&str] = &["date", "since", "seen"];

/// Entity metadata keys; the `@` form is preferred, the bare form is the fallback
pub const TYPE_KEYS: &[&str] = &["@type", "type"];
pub const VALID_SINCE_KEYS: &[&str] = &["@valid_since", "valid_since"];
pub const LAST_SEEN_KEYS: &[&str] = &["@last_seen", "last_seen"];
pub const CURRENT_KEYS: &[&str] = &["@current", "current"];

/// Person match score
pub const MATCH_KEY: &str = "@match";

/// Quota panel fields shown in the on-screen view, in display order
pub const QUOTA_PANEL_KEYS: &[&str] = &[
    "QpsAllotted",
    "QpsCurrent",
    "QuotaAllotted",
    "QuotaCurrent",
    "QuotaReset",
    "QpsLiveAllotted",
    "QpsLiveCurrent",
];

/// True when `key` is on the always-removed deny-list
pub fn is_denied(key: &str) -> bool {
    SEARCH_POINTER_KEYS.contains(&key)
        || key.ends_with(HASH_SUFFIX)
        || key == INFERRED_KEY
        || key == INTERNAL_ID_KEY
}

/// True when `key` is a quota/rate-limit counter or the endpoint reference
pub fn is_volatile(key: &str) -> bool {
    if key == ENDPOINT_KEY {
        return true;
    }
    let lower = key.to_ascii_lowercase();
    VOLATILE_SUBSTRINGS.iter().any(|s| lower.contains(s))
}

/// True when a key hint asks for date rendering
pub fn is_date_hint(hint: &str) -> bool {
    let lower = hint.to_ascii_lowercase();
    DATE_HINTS.iter().any(|h| lower.contains(h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_list() {
        assert!(is_denied("@search_pointer"));
        assert!(is_denied("search_pointer"));
        assert!(is_denied("email_md5"));
        assert!(is_denied("@inferred"));
        assert!(is_denied("@id"));

        assert!(!is_denied("@match"));
        assert!(!is_denied("@valid_since"));
        assert!(!is_denied("md5_of_something"));
    }

    #[test]
    fn test_volatile_keys() {
        assert!(is_volatile("quota_allotted"));
        assert!(is_volatile("qps_current"));
        assert!(is_volatile("QpsAllotted"));
        assert!(is_volatile("QuotaReset"));
        assert!(is_volatile("endpoint"));

        assert!(!is_volatile("endpoints_used"));
        assert!(!is_volatile("display"));
    }

    #[test]
    fn test_date_hints() {
        assert!(is_date_hint("date"));
        assert!(is_date_hint("@valid_since"));
        assert!(is_date_hint("@last_seen"));
        assert!(is_date_hint("registrationDate"));
        assert!(!is_date_hint("display_international"));
    }
}
