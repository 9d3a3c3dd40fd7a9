//! Record envelope resolution.
//!
//! Upstream responses arrive wrapped in one of three shapes:
//!
//! ```text
//! { status, code, message, data: { data: { person, query, ... } } }
//! { data: { person, query, ... } }
//! { person, query, ... }
//! ```
//!
//! [`RecordView::locate`] tries `root.data.data`, then `root.data`, then
//! `root`, and every entry point works off the payload it finds.

pub mod keys;

use crate::error::{ExportError, ExportResult};
use serde_json::{Map, Value};

const DATA_KEY: &str = "data";
const PERSON_KEY: &str = "person";
const QUERY_KEY: &str = "query";
const AVAILABLE_DATA_KEY: &str = "available_data";
const METADATA_KEY: &str = "metadata";
const SEARCH_ID_KEY: &str = "@search_id";
const STATUS_KEYS: &[&str] = &["status", "code", "message"];

/// Borrowed view over a located record payload
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    root: &'a Map<String, Value>,
    payload: &'a Map<String, Value>,
}

impl<'a> RecordView<'a> {
    /// Find the payload inside `root`.
    ///
    /// Fails with [`ExportError::NoData`] only when `root` is not a
    /// non-empty object; a payload without a person is still a valid view.
    pub fn locate(root: &'a Value) -> ExportResult<Self> {
        let root = match root {
            Value::Object(map) if !map.is_empty() => map,
            _ => return Err(ExportError::NoData),
        };

        let outer = root.get(DATA_KEY).and_then(Value::as_object);
        let inner = outer
            .and_then(|data| data.get(DATA_KEY))
            .and_then(Value::as_object);

        let payload = inner.or(outer).unwrap_or(root);

        tracing::debug!(
            depth = if inner.is_some() { 2 } else if outer.is_some() { 1 } else { 0 },
            keys = payload.len(),
            "[RecordView] Located payload"
        );

        Ok(Self { root, payload })
    }

    /// The resolved payload object
    pub fn payload(&self) -> &'a Map<String, Value> {
        self.payload
    }

    /// The `person` node, when it is an object
    pub fn person(&self) -> Option<&'a Value> {
        self.payload_object(PERSON_KEY)
    }

    pub fn query(&self) -> Option<&'a Value> {
        self.payload_object(QUERY_KEY)
    }

    pub fn available_data(&self) -> Option<&'a Value> {
        self.payload_object(AVAILABLE_DATA_KEY)
    }

    /// Request metadata attached by the proxy layer, at the root
    pub fn metadata(&self) -> Option<&'a Value> {
        self.root.get(METADATA_KEY).filter(|v| v.is_object())
    }

    /// `status`, `code` and `message`, from the root or else the payload
    pub fn status(&self) -> Vec<(&'static str, &'a Value)> {
        STATUS_KEYS
            .iter()
            .filter_map(|key| {
                self.root
                    .get(*key)
                    .filter(|v| !v.is_null())
                    .or_else(|| self.payload.get(*key).filter(|v| !v.is_null()))
                    .map(|v| (*key, v))
            })
            .collect()
    }

    /// Search metadata block, present only when the payload carries a search id
    pub fn search_metadata(&self) -> Option<Map<String, Value>> {
        let search_id = self.payload.get(SEARCH_ID_KEY)?;

        let mut block = Map::new();
        block.insert("search_id".to_string(), search_id.clone());
        for key in ["@persons_count", "top_match"] {
            if let Some(v) = self.payload.get(key) {
                block.insert(key.trim_start_matches('@').to_string(), v.clone());
            }
        }
        for (key, value) in self.payload {
            if key.starts_with(keys::METADATA_PREFIX) {
                block.insert(key.clone(), value.clone());
            }
        }
        Some(block)
    }

    /// Quota and rate-limit counters, present when either allotment is set
    pub fn quota_panel(&self) -> Vec<(&'static str, &'a Value)> {
        let has_allotment = ["QpsAllotted", "QuotaAllotted"]
            .iter()
            .any(|k| self.payload.get(*k).is_some_and(|v| !v.is_null()));
        if !has_allotment {
            return Vec::new();
        }

        keys::QUOTA_PANEL_KEYS
            .iter()
            .filter_map(|k| self.payload.get(*k).map(|v| (*k, v)))
            .collect()
    }

    fn payload_object(&self, key: &str) -> Option<&'a Value> {
        self.payload.get(key).filter(|v| v.is_object())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_locates_double_nested_payload() {
        let root = json!({
            "status": "success",
            "data": { "data": { "person": { "names": [] }, "query": { "phones": [] } } }
        });
        let view = RecordView::locate(&root).unwrap();
        assert!(view.person().is_some());
        assert!(view.query().is_some());
        assert_eq!(view.status(), vec![("status", &json!("success"))]);
    }

    #[test]
    fn test_locates_single_nested_payload() {
        let root = json!({ "data": { "person": { "gender": "F" } } });
        let view = RecordView::locate(&root).unwrap();
        assert_eq!(view.person().unwrap()["gender"], "F");
    }

    #[test]
    fn test_locates_bare_payload() {
        let root = json!({ "person": { "gender": "M" }, "available_data": { "premium": {} } });
        let view = RecordView::locate(&root).unwrap();
        assert_eq!(view.person().unwrap()["gender"], "M");
        assert!(view.available_data().is_some());
    }

    #[test]
    fn test_no_data() {
        assert_eq!(RecordView::locate(&json!(null)).unwrap_err(), ExportError::NoData);
        assert_eq!(RecordView::locate(&json!({})).unwrap_err(), ExportError::NoData);
        assert_eq!(RecordView::locate(&json!("text")).unwrap_err(), ExportError::NoData);
    }

    #[test]
    fn test_null_person_is_absent() {
        let root = json!({ "data": { "data": { "query": { "phones": [] }, "person": null } } });
        let view = RecordView::locate(&root).unwrap();
        assert!(view.person().is_none());
        assert!(view.query().is_some());
    }

    #[test]
    fn test_status_falls_back_to_payload() {
        let root = json!({ "data": { "status": "ok", "code": 200, "person": {} } });
        let view = RecordView::locate(&root).unwrap();
        let status = view.status();
        assert_eq!(status.len(), 2);
        assert_eq!(status[1], ("code", &json!(200)));
    }

    #[test]
    fn test_search_metadata() {
        let root = json!({ "data": { "@search_id": "s-1", "@persons_count": 2, "top_match": true } });
        let view = RecordView::locate(&root).unwrap();
        let block = view.search_metadata().unwrap();
        assert_eq!(block["search_id"], "s-1");
        assert_eq!(block["persons_count"], 2);
        assert_eq!(block["top_match"], true);
        assert_eq!(block["@search_id"], "s-1");

        let root = json!({ "data": { "person": {} } });
        assert!(RecordView::locate(&root).unwrap().search_metadata().is_none());
    }

    #[test]
    fn test_quota_panel() {
        let root = json!({ "data": { "QpsAllotted": 10, "QpsCurrent": 3, "QuotaReset": "2026-03-01" } });
        let view = RecordView::locate(&root).unwrap();
        let panel = view.quota_panel();
        let keys: Vec<&str> = panel.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["QpsAllotted", "QpsCurrent", "QuotaReset"]);

        let root = json!({ "data": { "QpsCurrent": 3 } });
        assert!(RecordView::locate(&root).unwrap().quota_panel().is_empty());
    }
}
