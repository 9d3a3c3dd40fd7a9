//! Dossier builder scenarios
//!
//! End-to-end checks from a raw envelope through sanitization to the
//! dossier header, plus relationship expansion and empty-shape guarantees.

use super::*;
use crate::record::RecordView;
use crate::sanitize::{sanitize, SanitizeOptions};
use serde_json::json;

fn dossier_of(root: &Value) -> Option<Dossier> {
    let clean = sanitize(root, SanitizeOptions::for_display());
    let view = RecordView::locate(&clean).unwrap();
    build_dossier(view.person())
}

#[test]
fn test_end_to_end_primary_values() {
    let root = json!({
        "data": { "data": { "person": {
            "names": [{ "display": "Jane Doe" }],
            "phones": [{ "display_international": "+1 555 0100" }],
            "@match": 0.87
        } } }
    });

    let dossier = dossier_of(&root).unwrap();
    let summary = dossier.summary();

    assert_eq!(summary.name, "Jane Doe");
    assert_eq!(summary.phone, "+1 555 0100");
    assert_eq!(summary.match_label.as_deref(), Some("87% Match"));

    assert!(dossier.emails.is_empty());
    assert!(dossier.addresses.is_empty());
    assert!(dossier.usernames.is_empty());
    assert!(dossier.user_ids.is_empty());
    assert!(dossier.urls.is_empty());
    assert!(dossier.relationships.is_empty());
    assert!(dossier.jobs.is_empty());
    assert!(dossier.educations.is_empty());
    assert!(dossier.images.is_empty());
    assert!(dossier.languages.is_empty());
}

#[test]
fn test_absent_person() {
    assert!(build_dossier(None).is_none());
    assert!(build_dossier(Some(&Value::Null)).is_none());
}

#[test]
fn test_empty_person_has_every_list() {
    let dossier = build_dossier(Some(&json!({}))).unwrap();
    assert_eq!(dossier, Dossier::default());
    for (_, list) in dossier.lists() {
        assert!(list.is_empty());
    }

    let summary = dossier.summary();
    assert_eq!(summary.name, "Unknown");
    assert_eq!(summary.phone, "N/A");
    assert_eq!(summary.email, "N/A");
    assert_eq!(summary.location, "N/A");
    assert!(summary.match_label.is_none());
}

#[test]
fn test_malformed_lists_degrade_to_empty() {
    let dossier = build_dossier(Some(&json!({
        "names": "Jane",
        "phones": { "number": 1 },
        "emails": [null, "a@b.c"]
    })))
    .unwrap();

    assert!(dossier.names.is_empty());
    assert!(dossier.phones.is_empty());
    assert_eq!(dossier.emails.len(), 1);
    assert_eq!(dossier.emails[0].display(), "a@b.c");
}

#[test]
fn test_non_object_person() {
    let dossier = build_dossier(Some(&json!("oops"))).unwrap();
    assert_eq!(dossier, Dossier::default());
}

#[test]
fn test_relationship_expands_per_name() {
    let dossier = build_dossier(Some(&json!({
        "relationships": [{
            "type": "spouse",
            "names": [{ "display": "A" }, { "display": "B" }]
        }]
    })))
    .unwrap();

    assert_eq!(dossier.relationships.len(), 2);
    assert_eq!(dossier.relationships[0].display(), "A");
    assert_eq!(dossier.relationships[1].display(), "B");
    for entry in &dossier.relationships {
        assert_eq!(entry.entity_type.as_deref(), Some("spouse"));
    }
}

#[test]
fn test_relationship_valid_since_inheritance() {
    let dossier = build_dossier(Some(&json!({
        "relationships": [{
            "@type": "family",
            "@subtype": "Sister",
            "@valid_since": "2010-01-01",
            "names": [
                { "first": "Ana", "last": "Doe", "@valid_since": "2015-06-01" },
                { "display": "Eva Doe" }
            ]
        }]
    })))
    .unwrap();

    let [ana, eva] = dossier.relationships.as_slice() else {
        panic!("expected two relationship entries");
    };

    assert_eq!(ana.display(), "Ana Doe");
    assert_eq!(ana.valid_since, Some(json!("2015-06-01")));
    assert_eq!(eva.valid_since, Some(json!("2010-01-01")));
    assert_eq!(eva.text("relationship").as_deref(), Some("Sister"));
    assert_eq!(eva.type_label(), "family");
}

#[test]
fn test_relationship_without_names() {
    let dossier = build_dossier(Some(&json!({
        "relationships": [
            { "type": "work", "name": "Carl" },
            { "type": "work", "content": "Dana" },
            { "type": "work", "names": [] },
            "Eli"
        ]
    })))
    .unwrap();

    let names: Vec<String> = dossier.relationships.iter().map(Entity::display).collect();
    assert_eq!(names, vec!["Carl", "Dana", "N/A", "Eli"]);
}

#[test]
fn test_demographics() {
    let dossier = build_dossier(Some(&json!({
        "gender": { "content": "female" },
        "dob": { "display": "36 years old", "date_range": { "start": "1988-01-01", "end": "1988-12-31" } },
        "languages": [{ "language": "es", "region": "MX" }, { "display": "English" }],
        "ethnicities": [{ "content": "hispanic" }],
        "origin_countries": [{ "country": "MX" }, "US"]
    })))
    .unwrap();

    assert_eq!(dossier.gender.as_deref(), Some("female"));
    assert_eq!(dossier.dob.as_ref().unwrap().label(), "36 years old");
    assert_eq!(dossier.language_labels(), vec!["es", "English"]);
    assert_eq!(dossier.ethnicities, vec!["hispanic"]);
    assert_eq!(dossier.origin_countries, vec!["MX", "US"]);
}

#[test]
fn test_dob_range_only() {
    let dossier = build_dossier(Some(&json!({
        "dob": { "date_range": { "start": "1988-03-04" } }
    })))
    .unwrap();
    assert_eq!(dossier.dob.unwrap().label(), "03/04/1988");
}

#[test]
fn test_match_label_rounding() {
    assert_eq!(match_label(0.87), "87% Match");
    assert_eq!(match_label(0.875), "88% Match");
    assert_eq!(match_label(1.0), "100% Match");
    assert_eq!(match_label(0.0), "0% Match");
}

#[test]
fn test_summary_location_and_email() {
    let dossier = build_dossier(Some(&json!({
        "emails": [{ "address": "jane@example.com" }],
        "addresses": [{ "city": "Culiacan", "state": "SIN" }],
        "images": [{ "url": "https://img.example.com/1.jpg" }]
    })))
    .unwrap();

    let summary = dossier.summary();
    assert_eq!(summary.email, "jane@example.com");
    assert_eq!(summary.location, "Culiacan, SIN");
    assert_eq!(summary.image.as_deref(), Some("https://img.example.com/1.jpg"));
}

#[test]
fn test_sanitized_fields_do_not_reach_dossier() {
    let root = json!({
        "data": { "person": {
            "@id": "internal",
            "@inferred": true,
            "emails": [{ "address": "a@b.c", "email_md5": "abc" }]
        } }
    });

    let dossier = dossier_of(&root).unwrap();
    assert!(dossier.emails[0].field("email_md5").is_none());
}

#[test]
fn test_serialized_shape() {
    let dossier = build_dossier(Some(&json!({
        "@match": 0.5,
        "phones": [{ "number": 15550100, "@type": "mobile", "@valid_since": "2020-01-01" }],
        "origin_countries": [{ "country": "MX" }]
    })))
    .unwrap();

    let value = serde_json::to_value(&dossier).unwrap();
    assert_eq!(value["matchScore"], json!(0.5));
    assert_eq!(value["userIds"], json!([]));
    assert_eq!(value["originCountries"], json!(["MX"]));
    assert!(value["dob"].is_null());

    let phone = &value["phones"][0];
    assert_eq!(phone["kind"], "phone");
    assert_eq!(phone["type"], "mobile");
    assert_eq!(phone["validSince"], "2020-01-01");
    assert!(phone.get("lastSeen").is_none());
    assert_eq!(phone["fields"]["number"], json!(15550100));

    let summary = serde_json::to_value(dossier.summary()).unwrap();
    assert_eq!(summary["matchLabel"], "50% Match");
    assert!(summary["image"].is_null());
}
