//! Document backend: schema-driven contracts and the unaudited, rule-free
//! write path.

use pretty_assertions::assert_eq;
use serde_json::json;
use wardbook_mutation::DocumentPipeline;
use wardbook_registry::{hospital_registry, to_document_schema};
use wardbook_store::{DocumentStore, MemoryDocumentStore};
use wardbook_tests::prelude::*;

#[test]
fn test_rule_violations_are_stored_as_is() {
    // GIVEN
    let pipeline = document_pipeline();

    // WHEN a backdated stay with an out-of-range score is created
    let mut payload = alice_patient_backdated();
    payload.insert("satisfaction".into(), Value::Int(150));
    let outcome = pipeline
        .execute(MutationRequest::create(EntityKind::Patient, payload))
        .unwrap();

    // THEN it is applied without an audit reference
    assert!(outcome.is_applied());
    assert_eq!(outcome.audit_ref(), None);
    let stored = pipeline.get(EntityKind::Patient, outcome.key().unwrap()).unwrap().unwrap();
    assert_eq!(stored.get("satisfaction"), Some(&Value::Int(150)));
}

#[test]
fn test_shape_errors_match_the_relational_path() {
    // GIVEN the same malformed payloads for both backends
    let payloads = vec![
        (EntityKind::Patient, fields! { "age" => 4i64 }),
        (EntityKind::Patient, fields! { "name" => "Ana", "age" => "four" }),
        (EntityKind::Staff, fields! { "staff_name" => "Lee", "service" => "canteen" }),
        (EntityKind::ServiceWeekly, fields! { "week" => 1i64, "month" => 1i64, "service" => "" }),
    ];
    let relational = RelationalFixture::new();
    let document = document_pipeline();

    for (kind, payload) in payloads {
        // WHEN
        let a = relational
            .pipeline
            .execute(MutationRequest::create(kind, payload.clone()))
            .unwrap();
        let b = document.execute(MutationRequest::create(kind, payload)).unwrap();

        // THEN the rejections are identical
        assert!(matches!(a, MutationOutcome::Rejected(Rejection::Shape(_))), "{:?}", a);
        assert_eq!(a, b);
    }
}

#[test]
fn test_schema_is_fetched_once_per_collection() {
    let pipeline = document_pipeline();
    assert!(!pipeline.is_cached(EntityKind::ServiceWeekly));

    for week in 1..=3 {
        pipeline
            .execute(MutationRequest::create(
                EntityKind::ServiceWeekly,
                weekly_metrics("ICU", week, 1),
            ))
            .unwrap();
    }

    assert!(pipeline.is_cached(EntityKind::ServiceWeekly));
    assert!(!pipeline.is_cached(EntityKind::Staff));
    assert_eq!(pipeline.list(EntityKind::ServiceWeekly).unwrap().len(), 3);
}

#[test]
fn test_collection_declares_its_own_contract() {
    // GIVEN a staff collection whose schema is stricter than the default:
    // staff_name is capped at 8 characters and role is required
    let store = MemoryDocumentStore::new();
    store
        .create_collection(
            "staff",
            json!({
                "bsonType": "object",
                "required": ["staff_id", "staff_name", "role"],
                "properties": {
                    "staff_id": { "bsonType": "string", "minLength": 1, "maxLength": 64 },
                    "staff_name": { "bsonType": "string", "minLength": 1, "maxLength": 8 },
                    "role": { "bsonType": "string", "enum": ["doctor", "nurse"] }
                }
            }),
        )
        .unwrap();
    let pipeline = DocumentPipeline::new(store, PipelineConfig::default());

    // WHEN / THEN the declared contract is the one enforced
    let long_name = pipeline
        .execute(MutationRequest::create(
            EntityKind::Staff,
            fields! { "staff_name" => "Kimberley Park", "role" => "nurse" },
        ))
        .unwrap();
    assert!(matches!(
        long_name,
        MutationOutcome::Rejected(Rejection::Shape(ref e)) if e.field == "staff_name"
    ));

    let no_role = pipeline
        .execute(MutationRequest::create(EntityKind::Staff, fields! { "staff_name" => "Kim" }))
        .unwrap();
    assert!(matches!(
        no_role,
        MutationOutcome::Rejected(Rejection::Shape(ref e)) if e.field == "role"
    ));

    let ok = pipeline
        .execute(MutationRequest::create(
            EntityKind::Staff,
            fields! { "staff_name" => "Kim", "role" => "NURSE" },
        ))
        .unwrap();
    let stored = pipeline.get(EntityKind::Staff, ok.key().unwrap()).unwrap().unwrap();
    assert_eq!(stored.get("role"), Some(&Value::from("nurse")));
}

#[test]
fn test_missing_collection_is_a_storage_failure() {
    let pipeline = DocumentPipeline::new(MemoryDocumentStore::new(), PipelineConfig::default());

    let result = pipeline.execute(MutationRequest::create(EntityKind::Patient, alice_patient()));

    assert!(result.is_err());
    assert!(!pipeline.is_cached(EntityKind::Patient));
}

#[test]
fn test_hospital_collections_publish_rendered_schemas() {
    let store = MemoryDocumentStore::hospital().unwrap();
    let registry = hospital_registry().unwrap();

    for kind in EntityKind::ALL {
        let schema = store.fetch_schema(kind.table_name()).unwrap();
        assert_eq!(schema, to_document_schema(registry.get(kind).unwrap()));
    }
}
