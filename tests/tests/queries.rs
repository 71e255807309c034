//! Read surface of the relational backend: listings, staff availability,
//! service metrics and the weak staff reference from schedules.

use pretty_assertions::assert_eq;
use wardbook_tests::prelude::*;

fn apply(fixture: &RelationalFixture, request: MutationRequest) -> RowKey {
    let outcome = fixture.pipeline.execute(request).unwrap();
    outcome
        .key()
        .cloned()
        .unwrap_or_else(|| panic!("expected an applied write, got {:?}", outcome))
}

#[test]
fn test_staff_on_shift_counts_only_active_slots() {
    // GIVEN three night slots in the ICU, two of them active, and one in surgery
    let fixture = RelationalFixture::new();
    for (service, on_shift) in [("ICU", true), ("ICU", true), ("ICU", false), ("surgery", true)] {
        let mut slot = night_shift(service);
        slot.insert("on_shift".into(), Value::Bool(on_shift));
        apply(&fixture, MutationRequest::create(EntityKind::StaffSchedule, slot));
    }

    // WHEN / THEN
    assert_eq!(fixture.store().staff_on_shift("ICU", "night").unwrap(), 2);
    assert_eq!(fixture.store().staff_on_shift("surgery", "night").unwrap(), 1);
    assert_eq!(fixture.store().staff_on_shift("ICU", "morning").unwrap(), 0);
}

#[test]
fn test_service_metrics_lookup() {
    let fixture = RelationalFixture::new();
    apply(
        &fixture,
        MutationRequest::create(EntityKind::ServiceWeekly, weekly_metrics("emergency", 10, 3)),
    );

    let found = fixture.store().service_metrics("emergency", 10, 3).unwrap().unwrap();
    assert_eq!(found.get("available_beds"), Some(&Value::Int(12)));
    assert_eq!(found.get("event"), Some(&Value::Null));
    assert!(fixture.store().service_metrics("emergency", 11, 3).unwrap().is_none());
}

#[test]
fn test_deleting_staff_keeps_their_schedule() {
    // GIVEN a staff member with an active slot
    let fixture = RelationalFixture::new();
    let staff = apply(&fixture, MutationRequest::create(EntityKind::Staff, kim_staff()));
    let mut slot = night_shift("ICU");
    slot.insert("staff_id".into(), Value::from(staff.as_str()));
    slot.insert("on_shift".into(), Value::Bool(true));
    let slot = apply(&fixture, MutationRequest::create(EntityKind::StaffSchedule, slot));

    // WHEN the staff member is deleted
    apply(&fixture, MutationRequest::delete(EntityKind::Staff, staff));

    // THEN the slot stays, detached
    let row = fixture.pipeline.get(EntityKind::StaffSchedule, &slot).unwrap().unwrap();
    assert_eq!(row.get("staff_id"), Some(&Value::Null));
    assert_eq!(row.get("staff_name"), Some(&Value::from("Kim")));
    assert_eq!(fixture.store().staff_on_shift("ICU", "night").unwrap(), 1);
}

#[test]
fn test_schedule_must_reference_existing_staff() {
    let fixture = RelationalFixture::new();
    let mut slot = night_shift("ICU");
    slot.insert("staff_id".into(), Value::from("STF-000000000000"));

    let result = fixture
        .pipeline
        .execute(MutationRequest::create(EntityKind::StaffSchedule, slot));

    assert!(result.is_err());
    assert!(fixture.pipeline.list(EntityKind::StaffSchedule).unwrap().is_empty());
    assert!(fixture.store().audit_log().unwrap().is_empty());
}

#[test]
fn test_logs_list_in_append_order() {
    let fixture = RelationalFixture::new();
    let first = apply(&fixture, MutationRequest::create(EntityKind::Patient, alice_patient()));
    fixture
        .pipeline
        .execute(MutationRequest::create(EntityKind::Patient, alice_patient_backdated()))
        .unwrap();
    let second = apply(&fixture, MutationRequest::create(EntityKind::Staff, kim_staff()));
    fixture
        .pipeline
        .execute(MutationRequest::create(
            EntityKind::Patient,
            fields! { "name" => "Bob", "age" => -1i64 },
        ))
        .unwrap();

    let audit = fixture.store().audit_log().unwrap();
    let keys: Vec<&RowKey> = audit.iter().map(|r| &r.row_key).collect();
    assert_eq!(keys, vec![&first, &second]);
    assert!(audit.windows(2).all(|w| w[0].id < w[1].id && w[0].changed_at <= w[1].changed_at));

    let messages: Vec<String> = fixture
        .store()
        .rejections()
        .unwrap()
        .into_iter()
        .map(|r| r.error_message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "departure_date=2024-01-05 before arrival_date=2024-01-10".to_string(),
            "age=-1".to_string(),
        ]
    );
}

#[test]
fn test_list_returns_every_kind_in_key_order() {
    let fixture = RelationalFixture::new();
    for week in [3i64, 1, 2] {
        apply(
            &fixture,
            MutationRequest::create(EntityKind::ServiceWeekly, weekly_metrics("ICU", week, 1)),
        );
    }

    let weeks: Vec<Value> = fixture
        .pipeline
        .list(EntityKind::ServiceWeekly)
        .unwrap()
        .into_iter()
        .filter_map(|row| row.get("week").cloned())
        .collect();

    // surrogate ids follow insertion order
    assert_eq!(weeks, vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
    assert!(fixture.pipeline.list(EntityKind::Patient).unwrap().is_empty());
}
