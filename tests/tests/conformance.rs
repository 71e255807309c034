//! Conformance suite.
//!
//! Each scenario runs against a fresh relational and a fresh document
//! backend and must pass identically on both. Only behavior the two paths
//! share belongs here: shape checks, key handling, partial updates and
//! storage uniqueness. Business rules and the logs are relational-only.

use wardbook_tests::prelude::*;

#[test]
fn test_patient_lifecycle() {
    let scenario = Scenario::new("patient_lifecycle")
        .create("admit", "alice", EntityKind::Patient, alice_patient(), |a| {
            a.applied()
                .field("name", "Alice")
                .field("arrival_date", "2024-01-10")
                .field("service", "ICU")
        })
        .patch("rate", "alice", fields! { "satisfaction" => 90i64 }, |a| {
            a.applied()
                .field("satisfaction", 90i64)
                .field("name", "Alice")
                .field("age", 45i64)
                .field("departure_date", "2024-01-20")
        })
        .patch("rate_again", "alice", fields! { "satisfaction" => 90i64 }, |a| {
            a.applied().field("satisfaction", 90i64)
        })
        .replace("replace", "alice", fields! { "name" => "Alice B", "age" => 46i64 }, |a| {
            a.applied()
                .field("name", "Alice B")
                .field("age", 46i64)
                .field("satisfaction", Value::Null)
                .field("service", Value::Null)
        })
        .patch("nothing_to_patch", "alice", fields! { "favourite_colour" => "red" }, |a| {
            a.empty_patch().field("name", "Alice B")
        })
        .delete("discharge", "alice", |a| a.applied().gone())
        .patch("patch_after_delete", "alice", fields! { "age" => 47i64 }, |a| a.not_found())
        .delete("delete_twice", "alice", |a| a.not_found());

    replay(&scenario).unwrap();
}

#[test]
fn test_shape_rejections_match() {
    let scenario = Scenario::new("shape_rejections")
        .create("no_name", "p1", EntityKind::Patient, fields! { "age" => 30i64 }, |a| {
            a.rejected_shape("name")
        })
        .create("empty_name", "p2", EntityKind::Patient, fields! { "name" => "" }, |a| {
            a.rejected_shape("name")
        })
        .create(
            "age_as_text",
            "p3",
            EntityKind::Patient,
            fields! { "name" => "Bo", "age" => "forty" },
            |a| a.rejected_shape("age"),
        )
        .create(
            "bad_date",
            "p4",
            EntityKind::Patient,
            fields! { "name" => "Bo", "arrival_date" => "10/01/2024" },
            |a| a.rejected_shape("arrival_date"),
        )
        .create(
            "unknown_role",
            "s1",
            EntityKind::Staff,
            fields! { "staff_name" => "Lee", "role" => "janitor" },
            |a| a.rejected_shape("role"),
        )
        .create(
            "metric_without_week",
            "m1",
            EntityKind::ServiceWeekly,
            fields! { "month" => 3i64, "service" => "surgery" },
            |a| a.rejected_shape("week"),
        )
        .create(
            "schedule_shift_null",
            "sched",
            EntityKind::StaffSchedule,
            fields! { "day_or_shift" => "night", "on_shift" => Value::Null },
            |a| a.rejected_shape("on_shift"),
        );

    replay(&scenario).unwrap();
}

#[test]
fn test_first_mismatch_in_declaration_order() {
    // name comes before age in the contract, so it is reported first
    let scenario = Scenario::new("declaration_order").create(
        "two_problems",
        "p",
        EntityKind::Patient,
        fields! { "age" => true },
        |a| a.rejected_shape("name"),
    );

    replay(&scenario).unwrap();
}

#[test]
fn test_legacy_labels_are_normalized() {
    let scenario = Scenario::new("legacy_labels")
        .create("hire", "kim", EntityKind::Staff, kim_staff(), |a| {
            a.applied()
                .field("role", "nursing_assistant")
                .field("service", "front_desk")
        })
        .patch("promote", "kim", fields! { "role" => "ADMIN", "service" => "icu" }, |a| {
            a.applied().field("role", "admin").field("service", "ICU").field("staff_name", "Kim")
        })
        .patch("clear_service", "kim", fields! { "service" => Value::Null }, |a| {
            a.applied().field("service", Value::Null).field("role", "admin")
        });

    replay(&scenario).unwrap();
}

#[test]
fn test_schedule_on_shift_default() {
    let scenario = Scenario::new("schedule_default")
        .create("plan", "slot", EntityKind::StaffSchedule, night_shift("ICU"), |a| {
            a.applied().field("on_shift", false).field("day_or_shift", "night")
        })
        .patch("start", "slot", fields! { "on_shift" => true }, |a| {
            a.applied().field("on_shift", true).field("service", "ICU")
        })
        .replace("replan", "slot", night_shift("surgery"), |a| {
            a.applied().field("on_shift", false).field("service", "surgery")
        });

    replay(&scenario).unwrap();
}

#[test]
fn test_business_key_cannot_be_patched() {
    let scenario = Scenario::new("key_is_fixed")
        .create("admit", "alice", EntityKind::Patient, alice_patient(), |a| a.applied())
        .patch("rekey", "alice", fields! { "patient_id" => "PAT-0000000000000000" }, |a| {
            a.empty_patch()
        })
        .replace(
            "rekey_by_replace",
            "alice",
            fields! { "patient_id" => "PAT-0000000000000000", "name" => "Alice" },
            |a| {
                a.applied().check(|outcome| {
                    outcome
                        .key()
                        .map_or(false, |key| key.as_str() != "PAT-0000000000000000")
                })
            },
        );

    replay(&scenario).unwrap();
}

#[test]
fn test_patch_cannot_break_required_fields() {
    let scenario = Scenario::new("merged_shape")
        .create("admit", "alice", EntityKind::Patient, alice_patient(), |a| a.applied())
        .patch("clear_name", "alice", fields! { "name" => Value::Null }, |a| {
            a.rejected_shape("name").field("name", "Alice")
        })
        .patch("mistyped", "alice", fields! { "age" => "old" }, |a| {
            a.rejected_shape("age").field("age", 45i64)
        });

    replay(&scenario).unwrap();
}

#[test]
fn test_writes_to_missing_rows() {
    let mut scenario = Scenario::new("ghosts");
    for kind in EntityKind::ALL {
        scenario = scenario
            .ghost("replace", kind, WriteKind::Replace, fields! { "name" => "X" }, |a| {
                a.not_found()
            })
            .ghost("patch", kind, WriteKind::Patch, fields! { "name" => "X" }, |a| {
                a.not_found()
            })
            .ghost("delete", kind, WriteKind::Delete, Fields::new(), |a| a.not_found());
    }

    replay(&scenario).unwrap();
}

#[test]
fn test_metric_triple_is_unique() {
    let metric = |week| weekly_metrics("emergency", week, 3);
    let scenario = Scenario::new("metric_uniqueness")
        .create("first", "w10", EntityKind::ServiceWeekly, metric(10), |a| {
            a.applied().field("patients_admitted", 25i64)
        })
        .create("again", "w10b", EntityKind::ServiceWeekly, metric(10), |a| {
            a.unique_violation()
        })
        .create("next_week", "w11", EntityKind::ServiceWeekly, metric(11), |a| a.applied())
        .patch("move_onto_w10", "w11", fields! { "week" => 10i64 }, |a| a.unique_violation());

    replay(&scenario).unwrap();
}
