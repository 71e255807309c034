//! Canonical request payloads.

use wardbook_core::{fields, Fields, Value};

/// A valid patient with every field set.
pub fn alice_patient() -> Fields {
    fields! {
        "name" => "Alice",
        "age" => 45i64,
        "arrival_date" => "2024-01-10",
        "departure_date" => "2024-01-20",
        "service" => "ICU",
        "satisfaction" => 80i64,
    }
}

/// [`alice_patient`] discharged before she arrived.
pub fn alice_patient_backdated() -> Fields {
    let mut fields = alice_patient();
    fields.insert("departure_date".to_string(), Value::from("2024-01-05"));
    fields
}

/// A staff member with legacy label spellings.
pub fn kim_staff() -> Fields {
    fields! {
        "staff_name" => "Kim",
        "role" => "Nursing Assistant",
        "service" => "FRONT DESK",
    }
}

/// A schedule slot without an explicit `on_shift`.
pub fn night_shift(service: &str) -> Fields {
    fields! {
        "day_or_shift" => "night",
        "staff_name" => "Kim",
        "role" => "nurse",
        "service" => service,
    }
}

/// Metrics for one service and week.
pub fn weekly_metrics(service: &str, week: i64, month: i64) -> Fields {
    fields! {
        "week" => week,
        "month" => month,
        "service" => service,
        "available_beds" => 12i64,
        "patients_request" => 30i64,
        "patients_admitted" => 25i64,
        "patients_refused" => 5i64,
        "patient_satisfaction" => 77i64,
        "staff_morale" => 64i64,
    }
}
