//! The hospital contracts: patients, staff, schedules and weekly metrics.

use crate::{
    EntityContract, FieldDef, FieldType, KeySource, Registry, RegistryBuilder, RegistryResult,
};
use wardbook_core::{EntityKind, ServiceLabel, StaffRole};

/// Prefix of generated patient keys.
pub const PATIENT_KEY_PREFIX: &str = "PAT-";
/// Prefix of generated staff keys.
pub const STAFF_KEY_PREFIX: &str = "STF-";

fn patient() -> EntityContract {
    EntityContract {
        kind: EntityKind::Patient,
        key: KeySource::business("patient_id"),
        fields: vec![
            FieldDef::new("patient_id", FieldType::String).required().with_length(1, 64),
            FieldDef::new("name", FieldType::String).required().with_length(1, 255),
            FieldDef::new("age", FieldType::Int).nullable(),
            FieldDef::new("arrival_date", FieldType::Date).nullable(),
            FieldDef::new("departure_date", FieldType::Date).nullable(),
            FieldDef::new("service", FieldType::String).nullable().with_max_length(64),
            FieldDef::new("satisfaction", FieldType::Int).nullable(),
        ],
    }
}

fn staff() -> EntityContract {
    EntityContract {
        kind: EntityKind::Staff,
        key: KeySource::business("staff_id"),
        fields: vec![
            FieldDef::new("staff_id", FieldType::String).required().with_length(1, 64),
            FieldDef::new("staff_name", FieldType::String).required().with_length(1, 255),
            FieldDef::new("role", FieldType::enumeration(StaffRole::canonical_names())).nullable(),
            FieldDef::new("service", FieldType::enumeration(ServiceLabel::canonical_names()))
                .nullable(),
        ],
    }
}

fn staff_schedule() -> EntityContract {
    EntityContract {
        kind: EntityKind::StaffSchedule,
        key: KeySource::surrogate("id"),
        fields: vec![
            FieldDef::new("day_or_shift", FieldType::String).required().with_length(1, 64),
            FieldDef::new("staff_id", FieldType::String).nullable().with_max_length(64),
            FieldDef::new("staff_name", FieldType::String).nullable().with_max_length(255),
            FieldDef::new("role", FieldType::String).nullable().with_max_length(64),
            FieldDef::new("service", FieldType::String).nullable().with_max_length(64),
            FieldDef::new("on_shift", FieldType::Bool).with_default(false),
        ],
    }
}

fn services_weekly() -> EntityContract {
    let count = |name: &str| FieldDef::new(name, FieldType::Int).nullable();
    EntityContract {
        kind: EntityKind::ServiceWeekly,
        key: KeySource::surrogate("id"),
        fields: vec![
            FieldDef::new("week", FieldType::Int).required(),
            FieldDef::new("month", FieldType::Int).required(),
            FieldDef::new("service", FieldType::String).required().with_length(1, 64),
            count("available_beds"),
            count("patients_request"),
            count("patients_admitted"),
            count("patients_refused"),
            count("patient_satisfaction"),
            count("staff_morale"),
            FieldDef::new("event", FieldType::String).nullable().with_max_length(255),
        ],
    }
}

/// The four hospital contracts in kind order.
pub fn hospital_contracts() -> Vec<EntityContract> {
    vec![patient(), staff(), staff_schedule(), services_weekly()]
}

/// Registry holding the hospital contracts, each checked on insertion.
pub fn hospital_registry() -> RegistryResult<Registry> {
    let mut builder = RegistryBuilder::new();
    for contract in hospital_contracts() {
        builder.insert(contract)?;
    }
    builder.build()
}
