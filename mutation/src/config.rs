//! Pipeline configuration.

use serde::Deserialize;
use std::env;
use wardbook_core::EntityKind;
use wardbook_journal::DEFAULT_ACTOR;
use wardbook_registry::{PATIENT_KEY_PREFIX, STAFF_KEY_PREFIX};

use crate::error::{MutationError, MutationResult};
use crate::key::KeyScheme;

const PATIENT_KEY_HEX_LEN: usize = 16;
const STAFF_KEY_HEX_LEN: usize = 12;

/// Settings shared by every run of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineConfig {
    /// Identity written to `changed_by` when a request names none.
    #[serde(default = "default_actor")]
    pub actor: String,
    #[serde(default = "default_patient_keys")]
    pub patient_keys: KeyScheme,
    #[serde(default = "default_staff_keys")]
    pub staff_keys: KeyScheme,
}

fn default_actor() -> String {
    DEFAULT_ACTOR.to_string()
}

fn default_patient_keys() -> KeyScheme {
    KeyScheme::new(PATIENT_KEY_PREFIX, PATIENT_KEY_HEX_LEN)
}

fn default_staff_keys() -> KeyScheme {
    KeyScheme::new(STAFF_KEY_PREFIX, STAFF_KEY_HEX_LEN)
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            actor: default_actor(),
            patient_keys: default_patient_keys(),
            staff_keys: default_staff_keys(),
        }
    }
}

impl PipelineConfig {
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    pub fn with_patient_keys(mut self, scheme: KeyScheme) -> Self {
        self.patient_keys = scheme;
        self
    }

    pub fn with_staff_keys(mut self, scheme: KeyScheme) -> Self {
        self.staff_keys = scheme;
        self
    }

    /// Key scheme for kinds keyed by a generated business key.
    pub fn key_scheme(&self, kind: EntityKind) -> Option<&KeyScheme> {
        match kind {
            EntityKind::Patient => Some(&self.patient_keys),
            EntityKind::Staff => Some(&self.staff_keys),
            EntityKind::StaffSchedule | EntityKind::ServiceWeekly => None,
        }
    }

    /// Read `WARDBOOK_ACTOR`, `WARDBOOK_PATIENT_KEY_PREFIX` and
    /// `WARDBOOK_STAFF_KEY_PREFIX`, after loading `.env` if one exists.
    pub fn from_env() -> MutationResult<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Ok(actor) = env::var("WARDBOOK_ACTOR") {
            if actor.trim().is_empty() {
                return Err(MutationError::config("WARDBOOK_ACTOR", "must not be blank"));
            }
            config.actor = actor;
        }
        if let Ok(prefix) = env::var("WARDBOOK_PATIENT_KEY_PREFIX") {
            config.patient_keys.prefix = prefix;
        }
        if let Ok(prefix) = env::var("WARDBOOK_STAFF_KEY_PREFIX") {
            config.staff_keys.prefix = prefix;
        }
        Ok(config)
    }
}
