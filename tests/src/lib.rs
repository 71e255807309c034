//! Wardbook Tests
//!
//! Integration test support: write scenarios once and replay them against
//! every backend.
//!
//! # Example
//!
//! ```ignore
//! use wardbook_tests::prelude::*;
//!
//! let scenario = Scenario::new("admission")
//!     .create("admit", "alice", EntityKind::Patient, alice_patient(), |a| a.applied())
//!     .patch("rate", "alice", fields! { "satisfaction" => 90i64 }, |a| {
//!         a.applied().field("satisfaction", 90i64).field("name", "Alice")
//!     });
//!
//! replay(&scenario).unwrap();
//! ```

mod fixture;
mod payload;
mod runner;
mod scenario;

pub use assertion::{Assertion, Expect};
pub use error::{ScenarioError, ScenarioResult};
pub use fixture::{backends, document_pipeline, init_tracing, replay, Backend, RelationalFixture};
pub use payload::{alice_patient, alice_patient_backdated, kim_staff, night_shift, weekly_metrics};
pub use runner::Runner;
pub use scenario::{Action, Scenario, Step, GHOST_KEY};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        alice_patient, alice_patient_backdated, backends, document_pipeline, init_tracing,
        kim_staff, night_shift, replay, weekly_metrics, Assertion, RelationalFixture, Scenario,
        GHOST_KEY,
    };
    pub use wardbook_core::{fields, EntityKind, Fields, RowKey, Value};
    pub use wardbook_journal::Operation;
    pub use wardbook_mutation::{
        MutationOutcome, MutationPipeline, MutationRequest, PipelineConfig, Rejection, WriteKind,
    };
}
