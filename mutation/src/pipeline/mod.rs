//! The Mutation Pipeline.
//!
//! Every write runs `Received -> ShapeChecked -> RuleChecked -> Applied`,
//! or stops at `Rejected`. Creates draw a business key before the shape
//! check. Replaces and patches locate the row first; a missing row ends the
//! run as `NotFound` before any validator runs. Patches are validated on the
//! merged row, not on the patch alone. Deletes skip validation and are not
//! audited.

mod document;
mod relational;

pub use document::DocumentPipeline;
pub use relational::RelationalPipeline;

use rand::Rng;
use tracing::{info, warn};
use wardbook_constraint::ShapeError;
use wardbook_core::{EntityKind, Fields, RowKey, Value};
use wardbook_registry::{EntityContract, KeySource};

use crate::config::PipelineConfig;
use crate::error::MutationResult;
use crate::request::WriteKind;
use crate::result::{MutationOutcome, Rejection};
use crate::state::{PipelineState, Progress};

/// A backend-specific pipeline.
pub trait MutationPipeline: Send + Sync {
    /// Run one write request to its terminal outcome.
    fn execute(&self, request: crate::MutationRequest) -> MutationResult<MutationOutcome>;

    /// Fetch one stored row.
    fn get(&self, kind: EntityKind, key: &RowKey) -> MutationResult<Option<Fields>>;

    /// Every stored row of a kind, ordered by key.
    fn list(&self, kind: EntityKind) -> MutationResult<Vec<Fields>>;
}

/// Canonical candidate for a create, with defaults and a fresh business key.
pub(crate) fn prepare_create<R: Rng>(
    contract: &EntityContract,
    fields: &Fields,
    config: &PipelineConfig,
    rng: &mut R,
) -> Fields {
    let mut candidate = contract.canonicalize(fields);
    contract.apply_defaults(&mut candidate);
    if let KeySource::Business { field } = &contract.key {
        if let Some(scheme) = config.key_scheme(contract.kind) {
            candidate.insert(field.clone(), Value::String(scheme.generate(rng)));
        }
    }
    candidate
}

/// Canonical candidate for a full replace of the row at `key`.
pub(crate) fn prepare_replace(contract: &EntityContract, fields: &Fields, key: &RowKey) -> Fields {
    let mut candidate = contract.canonicalize(fields);
    contract.apply_defaults(&mut candidate);
    if let KeySource::Business { field } = &contract.key {
        candidate.insert(field.clone(), Value::String(key.as_str().to_string()));
    }
    candidate
}

/// Assign every non-key field; absent ones become null.
pub(crate) fn replace_assignments(
    contract: &EntityContract,
    candidate: &Fields,
) -> Vec<(String, Value)> {
    let key_field = contract.key_field();
    contract
        .fields
        .iter()
        .filter(|def| def.name != key_field)
        .map(|def| {
            let value = candidate.get(&def.name).cloned().unwrap_or(Value::Null);
            (def.name.clone(), value)
        })
        .collect()
}

/// Key a create will be stored under, when known before the insert.
pub(crate) fn business_key(contract: &EntityContract, candidate: &Fields) -> Option<RowKey> {
    match &contract.key {
        KeySource::Business { field } => candidate
            .get(field)
            .and_then(Value::as_str)
            .map(RowKey::from),
        KeySource::Surrogate { .. } => None,
    }
}

pub(crate) fn rejected_shape(
    progress: &mut Progress,
    contract: &EntityContract,
    error: ShapeError,
) -> MutationOutcome {
    progress.advance(PipelineState::Rejected);
    warn!(table = contract.table(), field = %error.field, reason = %error, "shape check failed");
    MutationOutcome::Rejected(Rejection::Shape(error))
}

pub(crate) fn rejected_missing_key(
    progress: &mut Progress,
    kind: EntityKind,
    write: WriteKind,
) -> MutationOutcome {
    progress.advance(PipelineState::Rejected);
    warn!(table = kind.table_name(), write = %write, "request carries no row key");
    MutationOutcome::Rejected(Rejection::MissingKey)
}

pub(crate) fn not_found(kind: EntityKind, write: WriteKind, key: &RowKey) -> MutationOutcome {
    info!(table = kind.table_name(), write = %write, key = %key, "row not found");
    MutationOutcome::NotFound
}

pub(crate) fn empty_patch(kind: EntityKind, key: &RowKey) -> MutationOutcome {
    info!(table = kind.table_name(), key = %key, "patch carries no updatable fields");
    MutationOutcome::EmptyPatch
}
