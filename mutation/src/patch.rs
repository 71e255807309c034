//! Partial Update Compiler.
//!
//! Turns the fields supplied with a patch into the ordered assignments to
//! apply, and the merged view of the row that the validators check.

use thiserror::Error;
use wardbook_core::{Fields, Value};
use wardbook_registry::{canonical_value, EntityContract};

/// The patch named no field the contract lets a caller write.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("patch carries no updatable fields")]
pub struct EmptyPatchError;

/// A compiled patch.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPatch {
    /// `(field, value)` pairs in declaration order.
    pub assignments: Vec<(String, Value)>,
    /// The existing row with the assignments applied.
    pub merged: Fields,
}

impl CompiledPatch {
    /// Names of the assigned fields.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.assignments.iter().map(|(name, _)| name.as_str())
    }
}

/// Compile `patch` against the `existing` row.
///
/// Undeclared fields and the key field are dropped. An explicit null is kept
/// as a deliberate clear. Values are canonicalized (ISO dates, enum
/// spellings). Assigning a field its current value still counts as a change.
pub fn compile_patch(
    contract: &EntityContract,
    existing: &Fields,
    patch: &Fields,
) -> Result<CompiledPatch, EmptyPatchError> {
    let key_field = contract.key_field();
    let assignments: Vec<(String, Value)> = contract
        .fields
        .iter()
        .filter(|def| def.name != key_field)
        .filter_map(|def| {
            patch
                .get(&def.name)
                .map(|value| (def.name.clone(), canonical_value(def, value)))
        })
        .collect();

    if assignments.is_empty() {
        return Err(EmptyPatchError);
    }

    Ok(CompiledPatch {
        merged: merge(existing, &assignments),
        assignments,
    })
}

/// Apply assignments over a copy of `existing`.
pub fn merge(existing: &Fields, assignments: &[(String, Value)]) -> Fields {
    let mut merged = existing.clone();
    for (field, value) in assignments {
        merged.insert(field.clone(), value.clone());
    }
    merged
}
