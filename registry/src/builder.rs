//! RegistryBuilder for constructing an immutable Registry.

use crate::{EntityContract, FieldType, KeySource, Registry};
use std::collections::HashMap;
use thiserror::Error;
use wardbook_core::EntityKind;

/// Errors that can occur during registry construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate contract for table: {0}")]
    DuplicateContract(EntityKind),

    #[error("Duplicate field '{field}' in {kind}")]
    DuplicateField { kind: EntityKind, field: String },

    #[error("Business key field '{field}' of {kind} must be a declared required String")]
    InvalidBusinessKey { kind: EntityKind, field: String },

    #[error("Surrogate key field '{field}' of {kind} must not be declared as writable")]
    SurrogateKeyDeclared { kind: EntityKind, field: String },

    #[error("Enum field '{field}' in {kind} has no allowed values")]
    EmptyEnum { kind: EntityKind, field: String },

    #[error("No contract for table: {0}")]
    UnknownTable(String),

    #[error("Malformed document schema for {collection}: {message}")]
    MalformedSchema { collection: String, message: String },
}

impl RegistryError {
    pub fn malformed_schema(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedSchema {
            collection: collection.into(),
            message: message.into(),
        }
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Builder for constructing an immutable Registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    contracts: HashMap<EntityKind, EntityContract>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contract after checking its structure.
    pub fn insert(&mut self, contract: EntityContract) -> RegistryResult<()> {
        check_contract(&contract)?;
        if self.contracts.contains_key(&contract.kind) {
            return Err(RegistryError::DuplicateContract(contract.kind));
        }
        self.contracts.insert(contract.kind, contract);
        Ok(())
    }

    /// Build the immutable Registry.
    pub fn build(self) -> RegistryResult<Registry> {
        Ok(Registry::new(self.contracts))
    }
}

/// Structural checks every contract must pass.
pub(crate) fn check_contract(contract: &EntityContract) -> RegistryResult<()> {
    let kind = contract.kind;
    let mut seen: Vec<&str> = Vec::with_capacity(contract.fields.len());
    for def in &contract.fields {
        if seen.contains(&def.name.as_str()) {
            return Err(RegistryError::DuplicateField {
                kind,
                field: def.name.clone(),
            });
        }
        seen.push(&def.name);

        if let FieldType::Enum(allowed) = &def.field_type {
            if allowed.is_empty() {
                return Err(RegistryError::EmptyEnum {
                    kind,
                    field: def.name.clone(),
                });
            }
        }
    }

    match &contract.key {
        KeySource::Business { field } => {
            let valid = contract
                .get_field(field)
                .is_some_and(|def| {
                    def.required && !def.nullable && def.field_type == FieldType::String
                });
            if !valid {
                return Err(RegistryError::InvalidBusinessKey {
                    kind,
                    field: field.clone(),
                });
            }
        }
        KeySource::Surrogate { field } => {
            if contract.has_field(field) {
                return Err(RegistryError::SurrogateKeyDeclared {
                    kind,
                    field: field.clone(),
                });
            }
        }
    }
    Ok(())
}
