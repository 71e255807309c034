//! The Registry - immutable contract lookup.

use crate::{EntityContract, RegistryError, RegistryResult};
use std::collections::HashMap;
use wardbook_core::EntityKind;

/// The Registry provides runtime lookup of shape contracts.
/// It is immutable after construction.
#[derive(Debug, Clone)]
pub struct Registry {
    contracts: HashMap<EntityKind, EntityContract>,
}

impl Registry {
    pub(crate) fn new(contracts: HashMap<EntityKind, EntityContract>) -> Self {
        Self { contracts }
    }

    /// Get the contract for an entity kind.
    pub fn get(&self, kind: EntityKind) -> Option<&EntityContract> {
        self.contracts.get(&kind)
    }

    /// Get the contract for an entity kind, failing if none was registered.
    pub fn contract(&self, kind: EntityKind) -> RegistryResult<&EntityContract> {
        self.get(kind)
            .ok_or_else(|| RegistryError::UnknownTable(kind.table_name().to_string()))
    }

    /// Get a contract by table name.
    pub fn get_by_table(&self, table: &str) -> Option<&EntityContract> {
        EntityKind::from_table(table).and_then(|kind| self.get(kind))
    }

    /// All contracts, ordered by kind.
    pub fn all_contracts(&self) -> Vec<&EntityContract> {
        let mut contracts: Vec<_> = self.contracts.values().collect();
        contracts.sort_by_key(|c| c.kind);
        contracts
    }

    /// Number of registered contracts.
    pub fn contract_count(&self) -> usize {
        self.contracts.len()
    }
}
