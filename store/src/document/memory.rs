//! In-memory document store.

use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use tracing::debug;
use wardbook_core::{EntityKind, Fields, RowKey, Value};
use wardbook_registry::{hospital_contracts, parse_document_schema, to_document_schema, KeySource};

use super::DocumentStore;
use crate::error::{StoreError, StoreResult};

/// Length in bytes of a generated document id (24 hex characters).
const OBJECT_ID_BYTES: usize = 12;

#[derive(Debug)]
struct Collection {
    schema: serde_json::Value,
    key: KeySource,
    documents: BTreeMap<String, Fields>,
    unique_indexes: Vec<Vec<String>>,
}

impl Collection {
    /// Name of the first unique index `candidate` collides with, ignoring the
    /// document stored under `skip`.
    fn unique_conflict(&self, candidate: &Fields, skip: Option<&str>) -> Option<String> {
        self.unique_indexes.iter().find_map(|index| {
            let clash = self.documents.iter().any(|(key, doc)| {
                Some(key.as_str()) != skip
                    && index.iter().all(|field| match (doc.get(field), candidate.get(field)) {
                        (Some(a), Some(b)) => !a.is_null() && a == b,
                        _ => false,
                    })
            });
            clash.then(|| index.join(", "))
        })
    }
}

/// Document store holding collections in memory.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

fn new_object_id() -> String {
    let bytes: [u8; OBJECT_ID_BYTES] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with one collection per hospital entity, each declaring the
    /// schema rendered from its contract. Weekly metrics get a unique index
    /// on (week, month, service).
    pub fn hospital() -> StoreResult<Self> {
        let store = Self::new();
        for contract in hospital_contracts() {
            let unique: &[&str] = match contract.kind {
                EntityKind::ServiceWeekly => &["week", "month", "service"],
                _ => &[],
            };
            store.create_collection(contract.table(), to_document_schema(&contract))?;
            if !unique.is_empty() {
                store.create_unique_index(contract.table(), unique)?;
            }
        }
        Ok(store)
    }

    /// Create a collection from its declared schema.
    pub fn create_collection(&self, name: &str, schema: serde_json::Value) -> StoreResult<()> {
        let kind = EntityKind::from_table(name)
            .ok_or_else(|| StoreError::UnknownCollection(name.to_string()))?;
        let contract = parse_document_schema(kind, &schema)?;
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        collections.insert(
            name.to_string(),
            Collection {
                schema,
                key: contract.key,
                documents: BTreeMap::new(),
                unique_indexes: Vec::new(),
            },
        );
        debug!(collection = name, "collection created");
        Ok(())
    }

    /// Add a unique index over the given fields.
    pub fn create_unique_index(&self, name: &str, fields: &[&str]) -> StoreResult<()> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let collection = collections
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownCollection(name.to_string()))?;
        collection
            .unique_indexes
            .push(fields.iter().map(|f| f.to_string()).collect());
        Ok(())
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn fetch_schema(&self, collection: &str) -> StoreResult<serde_json::Value> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        collections
            .get(collection)
            .map(|c| c.schema.clone())
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
    }

    fn find_one(&self, collection: &str, key: &RowKey) -> StoreResult<Option<Fields>> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        let coll = collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(coll.documents.get(key.as_str()).cloned())
    }

    fn find(&self, collection: &str) -> StoreResult<Vec<Fields>> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        let coll = collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(coll.documents.values().cloned().collect())
    }

    fn insert_one(&self, collection: &str, mut document: Fields) -> StoreResult<RowKey> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;

        let key = match &coll.key {
            KeySource::Surrogate { field } => {
                let id = new_object_id();
                document.insert(field.clone(), Value::String(id.clone()));
                id
            }
            KeySource::Business { field } => match document.get(field) {
                Some(Value::String(key)) => key.clone(),
                _ => {
                    let message = format!("missing business key '{}'", field);
                    return Err(StoreError::invalid_row(collection, message));
                }
            },
        };

        if coll.documents.contains_key(&key) {
            return Err(StoreError::unique_violation(collection, format!("duplicate key {}", key)));
        }
        if let Some(index) = coll.unique_conflict(&document, None) {
            return Err(StoreError::unique_violation(collection, format!("duplicate ({})", index)));
        }

        coll.documents.insert(key.clone(), document);
        debug!(collection, key = %key, "document inserted");
        Ok(RowKey::new(key))
    }

    fn update_one(
        &self,
        collection: &str,
        key: &RowKey,
        assignments: &[(String, Value)],
    ) -> StoreResult<bool> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;

        let Some(existing) = coll.documents.get(key.as_str()) else {
            return Ok(false);
        };
        let mut updated = existing.clone();
        for (field, value) in assignments {
            updated.insert(field.clone(), value.clone());
        }
        if let Some(index) = coll.unique_conflict(&updated, Some(key.as_str())) {
            return Err(StoreError::unique_violation(collection, format!("duplicate ({})", index)));
        }

        coll.documents.insert(key.as_str().to_string(), updated);
        debug!(collection, key = %key, "document updated");
        Ok(true)
    }

    fn delete_one(&self, collection: &str, key: &RowKey) -> StoreResult<bool> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(coll.documents.remove(key.as_str()).is_some())
    }
}
