//! Document backend: named collections with declared shape schemas.
//!
//! Collections have no audit or rejection logs; a rejected write is only
//! reported back to the caller.

mod memory;

pub use memory::MemoryDocumentStore;

use wardbook_core::{Fields, RowKey, Value};

use crate::error::StoreResult;

/// A document database. Methods take `&self` so one store can serve
/// concurrent requests; implementations do their own synchronization.
pub trait DocumentStore: Send + Sync {
    /// The declared `bsonType` schema of a collection.
    fn fetch_schema(&self, collection: &str) -> StoreResult<serde_json::Value>;

    /// One document by key.
    fn find_one(&self, collection: &str, key: &RowKey) -> StoreResult<Option<Fields>>;

    /// Every document, ordered by key.
    fn find(&self, collection: &str) -> StoreResult<Vec<Fields>>;

    /// Insert a document and return its key.
    fn insert_one(&self, collection: &str, document: Fields) -> StoreResult<RowKey>;

    /// Set fields on one document. Returns whether it exists.
    fn update_one(
        &self,
        collection: &str,
        key: &RowKey,
        assignments: &[(String, Value)],
    ) -> StoreResult<bool>;

    /// Delete one document. Returns whether it existed.
    fn delete_one(&self, collection: &str, key: &RowKey) -> StoreResult<bool>;
}
