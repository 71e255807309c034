//! Wardbook Store
//!
//! Storage backends for the mutation pipeline.
//!
//! Responsibilities:
//! - Relational backend: SQLite tables for the four entities plus the
//!   append-only `audit_log` and `validation_errors`, written through an
//!   explicit unit of work that implements the Audit Recorder and Error Sink
//! - Document backend: named collections that declare their shape as a
//!   `bsonType` schema, with no audit or rejection logs
//! - Store configuration and storage errors
//!
//! Connections are opened per unit of work and closed when it ends.

mod config;
mod document;
mod error;
mod relational;

pub use config::StoreConfig;
pub use document::{DocumentStore, MemoryDocumentStore};
pub use error::{StoreError, StoreResult};
pub use relational::{SqliteStore, UnitOfWork, UnitState, AUDIT_TABLE, REJECTION_TABLE, SCHEMA};
