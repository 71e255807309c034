//! Relational backend on SQLite.

mod codec;
mod schema;
mod store;
mod unit;

pub use schema::{AUDIT_TABLE, REJECTION_TABLE, SCHEMA};
pub use store::SqliteStore;
pub use unit::{UnitOfWork, UnitState};
