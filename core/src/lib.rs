//! Wardbook Core Types
//!
//! This crate provides the foundational types used throughout Wardbook:
//! - Values and field maps (the `Value` enum and `Fields` records)
//! - Identity types (RowKey, RecordId)
//! - Entity kinds and their storage names
//! - Enumerated labels (staff roles, service labels)
//! - Common error types

mod error;
mod id;
mod kind;
mod label;
mod value;

pub use error::*;
pub use id::*;
pub use kind::*;
pub use label::*;
pub use value::*;
