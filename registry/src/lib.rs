//! Wardbook Registry
//!
//! Runtime shape-contract lookup. Single source of truth for which fields each
//! entity kind has, their primitive types, required-ness and nullability.
//! Every contract is checked by RegistryBuilder, and the built registry is
//! immutable.
//!
//! The same contracts render to declarative document schemas (see
//! [`to_document_schema`]) so the document backend checks an identical shape.

mod builder;
mod document;
mod hospital;
mod registry;
mod types;

pub use builder::{RegistryBuilder, RegistryError, RegistryResult};
pub use document::{parse_document_schema, to_document_schema};
pub use hospital::{hospital_contracts, hospital_registry, PATIENT_KEY_PREFIX, STAFF_KEY_PREFIX};
pub use registry::Registry;
pub use types::*;
