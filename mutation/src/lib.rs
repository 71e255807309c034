//! Wardbook Mutation
//!
//! Run validated write requests against a storage backend.
//!
//! Responsibilities:
//! - Assign business keys to new patients and staff
//! - Compile partial updates into ordered assignments over the stored row
//! - Drive each request through shape and rule checks to a terminal outcome
//! - Write business rows with their audit records in one unit of work, and
//!   record rule rejections separately
//!
//! ## Module Structure
//!
//! - `pipeline/` - the relational and document pipelines
//! - `patch` - Partial Update Compiler
//! - `state` - per-request state machine
//! - `key` - business-key schemes
//! - `request`, `result` - requests and outcomes

mod config;
mod error;
mod key;
mod patch;
mod pipeline;
mod request;
mod result;
mod state;

pub use config::PipelineConfig;
pub use error::{MutationError, MutationResult};
pub use key::KeyScheme;
pub use patch::{compile_patch, merge, CompiledPatch, EmptyPatchError};
pub use pipeline::{DocumentPipeline, MutationPipeline, RelationalPipeline};
pub use request::{MutationRequest, WriteKind};
pub use result::{MutationOutcome, Rejection};
pub use state::{PipelineState, Progress};
