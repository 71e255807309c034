//! Mutation error types.

use thiserror::Error;
use wardbook_registry::RegistryError;
use wardbook_store::StoreError;

/// Result type for pipeline operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Server-side failures of a pipeline run.
///
/// Client faults (shape, rule, missing row, empty patch) are outcomes, not
/// errors; see [`crate::MutationOutcome`].
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error("contract unavailable: {0}")]
    Contract(#[from] RegistryError),

    #[error("pipeline poisoned: {message}")]
    Poisoned { message: String },

    #[error("invalid configuration for {var}: {reason}")]
    Config { var: String, reason: String },
}

impl MutationError {
    pub fn poisoned(message: impl Into<String>) -> Self {
        Self::Poisoned {
            message: message.into(),
        }
    }

    pub fn config(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Whether the underlying engine refused a write on a unique constraint.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, MutationError::Storage(err) if err.is_unique_violation())
    }
}
