//! Journal error types.

use thiserror::Error;

/// Journal errors.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Invalid entry format.
    #[error("invalid entry format: {message}")]
    InvalidFormat { message: String },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JournalError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}

/// Result type for journal operations.
pub type JournalResult<T> = Result<T, JournalError>;
