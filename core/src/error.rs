//! Common error types for Wardbook.

use thiserror::Error;

/// Errors raised while building core values from external input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A label did not match any known spelling.
    #[error("unknown {label} '{value}'")]
    UnknownLabel { label: &'static str, value: String },

    /// A table name did not map to an entity kind.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// A JSON value has no scalar representation.
    #[error("field '{field}': unsupported JSON {kind}")]
    UnsupportedJson { field: String, kind: &'static str },

    /// A record was expected to be a JSON object.
    #[error("record must be a JSON object")]
    NotAnObject,
}

impl CoreError {
    pub fn unknown_label(label: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownLabel {
            label,
            value: value.into(),
        }
    }

    pub fn unsupported_json(field: impl Into<String>, kind: &'static str) -> Self {
        Self::UnsupportedJson {
            field: field.into(),
            kind,
        }
    }
}

/// Result type for core conversions.
pub type CoreResult<T> = Result<T, CoreError>;
