//! Identity types for Wardbook rows and log records.
//!
//! - `RowKey` is the caller-visible key of a business row: a generated
//!   business key (`PAT-...`, `STF-...`) or the stringified surrogate id.
//! - `RecordId` identifies an appended audit or rejection record.

use serde::Serialize;
use std::fmt;

/// Key of a business row as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RowKey(pub String);

impl RowKey {
    /// Create a new RowKey.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the key as a surrogate numeric id.
    pub fn as_surrogate(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RowKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for RowKey {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of an audit or rejection record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Create a new RecordId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}
