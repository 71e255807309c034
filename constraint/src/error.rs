//! Validation error types.

use crate::Violations;
use thiserror::Error;

/// A record does not match its shape contract.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("field '{field}': expected {expected_type}, found {found}")]
pub struct ShapeError {
    /// First offending field in declaration order.
    pub field: String,
    /// Type the contract declares, e.g. `Int` or `String[1..=255]`.
    pub expected_type: String,
    /// What was supplied: a type name, `Null` or `missing`.
    pub found: String,
}

impl ShapeError {
    pub fn new(
        field: impl Into<String>,
        expected_type: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected_type: expected_type.into(),
            found: found.into(),
        }
    }

    pub fn missing(field: impl Into<String>, expected_type: impl Into<String>) -> Self {
        Self::new(field, expected_type, "missing")
    }
}

/// A well-formed record breaks one or more business rules.
#[derive(Debug, Clone, Error)]
#[error("{}", .violations.joined())]
pub struct RuleError {
    pub violations: Violations,
}

impl RuleError {
    /// All violation messages joined with `;`.
    pub fn message(&self) -> String {
        self.violations.joined()
    }
}
