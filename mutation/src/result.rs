//! Pipeline outcomes.

use wardbook_constraint::ShapeError;
use wardbook_core::{RecordId, RowKey};

/// Why a write was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The candidate does not match its contract. Never logged to the sink.
    Shape(ShapeError),
    /// The candidate breaks business rules. `rejection_ref` points at the
    /// rejection record when the backend keeps one.
    Rule {
        message: String,
        rejection_ref: Option<RecordId>,
    },
    /// A replace, patch or delete arrived without a key.
    MissingKey,
}

impl Rejection {
    /// Message surfaced to the caller.
    pub fn message(&self) -> String {
        match self {
            Rejection::Shape(err) => err.to_string(),
            Rejection::Rule { message, .. } => message.clone(),
            Rejection::MissingKey => "a row key is required".to_string(),
        }
    }
}

/// Terminal result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The write is stored. `audit_ref` is set when an audit record was
    /// written with it.
    Applied {
        key: RowKey,
        audit_ref: Option<RecordId>,
    },
    /// Validation failed; nothing was written to the business tables.
    Rejected(Rejection),
    /// No row has the requested key.
    NotFound,
    /// The patch named no updatable field.
    EmptyPatch,
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, MutationOutcome::Rejected(_))
    }

    /// Key of the stored row.
    pub fn key(&self) -> Option<&RowKey> {
        match self {
            MutationOutcome::Applied { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Id of the audit record written with the change.
    pub fn audit_ref(&self) -> Option<RecordId> {
        match self {
            MutationOutcome::Applied { audit_ref, .. } => *audit_ref,
            _ => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            MutationOutcome::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            MutationOutcome::Applied { .. } => "applied",
            MutationOutcome::Rejected(Rejection::Shape(_)) => "rejected_shape",
            MutationOutcome::Rejected(Rejection::Rule { .. }) => "rejected_rule",
            MutationOutcome::Rejected(Rejection::MissingKey) => "rejected_missing_key",
            MutationOutcome::NotFound => "not_found",
            MutationOutcome::EmptyPatch => "empty_patch",
        }
    }
}
