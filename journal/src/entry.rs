//! Log entry types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use wardbook_core::{Fields, RecordId, RowKey};

use crate::error::{JournalError, JournalResult};
use crate::snapshot::{parse_snapshot, snapshot};

/// Actor recorded when a request names none.
pub const DEFAULT_ACTOR: &str = "api_user";

/// Kind of change an audit record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "INSERT",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INSERT" => Ok(Operation::Insert),
            "UPDATE" => Ok(Operation::Update),
            "DELETE" => Ok(Operation::Delete),
            other => Err(JournalError::invalid_format(format!("unknown operation '{}'", other))),
        }
    }
}

/// An audit record about to be appended. Snapshots are already serialized.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub table: String,
    pub row_key: RowKey,
    pub operation: Operation,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub changed_at: DateTime<Utc>,
    pub changed_by: String,
}

impl AuditEntry {
    /// Build an entry, serializing the before/after snapshots.
    pub fn new(
        table: impl Into<String>,
        row_key: RowKey,
        operation: Operation,
        before: Option<&Fields>,
        after: Option<&Fields>,
        actor: impl Into<String>,
    ) -> JournalResult<Self> {
        Ok(Self {
            table: table.into(),
            row_key,
            operation,
            old_values: before.map(snapshot).transpose()?,
            new_values: after.map(snapshot).transpose()?,
            changed_at: Utc::now(),
            changed_by: actor.into(),
        })
    }
}

/// A stored audit record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    pub id: RecordId,
    pub table: String,
    pub row_key: RowKey,
    pub operation: Operation,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub changed_at: DateTime<Utc>,
    pub changed_by: String,
}

impl AuditRecord {
    /// Attach the id assigned on append.
    pub fn from_entry(id: RecordId, entry: AuditEntry) -> Self {
        Self {
            id,
            table: entry.table,
            row_key: entry.row_key,
            operation: entry.operation,
            old_values: entry.old_values,
            new_values: entry.new_values,
            changed_at: entry.changed_at,
            changed_by: entry.changed_by,
        }
    }

    /// Parsed before-state.
    pub fn before(&self) -> JournalResult<Option<Fields>> {
        self.old_values.as_deref().map(parse_snapshot).transpose()
    }

    /// Parsed after-state.
    pub fn after(&self) -> JournalResult<Option<Fields>> {
        self.new_values.as_deref().map(parse_snapshot).transpose()
    }
}

/// A rejection about to be appended.
#[derive(Debug, Clone)]
pub struct RejectionEntry {
    pub table: String,
    pub row_key: Option<RowKey>,
    pub error_message: String,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

impl RejectionEntry {
    pub fn new(
        table: impl Into<String>,
        row_key: Option<RowKey>,
        message: impl Into<String>,
        attempted: &Fields,
    ) -> JournalResult<Self> {
        Ok(Self {
            table: table.into(),
            row_key,
            error_message: message.into(),
            payload: snapshot(attempted)?,
            created_at: Utc::now(),
        })
    }
}

/// A stored rejection record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectionRecord {
    pub id: RecordId,
    pub table: String,
    pub row_key: Option<RowKey>,
    pub error_message: String,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

impl RejectionRecord {
    pub fn from_entry(id: RecordId, entry: RejectionEntry) -> Self {
        Self {
            id,
            table: entry.table,
            row_key: entry.row_key,
            error_message: entry.error_message,
            payload: entry.payload,
            created_at: entry.created_at,
        }
    }

    /// Parsed attempted payload.
    pub fn attempted(&self) -> JournalResult<Fields> {
        parse_snapshot(&self.payload)
    }
}
