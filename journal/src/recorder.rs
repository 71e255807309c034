//! Audit Recorder and Error Sink contracts.

use wardbook_core::{Fields, RecordId, RowKey};

use crate::entry::{AuditEntry, Operation, RejectionEntry};
use crate::error::JournalError;

/// Appends audit records.
///
/// Implementations must append inside the unit of work that carries the
/// mutation being described, so both commit or neither does. Append
/// failures keep the backend's own error type.
pub trait AuditRecorder {
    type Error: From<JournalError>;

    /// Append a prepared entry and return its id.
    fn append_audit(&mut self, entry: AuditEntry) -> Result<RecordId, Self::Error>;

    /// Record one change. `before` is `None` for inserts.
    fn record(
        &mut self,
        table: &str,
        row_key: &RowKey,
        operation: Operation,
        before: Option<&Fields>,
        after: Option<&Fields>,
        actor: &str,
    ) -> Result<RecordId, Self::Error> {
        let entry = AuditEntry::new(table, row_key.clone(), operation, before, after, actor)?;
        self.append_audit(entry)
    }
}

/// Appends rejection records, separate from the audit log.
pub trait ErrorSink {
    type Error: From<JournalError>;

    /// Append a prepared entry and return its id.
    fn append_rejection(&mut self, entry: RejectionEntry) -> Result<RecordId, Self::Error>;

    /// Record one rejected payload.
    fn reject(
        &mut self,
        table: &str,
        row_key: Option<&RowKey>,
        message: &str,
        attempted: &Fields,
    ) -> Result<RecordId, Self::Error> {
        let entry = RejectionEntry::new(table, row_key.cloned(), message, attempted)?;
        self.append_rejection(entry)
    }
}
