//! Wardbook Journal
//!
//! Append-only change and rejection logs.
//!
//! Responsibilities:
//! - Describe audit records (operation, row key, before/after snapshots, actor)
//! - Describe rejection records (attempted key, message, attempted payload)
//! - Serialize record snapshots to the JSON text both logs store
//! - Define the Audit Recorder and Error Sink contracts a backend implements
//!
//! Records are written once and never updated or deleted.

mod entry;
mod error;
mod recorder;
mod snapshot;

pub use entry::{AuditEntry, AuditRecord, Operation, RejectionEntry, RejectionRecord, DEFAULT_ACTOR};
pub use error::{JournalError, JournalResult};
pub use recorder::{AuditRecorder, ErrorSink};
pub use snapshot::{parse_snapshot, snapshot};
