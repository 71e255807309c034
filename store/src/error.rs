//! Store error types.

use rusqlite::ErrorCode;
use thiserror::Error;
use wardbook_journal::JournalError;
use wardbook_registry::RegistryError;

/// Errors raised by either backend. All of them are server faults.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite engine error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A primary key or unique constraint rejected the write.
    #[error("unique constraint violated on {table}: {message}")]
    UniqueViolation { table: String, message: String },

    /// A foreign key constraint rejected the write.
    #[error("foreign key constraint violated on {table}: {message}")]
    ForeignKeyViolation { table: String, message: String },

    /// An audit or rejection entry could not be built or read back.
    #[error("journal error: {0}")]
    Journal(#[from] JournalError),

    /// A column not declared by the table's contract.
    #[error("unknown column '{column}' on {table}")]
    UnknownColumn { table: String, column: String },

    /// A stored row could not be decoded.
    #[error("invalid stored row in {table}: {message}")]
    InvalidRow { table: String, message: String },

    /// A collection schema could not be turned into a contract.
    #[error("schema error: {0}")]
    Schema(#[from] RegistryError),

    /// No collection or table with this name.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// The unit of work was already committed or rolled back.
    #[error("unit of work is {0}")]
    Finished(&'static str),

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,

    /// Invalid configuration value.
    #[error("invalid config {var}: {reason}")]
    Config { var: String, reason: String },
}

impl StoreError {
    pub fn unique_violation(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UniqueViolation {
            table: table.into(),
            message: message.into(),
        }
    }

    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn invalid_row(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRow {
            table: table.into(),
            message: message.into(),
        }
    }

    pub fn config(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Classify a SQLite error raised while writing to `table`.
    pub fn from_write(table: &str, err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &err {
            if failure.code == ErrorCode::ConstraintViolation {
                let message = message.clone().unwrap_or_else(|| failure.to_string());
                match failure.extended_code {
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        return Self::unique_violation(table, message);
                    }
                    rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                        return Self::ForeignKeyViolation {
                            table: table.to_string(),
                            message,
                        };
                    }
                    _ => {}
                }
            }
        }
        Self::Sqlite(err)
    }

    /// Whether this is a uniqueness failure.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
