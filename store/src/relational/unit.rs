//! Unit of work: one connection, one transaction.
//!
//! A unit of work owns its connection for its whole life. It begins an
//! immediate transaction on creation and ends in exactly one of commit or
//! rollback; dropping an active unit rolls it back. The business write and
//! its audit record go through the same unit, so they commit together.

use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tracing::{debug, warn};
use wardbook_core::{Fields, RecordId, RowKey, Value};
use wardbook_journal::{AuditEntry, AuditRecorder, ErrorSink, RejectionEntry};
use wardbook_registry::{EntityContract, KeySource};

use super::codec::{decode_row, encode_timestamp, key_to_sql, select_columns, to_sql};
use super::schema::{quote_ident, AUDIT_TABLE, REJECTION_TABLE};
use crate::error::{StoreError, StoreResult};

/// Unit of work state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    /// Transaction is open.
    Active,
    /// Transaction was committed.
    Committed,
    /// Transaction was rolled back.
    RolledBack,
}

impl UnitState {
    fn as_str(&self) -> &'static str {
        match self {
            UnitState::Active => "active",
            UnitState::Committed => "committed",
            UnitState::RolledBack => "rolled back",
        }
    }
}

/// An open transaction on a dedicated connection.
pub struct UnitOfWork {
    conn: Connection,
    state: UnitState,
}

impl UnitOfWork {
    /// Begin a unit of work on a freshly opened connection.
    pub(crate) fn begin(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("BEGIN IMMEDIATE")?;
        debug!("unit of work begun");
        Ok(Self {
            conn,
            state: UnitState::Active,
        })
    }

    /// Current state.
    pub fn state(&self) -> UnitState {
        self.state
    }

    fn ensure_active(&self) -> StoreResult<()> {
        match self.state {
            UnitState::Active => Ok(()),
            other => Err(StoreError::Finished(other.as_str())),
        }
    }

    /// Commit the transaction.
    pub fn commit(mut self) -> StoreResult<()> {
        self.ensure_active()?;
        self.conn.execute_batch("COMMIT")?;
        self.state = UnitState::Committed;
        debug!("unit of work committed");
        Ok(())
    }

    /// Roll the transaction back.
    pub fn rollback(mut self) -> StoreResult<()> {
        self.ensure_active()?;
        self.do_rollback()
    }

    fn do_rollback(&mut self) -> StoreResult<()> {
        self.conn.execute_batch("ROLLBACK")?;
        self.state = UnitState::RolledBack;
        debug!("unit of work rolled back");
        Ok(())
    }

    // ========== Business rows ==========

    /// Fetch one row by key.
    pub fn fetch(&self, contract: &EntityContract, key: &RowKey) -> StoreResult<Option<Fields>> {
        self.ensure_active()?;
        fetch_row(&self.conn, contract, key)
    }

    /// Insert a row and return its key.
    ///
    /// Only declared fields present in `record` are written, so absent
    /// columns take their table defaults. Surrogate keys are read back from
    /// the engine.
    pub fn insert(&self, contract: &EntityContract, record: &Fields) -> StoreResult<RowKey> {
        self.ensure_active()?;
        let table = contract.table();

        let columns: Vec<&str> = contract
            .field_names()
            .filter(|name| record.contains_key(*name))
            .collect();
        let values: Vec<SqlValue> = columns
            .iter()
            .filter_map(|name| record.get(*name))
            .map(to_sql)
            .collect();

        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quote_ident(table))
        } else {
            let placeholders: Vec<String> =
                (1..=columns.len()).map(|i| format!("?{}", i)).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(table),
                columns.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", "),
                placeholders.join(", ")
            )
        };

        self.conn
            .execute(&sql, params_from_iter(values))
            .map_err(|e| StoreError::from_write(table, e))?;

        let key = match &contract.key {
            KeySource::Surrogate { .. } => RowKey::from(self.conn.last_insert_rowid()),
            KeySource::Business { field } => match record.get(field) {
                Some(Value::String(key)) => RowKey::new(key.clone()),
                _ => {
                    let message = format!("missing business key '{}'", field);
                    return Err(StoreError::invalid_row(table, message));
                }
            },
        };
        debug!(table, key = %key, "row inserted");
        Ok(key)
    }

    /// Apply an ordered list of assignments to one row. Returns whether a row
    /// was changed. Column names must be declared by the contract; values are
    /// always bound as parameters.
    pub fn update(
        &self,
        contract: &EntityContract,
        key: &RowKey,
        assignments: &[(String, Value)],
    ) -> StoreResult<bool> {
        self.ensure_active()?;
        let table = contract.table();
        if assignments.is_empty() {
            return Ok(false);
        }
        for (column, _) in assignments {
            if !contract.has_field(column) {
                return Err(StoreError::unknown_column(table, column.clone()));
            }
        }
        let Some(key_value) = key_to_sql(contract, key) else {
            return Ok(false);
        };

        let set_clause: Vec<String> = assignments
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ?{}", quote_ident(column), i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            quote_ident(table),
            set_clause.join(", "),
            quote_ident(contract.key_field()),
            assignments.len() + 1
        );

        let mut values: Vec<SqlValue> = assignments.iter().map(|(_, v)| to_sql(v)).collect();
        values.push(key_value);

        let changed = self
            .conn
            .execute(&sql, params_from_iter(values))
            .map_err(|e| StoreError::from_write(table, e))?;
        debug!(table, key = %key, columns = assignments.len(), "row updated");
        Ok(changed > 0)
    }

    /// Delete one row. Returns whether it existed.
    pub fn delete(&self, contract: &EntityContract, key: &RowKey) -> StoreResult<bool> {
        self.ensure_active()?;
        let table = contract.table();
        let Some(key_value) = key_to_sql(contract, key) else {
            return Ok(false);
        };
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            quote_ident(table),
            quote_ident(contract.key_field())
        );
        let removed = self
            .conn
            .execute(&sql, params![key_value])
            .map_err(|e| StoreError::from_write(table, e))?;
        debug!(table, key = %key, removed, "row deleted");
        Ok(removed > 0)
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if self.state == UnitState::Active {
            if let Err(err) = self.do_rollback() {
                warn!(error = %err, "rollback of abandoned unit of work failed");
            }
        }
    }
}

impl AuditRecorder for UnitOfWork {
    type Error = StoreError;

    fn append_audit(&mut self, entry: AuditEntry) -> StoreResult<RecordId> {
        self.ensure_active()?;
        let sql = format!(
            "INSERT INTO {} \
             (table_name, row_pk, operation, old_values, new_values, changed_at, changed_by) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            AUDIT_TABLE
        );
        self.conn
            .execute(
                &sql,
                params![
                    entry.table,
                    entry.row_key.as_str(),
                    entry.operation.as_str(),
                    entry.old_values,
                    entry.new_values,
                    encode_timestamp(&entry.changed_at),
                    entry.changed_by,
                ],
            )
            .map_err(|e| StoreError::from_write(AUDIT_TABLE, e))?;
        Ok(RecordId::new(self.conn.last_insert_rowid() as u64))
    }
}

impl ErrorSink for UnitOfWork {
    type Error = StoreError;

    fn append_rejection(&mut self, entry: RejectionEntry) -> StoreResult<RecordId> {
        self.ensure_active()?;
        let sql = format!(
            "INSERT INTO {} (table_name, row_pk, error_message, payload, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            REJECTION_TABLE
        );
        self.conn
            .execute(
                &sql,
                params![
                    entry.table,
                    entry.row_key.as_ref().map(|k| k.as_str()),
                    entry.error_message,
                    entry.payload,
                    encode_timestamp(&entry.created_at),
                ],
            )
            .map_err(|e| StoreError::from_write(REJECTION_TABLE, e))?;
        Ok(RecordId::new(self.conn.last_insert_rowid() as u64))
    }
}

/// Fetch one row by key on any connection.
pub(crate) fn fetch_row(
    conn: &Connection,
    contract: &EntityContract,
    key: &RowKey,
) -> StoreResult<Option<Fields>> {
    let Some(key_value) = key_to_sql(contract, key) else {
        return Ok(None);
    };
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?1",
        column_list(contract),
        quote_ident(contract.table()),
        quote_ident(contract.key_field())
    );
    let mut stmt = conn.prepare(&sql)?;
    let row = stmt
        .query_row(params![key_value], |row| Ok(decode_row(contract, row)))
        .optional()?;
    row.transpose()
}

/// Every row of a table, ordered by key.
pub(crate) fn list_rows(conn: &Connection, contract: &EntityContract) -> StoreResult<Vec<Fields>> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        column_list(contract),
        quote_ident(contract.table()),
        quote_ident(contract.key_field())
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(decode_row(contract, row)))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row??);
    }
    Ok(out)
}

pub(crate) fn column_list(contract: &EntityContract) -> String {
    select_columns(contract)
        .into_iter()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(", ")
}
