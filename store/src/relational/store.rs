//! SQLite-backed relational store.

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use wardbook_core::{EntityKind, Fields, RecordId, RowKey};
use wardbook_journal::{AuditRecord, Operation, RejectionRecord};
use wardbook_registry::{hospital_registry, EntityContract, Registry};

use super::codec::{decode_row, decode_timestamp};
use super::schema::{quote_ident, AUDIT_TABLE, REJECTION_TABLE, SCHEMA};
use super::unit::{column_list, fetch_row, list_rows, UnitOfWork};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Relational store. Cheap to clone; every unit of work and every read opens
/// its own connection, so clones can be used from many threads at once.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    config: StoreConfig,
    registry: Arc<Registry>,
}

impl SqliteStore {
    /// Open (creating if needed) the database and apply the schema.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let store = Self {
            config,
            registry: Arc::new(hospital_registry()?),
        };
        let conn = store.connect()?;
        conn.execute_batch(SCHEMA)?;
        info!(path = %store.config.path.display(), "relational store opened");
        Ok(store)
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Contracts describing the business tables.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn contract(&self, kind: EntityKind) -> StoreResult<&EntityContract> {
        self.registry
            .get(kind)
            .ok_or_else(|| StoreError::UnknownCollection(kind.table_name().to_string()))
    }

    fn connect(&self) -> StoreResult<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.config.path, flags)?;
        conn.busy_timeout(Duration::from_millis(self.config.busy_timeout_ms))?;
        if self.config.foreign_keys {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        }
        Ok(conn)
    }

    /// Begin a unit of work on a new connection.
    pub fn unit_of_work(&self) -> StoreResult<UnitOfWork> {
        UnitOfWork::begin(self.connect()?)
    }

    // ========== Reads ==========

    /// Fetch one row by key.
    pub fn get(&self, kind: EntityKind, key: &RowKey) -> StoreResult<Option<Fields>> {
        let contract = self.contract(kind)?;
        fetch_row(&self.connect()?, contract, key)
    }

    /// Every row of a table, ordered by key.
    pub fn list(&self, kind: EntityKind) -> StoreResult<Vec<Fields>> {
        let contract = self.contract(kind)?;
        list_rows(&self.connect()?, contract)
    }

    /// Number of schedule rows for a service and shift that are on shift.
    pub fn staff_on_shift(&self, service: &str, shift: &str) -> StoreResult<i64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM staff_schedule \
             WHERE service = ?1 AND day_or_shift = ?2 AND on_shift = 1",
            params![service, shift],
            |row| row.get(0),
        )?;
        debug!(service, shift, count, "staff availability checked");
        Ok(count)
    }

    /// The metric row for one service and week, if recorded.
    pub fn service_metrics(
        &self,
        service: &str,
        week: i64,
        month: i64,
    ) -> StoreResult<Option<Fields>> {
        let contract = self.contract(EntityKind::ServiceWeekly)?;
        let conn = self.connect()?;
        let sql = format!(
            "SELECT {} FROM {} WHERE service = ?1 AND week = ?2 AND month = ?3",
            column_list(contract),
            quote_ident(contract.table())
        );
        let mut stmt = conn.prepare(&sql)?;
        let row = stmt
            .query_row(params![service, week, month], |row| {
                Ok(decode_row(contract, row))
            })
            .optional()?;
        row.transpose()
    }

    // ========== Logs ==========

    /// Every audit record, in append order.
    pub fn audit_log(&self) -> StoreResult<Vec<AuditRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, table_name, row_pk, operation, \
             old_values, new_values, changed_at, changed_by \
             FROM {} ORDER BY id",
            AUDIT_TABLE
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, table, row_pk, operation, old_values, new_values, changed_at, changed_by) =
                row?;
            let operation: Operation = operation.parse()?;
            records.push(AuditRecord {
                id: RecordId::new(id as u64),
                table,
                row_key: RowKey::new(row_pk),
                operation,
                old_values,
                new_values,
                changed_at: decode_timestamp(AUDIT_TABLE, &changed_at)?,
                changed_by,
            });
        }
        Ok(records)
    }

    /// Every rejection record, in append order.
    pub fn rejections(&self) -> StoreResult<Vec<RejectionRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, table_name, row_pk, error_message, payload, created_at FROM {} ORDER BY id",
            REJECTION_TABLE
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, table, row_pk, error_message, payload, created_at) = row?;
            records.push(RejectionRecord {
                id: RecordId::new(id as u64),
                table,
                row_key: row_pk.map(RowKey::new),
                error_message,
                payload,
                created_at: decode_timestamp(REJECTION_TABLE, &created_at)?,
            });
        }
        Ok(records)
    }
}
