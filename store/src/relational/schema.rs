//! Relational layout: four business tables and two append-only logs.

/// Table holding audit records.
pub const AUDIT_TABLE: &str = "audit_log";
/// Table holding rejection records.
pub const REJECTION_TABLE: &str = "validation_errors";

/// DDL applied when a store is opened. Idempotent.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS patients (
    patient_id     TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    age            INTEGER,
    arrival_date   TEXT,
    departure_date TEXT,
    service        TEXT,
    satisfaction   INTEGER
);

CREATE TABLE IF NOT EXISTS staff (
    staff_id   TEXT PRIMARY KEY,
    staff_name TEXT NOT NULL,
    role       TEXT,
    service    TEXT
);

CREATE TABLE IF NOT EXISTS staff_schedule (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    day_or_shift TEXT NOT NULL,
    staff_id     TEXT REFERENCES staff(staff_id) ON DELETE SET NULL ON UPDATE CASCADE,
    staff_name   TEXT,
    role         TEXT,
    service      TEXT,
    on_shift     INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_staff_schedule_service_shift
    ON staff_schedule (service, day_or_shift);

CREATE TABLE IF NOT EXISTS services_weekly (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    week                 INTEGER NOT NULL,
    month                INTEGER NOT NULL,
    service              TEXT NOT NULL,
    available_beds       INTEGER,
    patients_request     INTEGER,
    patients_admitted    INTEGER,
    patients_refused     INTEGER,
    patient_satisfaction INTEGER,
    staff_morale         INTEGER,
    event                TEXT,
    UNIQUE (week, month, service)
);

CREATE TABLE IF NOT EXISTS audit_log (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    table_name TEXT NOT NULL,
    row_pk     TEXT NOT NULL,
    operation  TEXT NOT NULL CHECK (operation IN ('INSERT', 'UPDATE', 'DELETE')),
    old_values TEXT,
    new_values TEXT,
    changed_at TEXT NOT NULL,
    changed_by TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS validation_errors (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    table_name    TEXT NOT NULL,
    row_pk        TEXT,
    error_message TEXT NOT NULL,
    payload       TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TRIGGER IF NOT EXISTS audit_log_no_update BEFORE UPDATE ON audit_log
BEGIN SELECT RAISE(ABORT, 'audit_log is append-only'); END;
CREATE TRIGGER IF NOT EXISTS audit_log_no_delete BEFORE DELETE ON audit_log
BEGIN SELECT RAISE(ABORT, 'audit_log is append-only'); END;
CREATE TRIGGER IF NOT EXISTS validation_errors_no_update BEFORE UPDATE ON validation_errors
BEGIN SELECT RAISE(ABORT, 'validation_errors is append-only'); END;
CREATE TRIGGER IF NOT EXISTS validation_errors_no_delete BEFORE DELETE ON validation_errors
BEGIN SELECT RAISE(ABORT, 'validation_errors is append-only'); END;
";

/// Quote an identifier for SQLite.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
