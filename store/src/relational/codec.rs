//! Conversion between field values and SQLite values.

use chrono::{DateTime, Utc};
use rusqlite::types::{Value as SqlValue, ValueRef};
use wardbook_core::{Fields, Value};
use wardbook_registry::{EntityContract, FieldType, KeySource};

use crate::error::{StoreError, StoreResult};

/// Encode a field value for binding.
pub fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Date(_) => SqlValue::Text(value.to_string()),
    }
}

/// Decode a stored column using the declared field type.
pub fn from_sql(
    table: &str,
    field_type: Option<&FieldType>,
    raw: ValueRef<'_>,
) -> StoreResult<Value> {
    let value = match raw {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => match field_type {
            Some(FieldType::Bool) => Value::Bool(i != 0),
            _ => Value::Int(i),
        },
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| StoreError::invalid_row(table, e.to_string()))?;
            match field_type {
                Some(FieldType::Date) => Value::parse_date(text)
                    .map(Value::Date)
                    .ok_or_else(|| StoreError::invalid_row(table, format!("bad date '{}'", text)))?,
                _ => Value::String(text.to_string()),
            }
        }
        ValueRef::Real(_) | ValueRef::Blob(_) => {
            return Err(StoreError::invalid_row(table, "unexpected REAL or BLOB column"));
        }
    };
    Ok(value)
}

/// Bind a row key: surrogate keys are integers, business keys text.
pub fn key_to_sql(contract: &EntityContract, key: &wardbook_core::RowKey) -> Option<SqlValue> {
    match contract.key {
        KeySource::Surrogate { .. } => key.as_surrogate().map(SqlValue::Integer),
        KeySource::Business { .. } => Some(SqlValue::Text(key.as_str().to_string())),
    }
}

/// Columns a row is read with: the surrogate key (if any) then every
/// declared field.
pub fn select_columns(contract: &EntityContract) -> Vec<&str> {
    let mut columns = Vec::with_capacity(contract.fields.len() + 1);
    if let KeySource::Surrogate { field } = &contract.key {
        columns.push(field.as_str());
    }
    columns.extend(contract.field_names());
    columns
}

/// Decode a row selected with [`select_columns`].
pub fn decode_row(contract: &EntityContract, row: &rusqlite::Row<'_>) -> StoreResult<Fields> {
    let mut fields = Fields::new();
    for (index, column) in select_columns(contract).into_iter().enumerate() {
        let field_type = contract.get_field(column).map(|def| &def.field_type);
        let raw = row.get_ref(index)?;
        fields.insert(column.to_string(), from_sql(contract.table(), field_type, raw)?);
    }
    Ok(fields)
}

/// Format a log timestamp.
pub fn encode_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339()
}

/// Parse a log timestamp.
pub fn decode_timestamp(table: &str, raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| StoreError::invalid_row(table, format!("bad timestamp '{}': {}", raw, e)))
}
