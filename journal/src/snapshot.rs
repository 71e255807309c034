//! Snapshot serialization for log records.

use wardbook_core::{fields_from_json, fields_to_json, Fields};

use crate::error::{JournalError, JournalResult};

/// Serialize a record to the JSON text stored in the logs.
pub fn snapshot(fields: &Fields) -> JournalResult<String> {
    Ok(serde_json::to_string(&fields_to_json(fields))?)
}

/// Parse a stored snapshot back into a record. Dates come back as ISO strings.
pub fn parse_snapshot(text: &str) -> JournalResult<Fields> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    fields_from_json(&json).map_err(|e| JournalError::invalid_format(e.to_string()))
}
