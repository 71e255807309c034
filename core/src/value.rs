//! Value types for Wardbook fields.
//!
//! Values are the atomic data stored in entity fields. Wardbook supports the
//! scalar types the hospital tables use (String, Int, Bool, Date) plus an
//! explicit Null, which is distinct from a field being absent.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Canonical textual form of a date value.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A value that can be stored in a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Explicit null (a deliberate clear, not an absent field).
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// UTF-8 string.
    String(String),
    /// Calendar date without time zone.
    Date(NaiveDate),
}

impl Value {
    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as boolean if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer if this is an Int value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as string reference if this is a String value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as date if this is a Date value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::String(_) => "String",
            Value::Date(_) => "Date",
        }
    }

    /// Parse an ISO `YYYY-MM-DD` date.
    pub fn parse_date(raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
    }

    /// Convert to a JSON value. Dates become ISO strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::Value::String(d.format(DATE_FORMAT).to_string()),
        }
    }

    /// Convert from a JSON scalar.
    ///
    /// Strings stay strings; turning an ISO string into a `Date` is the job of
    /// the contract that knows the field is date-typed.
    pub fn from_json(field: &str, json: &serde_json::Value) -> CoreResult<Self> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .ok_or_else(|| CoreError::unsupported_json(field, "non-integer number")),
            serde_json::Value::String(s) => Ok(Value::String(s.clone())),
            serde_json::Value::Array(_) => Err(CoreError::unsupported_json(field, "array")),
            serde_json::Value::Object(_) => Err(CoreError::unsupported_json(field, "object")),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::String(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A record: field name to value. Ordered by name so snapshots are stable.
pub type Fields = BTreeMap<String, Value>;

/// Render a record as a JSON object.
pub fn fields_to_json(fields: &Fields) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = fields
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect();
    serde_json::Value::Object(map)
}

/// Build a record from a JSON object.
pub fn fields_from_json(json: &serde_json::Value) -> CoreResult<Fields> {
    let object = json.as_object().ok_or(CoreError::NotAnObject)?;
    object
        .iter()
        .map(|(name, value)| Ok((name.clone(), Value::from_json(name, value)?)))
        .collect()
}

/// Helper macro to create field maps.
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut map = $crate::Fields::new();
            $(
                map.insert($key.to_string(), $crate::Value::from($value));
            )+
            map
        }
    };
}
