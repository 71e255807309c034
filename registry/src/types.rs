//! Shape contract definition types.

use wardbook_core::{fold_label, EntityKind, Fields, Value};

/// Primitive type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Int,
    Bool,
    Date,
    /// A string restricted to the listed canonical spellings.
    Enum(Vec<String>),
}

impl FieldType {
    /// Build an enum type from canonical spellings.
    pub fn enumeration(allowed: &[&str]) -> Self {
        FieldType::Enum(allowed.iter().map(|s| s.to_string()).collect())
    }

    /// Human-readable type name used in shape errors.
    pub fn type_name(&self) -> String {
        match self {
            FieldType::String => "String".to_string(),
            FieldType::Int => "Int".to_string(),
            FieldType::Bool => "Bool".to_string(),
            FieldType::Date => "Date".to_string(),
            FieldType::Enum(allowed) => format!("Enum({})", allowed.join("|")),
        }
    }

    /// Whether a non-null value has this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldType::String, Value::String(_)) => true,
            (FieldType::Int, Value::Int(_)) => true,
            (FieldType::Bool, Value::Bool(_)) => true,
            (FieldType::Date, Value::Date(_)) => true,
            (FieldType::Enum(allowed), Value::String(s)) => allowed.iter().any(|a| a == s),
            _ => false,
        }
    }

    /// Canonical spelling of an enum value, matching case-insensitively and
    /// accepting spaces or hyphens for underscores.
    pub fn canonical_label(&self, raw: &str) -> Option<&str> {
        match self {
            FieldType::Enum(allowed) => {
                let folded = fold_label(raw);
                allowed
                    .iter()
                    .find(|a| fold_label(a) == folded)
                    .map(|a| a.as_str())
            }
            _ => None,
        }
    }
}

/// Field definition within a contract.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Primitive type.
    pub field_type: FieldType,
    /// Whether this field must be present.
    pub required: bool,
    /// Whether this field can be null.
    pub nullable: bool,
    /// Value filled in when the field is absent on a full write.
    pub default: Option<Value>,
    /// Minimum string length.
    pub length_min: Option<usize>,
    /// Maximum string length.
    pub length_max: Option<usize>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            nullable: false,
            default: None,
            length_min: None,
            length_max: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_length(mut self, min: usize, max: usize) -> Self {
        self.length_min = Some(min);
        self.length_max = Some(max);
        self
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.length_max = Some(max);
        self
    }

    /// Expected type as reported in shape errors, including length bounds.
    pub fn expected_type(&self) -> String {
        let base = self.field_type.type_name();
        match (self.length_min, self.length_max) {
            (Some(min), Some(max)) => format!("{}[{}..={}]", base, min, max),
            (None, Some(max)) => format!("{}[..={}]", base, max),
            (Some(min), None) => format!("{}[{}..]", base, min),
            (None, None) => base,
        }
    }

    /// Whether a string value satisfies the length bounds.
    pub fn length_ok(&self, value: &Value) -> bool {
        let Some(s) = value.as_str() else {
            return true;
        };
        let len = s.chars().count();
        self.length_min.map_or(true, |min| len >= min)
            && self.length_max.map_or(true, |max| len <= max)
    }
}

/// Where a row's key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Generated by the pipeline before validation; part of the contract.
    Business { field: String },
    /// Assigned by storage on insert; not part of the writable contract.
    Surrogate { field: String },
}

impl KeySource {
    pub fn business(field: impl Into<String>) -> Self {
        KeySource::Business {
            field: field.into(),
        }
    }

    pub fn surrogate(field: impl Into<String>) -> Self {
        KeySource::Surrogate {
            field: field.into(),
        }
    }

    /// Name of the key field.
    pub fn field(&self) -> &str {
        match self {
            KeySource::Business { field } | KeySource::Surrogate { field } => field,
        }
    }

    pub fn is_business(&self) -> bool {
        matches!(self, KeySource::Business { .. })
    }
}

/// Declared shape of one entity kind.
#[derive(Debug, Clone)]
pub struct EntityContract {
    /// Entity kind this contract describes.
    pub kind: EntityKind,
    /// Key definition.
    pub key: KeySource,
    /// Field definitions in declaration order.
    pub fields: Vec<FieldDef>,
}

impl EntityContract {
    /// Table or collection name.
    pub fn table(&self) -> &'static str {
        self.kind.table_name()
    }

    /// Get a field definition by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check if this contract declares a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Name of the key field.
    pub fn key_field(&self) -> &str {
        self.key.field()
    }

    /// Bring a raw record into canonical form.
    ///
    /// Undeclared fields are dropped, ISO strings in date fields become
    /// dates, and enum spellings are normalized. Anything that cannot be
    /// converted is left as-is for the shape check to reject.
    pub fn canonicalize(&self, raw: &Fields) -> Fields {
        raw.iter()
            .filter_map(|(name, value)| {
                let def = self.get_field(name)?;
                Some((name.clone(), canonical_value(def, value)))
            })
            .collect()
    }

    /// Fill absent fields that carry a default.
    pub fn apply_defaults(&self, record: &mut Fields) {
        for def in &self.fields {
            if let Some(default) = &def.default {
                record
                    .entry(def.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }
    }
}

/// Canonical form of a single value for its field definition.
pub fn canonical_value(def: &FieldDef, value: &Value) -> Value {
    match (&def.field_type, value) {
        (FieldType::Date, Value::String(s)) => match Value::parse_date(s) {
            Some(date) => Value::Date(date),
            None => value.clone(),
        },
        (ty @ FieldType::Enum(_), Value::String(s)) => match ty.canonical_label(s) {
            Some(canonical) => Value::String(canonical.to_string()),
            None => value.clone(),
        },
        _ => value.clone(),
    }
}
