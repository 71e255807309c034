//! Declarative document schemas.
//!
//! A document collection declares its shape as a JSON schema in the
//! `bsonType` dialect:
//!
//! ```json
//! {
//!   "bsonType": "object",
//!   "required": ["staff_id", "staff_name"],
//!   "properties": {
//!     "staff_id": { "bsonType": "string", "minLength": 1, "maxLength": 64 },
//!     "role": { "bsonType": ["string", "null"], "enum": ["doctor", "nurse", null] }
//!   }
//! }
//! ```
//!
//! Contracts render to this form and parse back from it, so both backends
//! check the same shape. Key handling:
//! - a surrogate key is an `objectId` property, never required
//! - otherwise the first property is the business key

use crate::{EntityContract, FieldDef, FieldType, KeySource, RegistryError, RegistryResult};
use serde_json::{json, Map, Value as Json};
use wardbook_core::{EntityKind, Value};

const OBJECT_ID: &str = "objectId";

fn bson_type_name(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::String | FieldType::Enum(_) => "string",
        FieldType::Int => "int",
        FieldType::Bool => "bool",
        FieldType::Date => "date",
    }
}

/// Render a contract as a `bsonType` document schema.
pub fn to_document_schema(contract: &EntityContract) -> Json {
    let mut properties = Map::new();

    if let KeySource::Surrogate { field } = &contract.key {
        properties.insert(field.clone(), json!({ "bsonType": OBJECT_ID }));
    }

    for def in &contract.fields {
        let mut prop = Map::new();
        let bson_type = bson_type_name(&def.field_type);
        let type_json = if def.nullable {
            json!([bson_type, "null"])
        } else {
            json!(bson_type)
        };
        prop.insert("bsonType".into(), type_json);

        if let FieldType::Enum(allowed) = &def.field_type {
            let mut values: Vec<Json> = allowed.iter().map(|a| json!(a)).collect();
            if def.nullable {
                values.push(Json::Null);
            }
            prop.insert("enum".into(), Json::Array(values));
        }
        if let Some(min) = def.length_min {
            prop.insert("minLength".into(), json!(min));
        }
        if let Some(max) = def.length_max {
            prop.insert("maxLength".into(), json!(max));
        }
        if let Some(default) = &def.default {
            prop.insert("default".into(), default.to_json());
        }
        properties.insert(def.name.clone(), Json::Object(prop));
    }

    let required: Vec<&str> = contract
        .fields
        .iter()
        .filter(|def| def.required)
        .map(|def| def.name.as_str())
        .collect();

    json!({
        "bsonType": "object",
        "required": required,
        "properties": properties,
    })
}

/// Parse a `bsonType` document schema back into a contract.
pub fn parse_document_schema(kind: EntityKind, schema: &Json) -> RegistryResult<EntityContract> {
    let collection = kind.table_name();
    let malformed = |message: String| RegistryError::malformed_schema(collection, message);

    if schema.get("bsonType").and_then(Json::as_str) != Some("object") {
        return Err(malformed("top-level bsonType must be \"object\"".into()));
    }
    let properties = schema
        .get("properties")
        .and_then(Json::as_object)
        .ok_or_else(|| malformed("missing properties".into()))?;
    let required: Vec<&str> = match schema.get("required") {
        None => Vec::new(),
        Some(list) => list
            .as_array()
            .ok_or_else(|| malformed("required must be an array".into()))?
            .iter()
            .map(|v| v.as_str().ok_or_else(|| malformed("required entries must be strings".into())))
            .collect::<RegistryResult<_>>()?,
    };

    let mut surrogate: Option<String> = None;
    let mut fields = Vec::with_capacity(properties.len());

    for (name, prop) in properties {
        let (bson_type, nullable) =
            parse_bson_type(prop).map_err(|m| malformed(format!("{}: {}", name, m)))?;
        if bson_type == OBJECT_ID {
            surrogate = Some(name.clone());
            continue;
        }

        let field_type = match bson_type.as_str() {
            "string" => match prop.get("enum").and_then(Json::as_array) {
                Some(values) => FieldType::Enum(
                    values
                        .iter()
                        .filter_map(Json::as_str)
                        .map(str::to_string)
                        .collect(),
                ),
                None => FieldType::String,
            },
            "int" => FieldType::Int,
            "bool" => FieldType::Bool,
            "date" => FieldType::Date,
            other => return Err(malformed(format!("{}: unsupported bsonType '{}'", name, other))),
        };

        let mut def = FieldDef::new(name.clone(), field_type);
        def.required = required.contains(&name.as_str());
        def.nullable = nullable;
        def.length_min = prop.get("minLength").and_then(Json::as_u64).map(|n| n as usize);
        def.length_max = prop.get("maxLength").and_then(Json::as_u64).map(|n| n as usize);
        if let Some(default) = prop.get("default") {
            let value = Value::from_json(name, default).map_err(|e| malformed(e.to_string()))?;
            def.default = Some(value);
        }
        fields.push(def);
    }

    let key = match surrogate {
        Some(field) => KeySource::surrogate(field),
        None => {
            let first = fields
                .first()
                .ok_or_else(|| malformed("no properties to take a business key from".into()))?;
            KeySource::business(first.name.clone())
        }
    };

    let contract = EntityContract { kind, key, fields };
    crate::builder::check_contract(&contract)?;
    Ok(contract)
}

fn parse_bson_type(prop: &Json) -> Result<(String, bool), String> {
    match prop.get("bsonType") {
        Some(Json::String(t)) => Ok((t.clone(), false)),
        Some(Json::Array(types)) => {
            let names: Vec<&str> = types.iter().filter_map(Json::as_str).collect();
            let nullable = names.contains(&"null");
            let concrete: Vec<&str> = names.into_iter().filter(|t| *t != "null").collect();
            match concrete.as_slice() {
                [single] => Ok((single.to_string(), nullable)),
                _ => Err("bsonType list must name exactly one non-null type".into()),
            }
        }
        _ => Err("missing bsonType".into()),
    }
}
