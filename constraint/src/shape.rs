//! Shape validation against a declared contract.

use wardbook_core::{Fields, Value};
use wardbook_registry::EntityContract;

use crate::ShapeError;

/// Validate a candidate record against its contract.
///
/// Fields are checked in declaration order and the first mismatch is
/// returned, so the same input always yields the same error. Undeclared
/// fields are not examined; canonicalization drops them beforehand.
pub fn validate_shape(contract: &EntityContract, candidate: &Fields) -> Result<(), ShapeError> {
    for def in &contract.fields {
        match candidate.get(&def.name) {
            None if def.required => {
                return Err(ShapeError::missing(&def.name, def.expected_type()));
            }
            None => {}
            Some(Value::Null) if !def.nullable => {
                return Err(ShapeError::new(&def.name, def.expected_type(), "Null"));
            }
            Some(Value::Null) => {}
            Some(value) => {
                if !def.field_type.accepts(value) {
                    let found = match value {
                        Value::String(s) => format!("String '{}'", s),
                        other => other.type_name().to_string(),
                    };
                    return Err(ShapeError::new(&def.name, def.expected_type(), found));
                }
                if !def.length_ok(value) {
                    let len = value.as_str().map(|s| s.chars().count()).unwrap_or_default();
                    return Err(ShapeError::new(
                        &def.name,
                        def.expected_type(),
                        format!("String of length {}", len),
                    ));
                }
            }
        }
    }
    Ok(())
}
