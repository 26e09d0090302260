//! Input/output validation and JSON schema builders.

use annadata_core::error::AnnadataError;
use serde_json::{json, Map, Value};

/// Structural validation of an advisory record.
pub trait Validate {
    fn validate(&self) -> Result<(), AnnadataError>;
}

/// Reject blank required text.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), AnnadataError> {
    if value.trim().is_empty() {
        return Err(AnnadataError::Validation(format!(
            "{field} is required and must not be blank"
        )));
    }
    Ok(())
}

pub(crate) fn string_schema(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

pub(crate) fn array_schema(items: Value, description: &str) -> Value {
    json!({"type": "array", "items": items, "description": description})
}

/// An object schema where every listed property is required.
pub(crate) fn object_schema(properties: Vec<(&str, Value)>) -> Value {
    let required: Vec<Value> = properties
        .iter()
        .map(|(name, _)| Value::String((*name).to_string()))
        .collect();
    let props: Map<String, Value> = properties
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();
    json!({
        "type": "object",
        "properties": props,
        "required": required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert!(require_text("region", "Punjab").is_ok());
        let err = require_text("region", "  \n").unwrap_err();
        assert!(matches!(err, AnnadataError::Validation(_)));
        assert!(err.to_string().contains("region"));
    }

    #[test]
    fn test_object_schema_marks_all_required() {
        let schema = object_schema(vec![
            ("title", string_schema("Title")),
            ("summary", string_schema("Summary")),
        ]);
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["title", "summary"]));
        assert_eq!(schema["properties"]["title"]["type"], "string");
    }
}
