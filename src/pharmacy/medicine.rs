use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::pharmacy::error::QueryError;

/// JSON schema types used by the lookup schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    StringList,
}

impl FieldKind {
    fn type_name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::StringList => "array",
        }
    }
}

/// Letter case of schema type names; Gemini documents upper case, JSON
/// Schema proper uses lower case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDialect {
    Gemini,
    JsonSchema,
}

/// Required keys of a lookup result, in schema order.
pub const RECORD_FIELDS: &[(&str, FieldKind)] = &[
    ("name", FieldKind::String),
    ("purpose", FieldKind::String),
    ("action", FieldKind::String),
    ("dosage", FieldKind::String),
    ("composition", FieldKind::StringList),
    ("sideEffects", FieldKind::StringList),
    ("warnings", FieldKind::StringList),
    ("description", FieldKind::String),
];

/// Medicine details returned by the explorer lookup.
///
/// Keys stay English; values are in the requested language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineRecord {
    pub name: String,
    pub description: String,
    pub purpose: String,
    pub action: String,
    pub dosage: String,
    pub composition: Vec<String>,
    pub side_effects: Vec<String>,
    pub warnings: Vec<String>,
}

impl MedicineRecord {
    /// Validates a parsed provider value and converts it into a record.
    ///
    /// Every required key must be present with the right type. Extra keys
    /// are ignored.
    pub fn from_value(value: Value) -> Result<Self, QueryError> {
        let Some(object) = value.as_object() else {
            return Err(QueryError::malformed(
                "expected a JSON object",
                value.to_string(),
            ));
        };

        let missing = RECORD_FIELDS
            .iter()
            .filter(|(key, _)| !object.contains_key(*key))
            .map(|(key, _)| *key)
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(QueryError::malformed(
                format!("missing required fields: {}", missing.join(", ")),
                value.to_string(),
            ));
        }

        let raw = value.to_string();
        serde_json::from_value(value).map_err(|err| QueryError::malformed(err.to_string(), raw))
    }

    /// Response schema sent along with the lookup request.
    pub fn response_schema(dialect: SchemaDialect) -> Value {
        let type_name = |kind: &str| match dialect {
            SchemaDialect::Gemini => Value::String(kind.to_ascii_uppercase()),
            SchemaDialect::JsonSchema => Value::String(kind.to_string()),
        };

        let mut properties = Map::new();
        for (key, kind) in RECORD_FIELDS {
            let mut field = Map::new();
            field.insert("type".to_string(), type_name(kind.type_name()));
            if *kind == FieldKind::StringList {
                field.insert("items".to_string(), json!({ "type": type_name("string") }));
            }
            properties.insert((*key).to_string(), Value::Object(field));
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), type_name("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert(
            "required".to_string(),
            Value::Array(
                RECORD_FIELDS
                    .iter()
                    .map(|(key, _)| Value::String((*key).to_string()))
                    .collect(),
            ),
        );
        if dialect == SchemaDialect::JsonSchema {
            schema.insert("additionalProperties".to_string(), Value::Bool(false));
        }
        Value::Object(schema)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{MedicineRecord, SchemaDialect};
    use crate::pharmacy::error::QueryError;

    fn full_record() -> serde_json::Value {
        json!({
            "name": "Paracetamol",
            "purpose": "Pain and fever relief",
            "action": "Inhibits prostaglandin synthesis",
            "dosage": "500 mg every 6 hours",
            "composition": ["Paracetamol 500 mg"],
            "sideEffects": ["Nausea"],
            "warnings": ["Avoid alcohol"],
            "description": "Common analgesic"
        })
    }

    #[test]
    fn complete_object_becomes_record() {
        let record = MedicineRecord::from_value(full_record()).expect("record should validate");
        assert_eq!(record.name, "Paracetamol");
        assert_eq!(record.side_effects, vec!["Nausea".to_string()]);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let mut value = full_record();
        value["manufacturer"] = json!("Acme");
        assert!(MedicineRecord::from_value(value).is_ok());
    }

    #[test]
    fn missing_field_is_malformed_and_named() {
        let mut value = full_record();
        value.as_object_mut().expect("object").remove("warnings");
        match MedicineRecord::from_value(value) {
            Err(QueryError::MalformedResponse { reason, .. }) => {
                assert!(reason.contains("warnings"), "reason was {reason}");
            }
            other => panic!("expected malformed response, got {other:?}"),
        }
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        let mut value = full_record();
        value["composition"] = json!("Paracetamol 500 mg");
        assert!(matches!(
            MedicineRecord::from_value(value),
            Err(QueryError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn non_object_is_malformed() {
        assert!(matches!(
            MedicineRecord::from_value(json!(["Paracetamol"])),
            Err(QueryError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let record = MedicineRecord::from_value(full_record()).expect("record should validate");
        let value = serde_json::to_value(&record).expect("record serializes");
        assert_eq!(value, full_record());
    }

    #[test]
    fn gemini_schema_uses_upper_case_types() {
        let schema = MedicineRecord::response_schema(SchemaDialect::Gemini);
        assert_eq!(schema["type"], json!("OBJECT"));
        assert_eq!(schema["properties"]["sideEffects"]["items"]["type"], json!("STRING"));
        assert_eq!(schema["required"].as_array().map(Vec::len), Some(8));
        assert!(schema.get("additionalProperties").is_none());
    }

    #[test]
    fn json_schema_is_strict() {
        let schema = MedicineRecord::response_schema(SchemaDialect::JsonSchema);
        assert_eq!(schema["properties"]["warnings"]["type"], json!("array"));
        assert_eq!(schema["additionalProperties"], json!(false));
    }
}
