use jsonschema::{validator_for, Validator};
use serde_json::{json, Map, Value};

/// Dialect declared by every tool input schema.
pub const SCHEMA_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema compile error: {0}")]
    Compile(String),
}

/// An argument object that failed its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Offending property, when one can be singled out.
    pub field: Option<String>,
    pub message: String,
}

/// Compiled input schema for one tool.
pub struct InputSchema {
    document: Value,
    validator: Validator,
}

impl InputSchema {
    pub fn compile(document: Value) -> Result<Self, SchemaError> {
        let validator =
            validator_for(&document).map_err(|e| SchemaError::Compile(e.to_string()))?;
        Ok(Self { document, validator })
    }

    /// The schema as declared, `$schema` included.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The schema without its `$schema` dialect marker, for advertising to clients.
    pub fn public_document(&self) -> Value {
        let mut doc = self.document.clone();
        if let Some(obj) = doc.as_object_mut() {
            obj.remove("$schema");
        }
        doc
    }

    /// Check `instance` against the whole schema. All constraints must hold.
    pub fn validate(&self, instance: &Value) -> Result<(), SchemaViolation> {
        let detail = match self.validator.validate(instance) {
            Ok(()) => return Ok(()),
            Err(err) => err.to_string(),
        };

        let field = self.offending_field(instance);
        let message = match &field {
            Some(name) => format!("{name}: {detail}"),
            None => detail,
        };
        Err(SchemaViolation { field, message })
    }

    /// Rewrite whole-number floats (`5.0`) as integers for every property
    /// declared `"type": "integer"`, so they deserialize into integer fields.
    pub fn normalize_integers(&self, instance: &mut Value) {
        let (Some(obj), Some(properties)) = (
            instance.as_object_mut(),
            self.document.get("properties").and_then(Value::as_object),
        ) else {
            return;
        };

        for (name, sub) in properties {
            if sub.get("type").and_then(Value::as_str) != Some("integer") {
                continue;
            }
            let Some(value) = obj.get_mut(name) else {
                continue;
            };
            let whole = value
                .as_f64()
                .filter(|f| value.is_f64() && f.fract() == 0.0 && f.abs() < 9.0e15);
            if let Some(f) = whole {
                *value = Value::from(f as i64);
            }
        }
    }

    /// First missing required property, else first property whose value
    /// fails its own sub-schema.
    fn offending_field(&self, instance: &Value) -> Option<String> {
        let obj = instance.as_object()?;

        let required = self.document.get("required").and_then(Value::as_array);
        for name in required.into_iter().flatten().filter_map(Value::as_str) {
            if !obj.contains_key(name) {
                return Some(name.to_string());
            }
        }

        let properties = self.document.get("properties").and_then(Value::as_object)?;
        properties
            .iter()
            .find(|(name, sub)| {
                obj.get(name.as_str()).is_some_and(|value| {
                    validator_for(sub).is_ok_and(|v| !v.is_valid(value))
                })
            })
            .map(|(name, _)| name.clone())
    }
}

/// Builder for the object schemas used by the tool catalog.
#[derive(Debug, Default)]
pub struct ObjectSchema {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Optional `1..=100` integer.
    pub fn limit(self, description: &str) -> Self {
        self.optional(
            "limit",
            json!({
                "type": "integer",
                "exclusiveMinimum": 0,
                "maximum": 100,
                "description": description,
            }),
        )
    }

    /// Optional `asc` / `desc`.
    pub fn sort(self) -> Self {
        self.optional(
            "sort",
            json!({
                "type": "string",
                "enum": ["asc", "desc"],
                "description": "Sort order: asc or desc",
            }),
        )
    }

    /// Required positive integer identifier.
    pub fn id(self, name: &str, description: &str) -> Self {
        self.required(
            name,
            json!({
                "type": "integer",
                "exclusiveMinimum": 0,
                "description": description,
            }),
        )
    }

    /// Required non-empty string.
    pub fn non_empty_string(self, name: &str, description: &str) -> Self {
        self.required(
            name,
            json!({
                "type": "string",
                "minLength": 1,
                "description": description,
            }),
        )
    }

    pub fn optional(mut self, name: &str, schema: Value) -> Self {
        self.properties.insert(name.to_string(), schema);
        self
    }

    pub fn required(mut self, name: &str, schema: Value) -> Self {
        self.properties.insert(name.to_string(), schema);
        self.required.push(name.to_string());
        self
    }

    pub fn build(self) -> Value {
        let mut doc = Map::new();
        doc.insert("type".into(), json!("object"));
        doc.insert("properties".into(), Value::Object(self.properties));
        if !self.required.is_empty() {
            doc.insert("required".into(), json!(self.required));
        }
        doc.insert("$schema".into(), json!(SCHEMA_DIALECT));
        Value::Object(doc)
    }
}
