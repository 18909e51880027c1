use jsonschema::validator_for;
use serde_json::json;

use fakestore_mcp_server::schema::{InputSchema, ObjectSchema, SCHEMA_DIALECT};

mod common;

#[test]
fn advertised_schemas_compile_on_their_own() {
    let registry = common::registry(common::MockTransport::always(json!([])));

    for tool in registry.list_tools() {
        validator_for(&tool.input_schema)
            .unwrap_or_else(|e| panic!("{} schema does not compile: {e}", tool.name));
    }
}

#[test]
fn builder_emits_required_and_dialect() {
    let doc = ObjectSchema::new()
        .id("userId", "User ID")
        .non_empty_string("category", "Category")
        .build();

    assert_eq!(doc["$schema"], SCHEMA_DIALECT);
    assert_eq!(doc["required"], json!(["userId", "category"]));
    assert_eq!(doc["properties"]["userId"]["exclusiveMinimum"], 0);
    assert_eq!(doc["properties"]["category"]["minLength"], 1);
}

#[test]
fn empty_object_schema_has_no_required_list() {
    let doc = ObjectSchema::new().build();
    assert!(doc.get("required").is_none());
    assert_eq!(doc["properties"], json!({}));
}

#[test]
fn violation_names_missing_field_first() {
    let schema = InputSchema::compile(
        ObjectSchema::new()
            .limit("Maximum")
            .id("id", "Identifier")
            .build(),
    )
    .unwrap();

    let violation = schema.validate(&json!({"limit": 500})).unwrap_err();
    assert_eq!(violation.field.as_deref(), Some("id"));

    let violation = schema.validate(&json!({"id": 1, "limit": 500})).unwrap_err();
    assert_eq!(violation.field.as_deref(), Some("limit"));
    assert!(violation.message.starts_with("limit: "));

    assert!(schema.validate(&json!({"id": 1, "limit": 100})).is_ok());
}

#[test]
fn public_document_strips_only_the_dialect() {
    let schema = InputSchema::compile(ObjectSchema::new().sort().build()).unwrap();
    let public = schema.public_document();

    assert!(public.get("$schema").is_none());
    assert_eq!(public["properties"], schema.document()["properties"]);
}
