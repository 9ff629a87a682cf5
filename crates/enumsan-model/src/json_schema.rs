//! # Schema Generation
//!
//! Renders a [`ModelSchema`] as a JSON Schema (Draft 2020-12) document.
//! Each property is built from the field's declared type, then `default`,
//! `description`, and `title`, and finally every extension entry, which
//! overrides anything generated. Enum fields therefore carry their member
//! names under `enum`, whatever their declared wire type.
//! Fields declared with an enumeration as their type list its integer
//! values instead.

use serde_json::{json, Map, Value};

use crate::config::ExtraPolicy;
use crate::field::{FieldDescriptor, FieldType};
use crate::schema::ModelSchema;

pub(crate) fn generate(schema: &ModelSchema) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in schema.fields() {
        properties.insert(field.name().to_string(), property(field));
        if field.is_required() {
            required.push(Value::from(field.name()));
        }
    }

    let mut doc = Map::new();
    doc.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        doc.insert("required".into(), Value::Array(required));
    }
    doc.insert("title".into(), Value::from(schema.title()));
    doc.insert("type".into(), Value::from("object"));
    if schema.config().extra == ExtraPolicy::Forbid {
        doc.insert("additionalProperties".into(), Value::Bool(false));
    }
    Value::Object(doc)
}

fn property(field: &FieldDescriptor) -> Value {
    let mut entry = type_schema(field.field_type());
    if let Some(default) = field.default_value() {
        entry.insert("default".into(), default.to_json());
    }
    if let Some(description) = field.description() {
        entry.insert("description".into(), Value::from(description));
    }
    entry.insert("title".into(), Value::from(field.title()));
    for (key, value) in field.extensions() {
        entry.insert(key.clone(), value.clone());
    }
    Value::Object(entry)
}

fn type_schema(ty: &FieldType) -> Map<String, Value> {
    let value = match ty {
        FieldType::Any => json!({}),
        FieldType::Str => json!({"type": "string"}),
        FieldType::Int => json!({"type": "integer"}),
        FieldType::Float => json!({"type": "number"}),
        FieldType::Bool => json!({"type": "boolean"}),
        FieldType::Enum(enum_type) => json!({
            "type": "integer",
            "enum": enum_type.members().iter().map(|m| m.value).collect::<Vec<_>>(),
        }),
        FieldType::Optional(inner) => json!({
            "anyOf": [Value::Object(type_schema(inner)), {"type": "null"}]
        }),
        FieldType::List(inner) => json!({
            "type": "array",
            "items": Value::Object(type_schema(inner)),
        }),
        FieldType::Tuple(items) => json!({
            "type": "array",
            "prefixItems": items
                .iter()
                .map(|item| Value::Object(type_schema(item)))
                .collect::<Vec<_>>(),
            "minItems": items.len(),
            "maxItems": items.len(),
        }),
    };
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
