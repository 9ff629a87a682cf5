//! # Definition File Tests
//!
//! Loads definitions from in-memory YAML and drives the subcommand helpers
//! without touching the filesystem.

use enumsan_cli::parse_definitions;
use enumsan_cli::sanitize::sanitize_literal;
use enumsan_cli::schema::render_schema;
use enumsan_cli::validate::{parse_document, validate_document};
use enumsan_model::{ErrorKind, ExtraPolicy};
use serde_json::json;

const DEFINITIONS: &str = r#"
enums:
  - name: Status
    members:
      - { name: PENDING, value: 1 }
      - { name: APPROVED, value: 2 }
      - { name: REJECTED, value: 3 }
models:
  - name: Item
    config: { extra: forbid }
    fields:
      - { name: name, type: str, description: Item name }
      - { name: status, type: str, enum: Status }
      - { name: previous, type: "optional[str]", enum: Status, default: null }
      - { name: history, type: "list[str]", enum: Status, default: [] }
"#;

#[test]
fn loads_enums_and_models() {
    let defs = parse_definitions(DEFINITIONS).unwrap();
    assert_eq!(defs.enum_names().collect::<Vec<_>>(), vec!["Status"]);
    assert_eq!(defs.model_names().collect::<Vec<_>>(), vec!["Item"]);

    let item = defs.model("Item").unwrap();
    assert_eq!(item.config().extra, ExtraPolicy::Forbid);
    assert_eq!(item.enum_fields().count(), 3);
    assert_eq!(
        item.field("status").unwrap().description(),
        Some("Enum values: PENDING, APPROVED, REJECTED")
    );
    assert_eq!(item.field("name").unwrap().description(), Some("Item name"));
}

#[test]
fn validates_documents() {
    let defs = parse_definitions(DEFINITIONS).unwrap();
    let item = defs.model("Item").unwrap();

    let doc = parse_document("name: widget\nstatus: 2\nhistory: [1, PENDING]\n").unwrap();
    let record = validate_document(item, doc).unwrap();
    assert_eq!(
        record,
        json!({
            "name": "widget",
            "status": "APPROVED",
            "previous": null,
            "history": ["PENDING", "PENDING"],
        })
    );
}

#[test]
fn reports_invalid_documents() {
    let defs = parse_definitions(DEFINITIONS).unwrap();
    let item = defs.model("Item").unwrap();

    let doc = parse_document(r#"{"name": "widget", "status": 9}"#).unwrap();
    let err = validate_document(item, doc).unwrap_err();
    assert!(err.has_kind(ErrorKind::InvalidEnumValue));
    assert!(err.to_string().starts_with("1 validation error for Item"));

    let doc = parse_document(r#"{"name": "widget", "status": 1, "color": "red"}"#).unwrap();
    let err = validate_document(item, doc).unwrap_err();
    assert!(err.has_kind(ErrorKind::ExtraForbidden));
}

#[test]
fn renders_schema_with_enum_names() {
    let defs = parse_definitions(DEFINITIONS).unwrap();
    let text = render_schema(&defs, "Item").unwrap();
    let schema: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        schema["properties"]["history"]["enum"],
        json!(["PENDING", "APPROVED", "REJECTED"])
    );
    assert_eq!(schema["required"], json!(["name", "status"]));
    assert!(render_schema(&defs, "Missing").is_err());
}

#[test]
fn sanitizes_literals() {
    let defs = parse_definitions(DEFINITIONS).unwrap();
    let status = defs.require_enum("Status").unwrap();

    assert_eq!(sanitize_literal(status, "2").unwrap(), json!("APPROVED"));
    assert_eq!(sanitize_literal(status, "REJECTED").unwrap(), json!("REJECTED"));
    assert_eq!(sanitize_literal(status, r#"[1, "APPROVED"]"#).unwrap(), json!(["PENDING", "APPROVED"]));
    assert!(sanitize_literal(status, "7").unwrap_err().is_invalid_value());
}

#[test]
fn enum_typed_fields_keep_values() {
    let text = r#"
enums:
  - name: Status
    members:
      - { name: PENDING, value: 1 }
      - { name: APPROVED, value: 2 }
models:
  - name: Ticket
    fields:
      - { name: priority, type: Status }
      - { name: status, type: str, enum: Status }
      - { name: escalated, type: "optional[Status]", default: null }
"#;
    let defs = parse_definitions(text).unwrap();
    let ticket = defs.model("Ticket").unwrap();
    assert_eq!(ticket.enum_fields().count(), 1);

    let doc = parse_document(r#"{"priority": 2, "status": 2}"#).unwrap();
    assert_eq!(
        validate_document(ticket, doc).unwrap(),
        json!({"priority": 2, "status": "APPROVED", "escalated": null})
    );

    let doc = parse_document(r#"{"priority": "APPROVED", "status": 2}"#).unwrap();
    let err = validate_document(ticket, doc).unwrap_err();
    assert!(err.has_kind(ErrorKind::Enum));
    assert_eq!(err.errors()[0].loc, "priority");

    let schema: serde_json::Value =
        serde_json::from_str(&render_schema(&defs, "Ticket").unwrap()).unwrap();
    assert_eq!(schema["properties"]["priority"]["enum"], json!([1, 2]));
    assert_eq!(
        schema["properties"]["escalated"]["anyOf"][0],
        json!({"type": "integer", "enum": [1, 2]})
    );
}

#[test]
fn rejects_undefined_enum_reference() {
    let text = r#"
models:
  - name: M
    fields:
      - { name: x, type: str, enum: Nope }
"#;
    let err = parse_definitions(text).unwrap_err();
    assert!(format!("{err:#}").contains("undefined enum 'Nope'"));
}

#[test]
fn rejects_duplicate_names() {
    let enums = r#"
enums:
  - { name: A, members: [{ name: X, value: 1 }] }
  - { name: A, members: [{ name: Y, value: 2 }] }
"#;
    assert!(format!("{:#}", parse_definitions(enums).unwrap_err()).contains("duplicate enum"));

    let models = r#"
models:
  - { name: M, fields: [] }
  - { name: M, fields: [] }
"#;
    assert!(format!("{:#}", parse_definitions(models).unwrap_err()).contains("duplicate model"));
}

#[test]
fn rejects_invalid_enum_members() {
    let text = r#"
enums:
  - { name: A, members: [{ name: X, value: 1 }, { name: Y, value: 1 }] }
"#;
    assert!(parse_definitions(text).is_err());
}
