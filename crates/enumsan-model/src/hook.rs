//! # Model Hooks
//!
//! [`ModelHook`] is the extension point around type coercion: `before` sees
//! the raw input, `after` sees the coerced record. Every schema runs
//! [`EnumSanitizer`] first, then any hooks the model registered.
//!
//! The enum sanitizer needs both halves. The pre-parse pass converts
//! members and integer values to names before coercion checks the declared
//! string type. The post-parse pass catches defaults, which never appear in
//! the raw input.

use std::fmt;

use enumsan_core::{sanitize, FieldValue};
use serde_json::Value;

use crate::error::{ErrorDetail, ValidationError};
use crate::field::FieldDescriptor;
use crate::introspect::enum_fields;
use crate::record::Record;
use crate::schema::ModelSchema;

/// Hook invoked around type coercion.
pub trait ModelHook: fmt::Debug + Send + Sync {
    /// Runs on the raw input before coercion. May rewrite it in place.
    ///
    /// # Errors
    ///
    /// A returned error aborts validation.
    fn before(&self, schema: &ModelSchema, input: &mut FieldValue) -> Result<(), ValidationError> {
        let _ = (schema, input);
        Ok(())
    }

    /// Runs on the coerced record. May rewrite it in place.
    ///
    /// # Errors
    ///
    /// A returned error aborts validation.
    fn after(&self, schema: &ModelSchema, record: &mut Record) -> Result<(), ValidationError> {
        let _ = (schema, record);
        Ok(())
    }
}

/// Normalizes enum-annotated fields to member names on both sides of
/// coercion.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumSanitizer;

impl ModelHook for EnumSanitizer {
    /// Non-mapping input passes through; coercion reports it. Absent keys
    /// stay absent.
    fn before(&self, schema: &ModelSchema, input: &mut FieldValue) -> Result<(), ValidationError> {
        let Some(map) = input.as_map_mut() else {
            return Ok(());
        };

        let mut errors = Vec::new();
        for binding in schema.enum_fields() {
            if let Some(value) = map.get_mut(binding.name) {
                sanitize_slot(binding.name, value, binding.enum_type(), &mut errors);
            }
        }
        finish(schema, errors)
    }

    fn after(&self, schema: &ModelSchema, record: &mut Record) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        for binding in schema.enum_fields() {
            if let Some(value) = record.get_mut(binding.name) {
                sanitize_slot(binding.name, value, binding.enum_type(), &mut errors);
            }
        }
        finish(schema, errors)
    }
}

fn sanitize_slot(
    name: &str,
    value: &mut FieldValue,
    enum_type: &enumsan_core::EnumType,
    errors: &mut Vec<ErrorDetail>,
) {
    match sanitize(value, enum_type) {
        Ok(clean) => {
            tracing::trace!(field = name, enum_type = %enum_type, "sanitized enum field");
            *value = clean;
        }
        Err(err) => errors.push(ErrorDetail::invalid_enum(name, &err)),
    }
}

fn finish(schema: &ModelSchema, errors: Vec<ErrorDetail>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(schema.title(), errors))
    }
}

/// Definition-time patch: describe every enum field that has no description
/// and publish its member names under the `enum` schema extension.
///
/// A user-supplied description or `enum` extension is left alone.
pub(crate) fn patch_enum_metadata(model: &str, fields: &mut [FieldDescriptor]) {
    let patches: Vec<(usize, String, Value)> = enum_fields(fields)
        .map(|binding| {
            let shape = binding.field.field_type().marker_shape();
            if shape != binding.marker.shape() {
                tracing::warn!(
                    model,
                    field = binding.name,
                    declared = %binding.field.field_type(),
                    marker = %binding.marker.shape(),
                    "enum marker shape does not match the declared field type"
                );
            }
            let ty = binding.enum_type();
            (
                binding.name.to_string(),
                ty.describe(),
                Value::from(ty.names().collect::<Vec<_>>()),
            )
        })
        .filter_map(|(name, description, names)| {
            fields
                .iter()
                .position(|f| f.name() == name)
                .map(|index| (index, description, names))
        })
        .collect();

    for (index, description, names) in patches {
        let field = &mut fields[index];
        if field.description().is_none() {
            field.set_description(description);
        }
        if !field.extensions().contains_key("enum") {
            field.set_extension("enum", names);
        }
    }
}
