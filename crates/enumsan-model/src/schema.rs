//! # Model Schemas
//!
//! [`ModelSchema`] is the immutable per-model table: title, fields in
//! declaration order, configuration, and hooks. It is assembled once with
//! [`ModelSchemaBuilder`]; `build()` runs the enum metadata patch and
//! freezes the result. Typed models cache their schema in a `static
//! OnceLock` so the patch happens exactly once per model type.
//!
//! ## Validation Pipeline
//!
//! Raw input → `before` hooks → coercion → `after` hooks → [`Record`].
//! Any stage may fail; a failure returns a [`ValidationError`] and no
//! record.

use std::fmt;
use std::sync::Arc;

use enumsan_core::FieldValue;
use serde_json::Value;

use crate::coerce::coerce_input;
use crate::config::{ExtraPolicy, ModelConfig};
use crate::error::{ErrorDetail, ErrorKind, ValidationError};
use crate::field::FieldDescriptor;
use crate::hook::{patch_enum_metadata, EnumSanitizer, ModelHook};
use crate::introspect::{enum_fields, EnumFields};
use crate::json_schema;
use crate::record::Record;

/// Immutable description of a model.
#[derive(Clone)]
pub struct ModelSchema {
    title: String,
    fields: Vec<FieldDescriptor>,
    config: ModelConfig,
    hooks: Vec<Arc<dyn ModelHook>>,
}

impl fmt::Debug for ModelSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSchema")
            .field("title", &self.title)
            .field("fields", &self.fields)
            .field("config", &self.config)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl ModelSchema {
    /// Start defining a model.
    pub fn builder(title: impl Into<String>) -> ModelSchemaBuilder {
        ModelSchemaBuilder {
            title: title.into(),
            fields: Vec::new(),
            config: ModelConfig::default(),
            hooks: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look a field up by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Enum-annotated fields in declaration order.
    pub fn enum_fields(&self) -> EnumFields<'_> {
        enum_fields(&self.fields)
    }

    /// Run the full pipeline on raw input.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's [`ValidationError`].
    pub fn validate(&self, input: impl Into<FieldValue>) -> Result<Record, ValidationError> {
        let mut input = input.into();
        for hook in &self.hooks {
            hook.before(self, &mut input)?;
        }

        let mut record = coerce_input(self, input)?;

        for hook in &self.hooks {
            hook.after(self, &mut record)?;
        }

        tracing::trace!(model = %self.title, fields = record.len(), "validated record");
        Ok(record)
    }

    /// Assign `value` to `field` on an existing instance and re-validate.
    ///
    /// `current` is the instance as raw input (a [`Record`] or its dump).
    /// The assignment goes through the whole pipeline, so the new value is
    /// sanitized exactly like constructor input.
    ///
    /// # Errors
    ///
    /// `unknown_field` when the model neither declares `field` nor allows
    /// extras; otherwise whatever the pipeline reports.
    pub fn validate_assignment(
        &self,
        current: impl Into<FieldValue>,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Record, ValidationError> {
        if self.field(field).is_none() && self.config.extra != ExtraPolicy::Allow {
            return Err(ValidationError::new(
                &self.title,
                vec![ErrorDetail::new(
                    field,
                    ErrorKind::UnknownField,
                    format!("Object has no attribute '{field}'"),
                )],
            ));
        }

        let mut input = current.into();
        match input.as_map_mut() {
            Some(map) => {
                map.insert(field.to_string(), value.into());
            }
            None => {
                input = FieldValue::map([(field.to_string(), value.into())]);
            }
        }
        self.validate(input)
    }

    /// JSON Schema document for this model.
    pub fn json_schema(&self) -> Value {
        json_schema::generate(self)
    }
}

/// Builder for [`ModelSchema`].
pub struct ModelSchemaBuilder {
    title: String,
    fields: Vec<FieldDescriptor>,
    config: ModelConfig,
    hooks: Vec<Arc<dyn ModelHook>>,
}

impl ModelSchemaBuilder {
    /// Declare a field. Redeclaring a name replaces the earlier field but
    /// keeps its position.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        match self.fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(slot) => *slot = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Declare several fields.
    pub fn fields(self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        fields.into_iter().fold(self, Self::field)
    }

    pub fn config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a hook. Hooks run in registration order, after the enum
    /// sanitizer.
    pub fn hook(mut self, hook: impl ModelHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Patch enum metadata and freeze the schema.
    pub fn build(mut self) -> ModelSchema {
        patch_enum_metadata(&self.title, &mut self.fields);

        let mut hooks: Vec<Arc<dyn ModelHook>> = Vec::with_capacity(self.hooks.len() + 1);
        hooks.push(Arc::new(EnumSanitizer));
        hooks.extend(self.hooks);

        let schema = ModelSchema {
            title: self.title,
            fields: self.fields,
            config: self.config,
            hooks,
        };
        tracing::debug!(
            model = %schema.title,
            fields = schema.fields.len(),
            enum_fields = schema.enum_fields().count(),
            "built model schema"
        );
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;
    use crate::input;
    use enumsan_core::int_enum;

    int_enum! {
        #[allow(non_camel_case_types)]
        enum Color {
            RED = 1,
            BLUE = 2,
            GREEN = 3,
        }
    }

    fn color_item() -> ModelSchema {
        ModelSchema::builder("ColorItem")
            .field(FieldDescriptor::new("color", FieldType::Str).enum_of::<Color>())
            .field(
                FieldDescriptor::new("default", FieldType::Str)
                    .with_default(Color::RED)
                    .enum_of::<Color>(),
            )
            .field(
                FieldDescriptor::new("empty", FieldType::optional(FieldType::Str))
                    .with_default(FieldValue::None)
                    .enum_of::<Color>(),
            )
            .build()
    }

    #[derive(Debug)]
    struct Lowercase;

    impl ModelHook for Lowercase {
        fn after(&self, _: &ModelSchema, record: &mut Record) -> Result<(), ValidationError> {
            if let Some(FieldValue::Str(s)) = record.get_mut("label") {
                *s = s.to_lowercase();
            }
            Ok(())
        }
    }

    #[test]
    fn test_pipeline_sanitizes_input_and_defaults() {
        let record = color_item().validate(input! { "color" => 2 }).unwrap();
        assert_eq!(record.get("color"), Some(&FieldValue::from("BLUE")));
        assert_eq!(record.get("default"), Some(&FieldValue::from("RED")));
        assert_eq!(record.get("empty"), Some(&FieldValue::None));
    }

    #[test]
    fn test_enum_failure_surfaces_as_validation_error() {
        let err = color_item().validate(input! { "color" => "YELLOW" }).unwrap_err();
        assert_eq!(err.title(), "ColorItem");
        assert_eq!(err.errors()[0].kind, ErrorKind::InvalidEnumValue);
        assert_eq!(
            err.errors()[0].message,
            "Invalid enum value: YELLOW. Must be one of: RED (1), BLUE (2), GREEN (3)"
        );
    }

    #[test]
    fn test_redeclared_field_keeps_position() {
        let schema = ModelSchema::builder("M")
            .field(FieldDescriptor::new("a", FieldType::Int))
            .field(FieldDescriptor::new("b", FieldType::Int))
            .field(FieldDescriptor::new("a", FieldType::Str))
            .build();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(schema.field("a").unwrap().field_type(), &FieldType::Str);
    }

    #[test]
    fn test_user_hooks_run_after_enum_sanitizer() {
        let schema = ModelSchema::builder("Labelled")
            .field(FieldDescriptor::new("label", FieldType::Str).enum_of::<Color>())
            .hook(Lowercase)
            .build();
        let record = schema.validate(input! { "label" => 3 }).unwrap();
        assert_eq!(record.get("label"), Some(&FieldValue::from("green")));
    }

    #[test]
    fn test_assignment_resanitizes() {
        let schema = color_item();
        let record = schema.validate(input! { "color" => "RED" }).unwrap();
        let updated = schema
            .validate_assignment(&record, "color", Color::GREEN)
            .unwrap();
        assert_eq!(updated.get("color"), Some(&FieldValue::from("GREEN")));

        let err = schema.validate_assignment(&record, "color", 42).unwrap_err();
        assert!(err.has_kind(ErrorKind::InvalidEnumValue));
    }

    #[test]
    fn test_assignment_to_unknown_field() {
        let schema = color_item();
        let record = schema.validate(input! { "color" => "RED" }).unwrap();
        let err = schema.validate_assignment(&record, "shade", "dark").unwrap_err();
        assert!(err.has_kind(ErrorKind::UnknownField));
    }

    #[test]
    fn test_enum_fields_view() {
        let schema = color_item();
        let names: Vec<&str> = schema.enum_fields().map(|b| b.name).collect();
        assert_eq!(names, vec!["color", "default", "empty"]);
    }
}
