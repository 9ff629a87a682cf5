//! # Typed Models
//!
//! [`Model`] ties a serde struct to its cached [`ModelSchema`]. The struct
//! declares enum fields as `String` (or `Option<String>`, `Vec<String>`,
//! `(String, String)`); validation guarantees they hold member names.
//!
//! ```
//! use std::sync::OnceLock;
//!
//! use enumsan_model::{input, int_enum, FieldDescriptor, FieldType, Model, ModelSchema};
//! use serde::{Deserialize, Serialize};
//!
//! int_enum! {
//!     pub enum Status {
//!         Pending = 1,
//!         Approved = 2,
//!     }
//! }
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Item {
//!     name: String,
//!     status: String,
//! }
//!
//! impl Model for Item {
//!     fn schema() -> &'static ModelSchema {
//!         static SCHEMA: OnceLock<ModelSchema> = OnceLock::new();
//!         SCHEMA.get_or_init(|| {
//!             ModelSchema::builder("Item")
//!                 .field(FieldDescriptor::new("name", FieldType::Str))
//!                 .field(FieldDescriptor::new("status", FieldType::Str).enum_of::<Status>())
//!                 .build()
//!         })
//!     }
//! }
//!
//! let item = Item::model_validate(input! { "name" => "x", "status" => 2 }).unwrap();
//! assert_eq!(item.status, "Approved");
//! ```

use enumsan_core::FieldValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ModelError;
use crate::record::Record;
use crate::schema::ModelSchema;

/// A struct validated through a [`ModelSchema`].
pub trait Model: Serialize + DeserializeOwned {
    /// The model's schema, built once.
    fn schema() -> &'static ModelSchema;

    /// Validate raw input and build the struct.
    ///
    /// # Errors
    ///
    /// [`ModelError::Validation`] for rejected input;
    /// [`ModelError::Conversion`] when the schema and struct disagree.
    fn model_validate(input: impl Into<FieldValue>) -> Result<Self, ModelError> {
        let record = Self::schema().validate(input)?;
        from_record(&record)
    }

    /// Parse JSON text, then validate it.
    ///
    /// # Errors
    ///
    /// [`ModelError::Json`] for malformed text, otherwise as
    /// [`Model::model_validate`].
    fn model_validate_json(json: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(json).map_err(ModelError::Json)?;
        Self::model_validate(value)
    }

    /// Serialize to a JSON value. Enum fields come out as member names.
    ///
    /// # Errors
    ///
    /// [`ModelError::Serialization`] if the struct's `Serialize` fails.
    fn model_dump(&self) -> Result<Value, ModelError> {
        serde_json::to_value(self).map_err(ModelError::Serialization)
    }

    /// Serialize to JSON text.
    ///
    /// # Errors
    ///
    /// [`ModelError::Serialization`] if the struct's `Serialize` fails.
    fn model_dump_json(&self) -> Result<String, ModelError> {
        serde_json::to_string(self).map_err(ModelError::Serialization)
    }

    /// The model's JSON Schema document.
    fn model_json_schema() -> Value {
        Self::schema().json_schema()
    }

    /// Copy of `self` with `field` set to `value`, re-validated through the
    /// full pipeline.
    ///
    /// # Errors
    ///
    /// As [`Model::model_validate`], plus `unknown_field`.
    fn model_update(&self, field: &str, value: impl Into<FieldValue>) -> Result<Self, ModelError> {
        let current = FieldValue::from(self.model_dump()?);
        let record = Self::schema().validate_assignment(current, field, value)?;
        from_record(&record)
    }
}

fn from_record<T: Model>(record: &Record) -> Result<T, ModelError> {
    record.deserialize().map_err(|source| ModelError::Conversion {
        model: T::schema().title().to_string(),
        source,
    })
}
