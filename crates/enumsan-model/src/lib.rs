//! # enumsan-model: Models with Enum-Sanitized Fields
//!
//! A small model-validation framework whose distinguishing behavior is the
//! handling of integer-backed enumerations. A field declared as a string and
//! marked with an enumeration accepts the member itself, its integer value,
//! or its name, and always stores the name.
//!
//! ## Pipeline
//!
//! ```text
//! raw input ─▶ EnumSanitizer::before ─▶ user hooks (before)
//!           ─▶ type coercion + defaults
//!           ─▶ EnumSanitizer::after  ─▶ user hooks (after) ─▶ Record
//! ```
//!
//! ## Key Types
//!
//! - [`FieldDescriptor`] / [`FieldType`] / [`EnumMarker`]: the field table.
//! - [`ModelSchema`]: the immutable per-model table; built once, it runs
//!   the definition-time metadata patch (description plus `enum` schema
//!   extension on every enum field).
//! - [`ModelHook`] / [`EnumSanitizer`]: the pre/post-parse hook seam.
//! - [`Model`]: ties a serde struct to its schema.
//! - [`ValidationError`]: every failure, with location and kind.
//!
//! ## Crate Policy
//!
//! - Depends only on `enumsan-core` within the workspace.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod coerce;
pub mod config;
pub mod error;
pub mod field;
pub mod hook;
pub mod introspect;
mod json_schema;
pub mod model;
pub mod record;
pub mod schema;

pub use config::{ExtraPolicy, ModelConfig};
pub use error::{ErrorDetail, ErrorKind, FieldTypeError, ModelError, ValidationError};
pub use field::{EnumMarker, FieldDescriptor, FieldType, MarkerShape};
pub use hook::{EnumSanitizer, ModelHook};
pub use introspect::{enum_fields, EnumBinding, EnumFields};
pub use model::Model;
pub use record::Record;
pub use schema::{ModelSchema, ModelSchemaBuilder};

pub use enumsan_core::{int_enum, EnumError, EnumMember, EnumType, EnumValue, FieldValue, IntEnum};

/// Build a mapping [`FieldValue`] from `key => value` pairs.
///
/// ```
/// use enumsan_model::{input, FieldValue};
///
/// let raw = input! { "color" => 2, "tags" => vec!["a", "b"] };
/// assert_eq!(raw.as_map().unwrap()["color"], FieldValue::Int(2));
/// ```
#[macro_export]
macro_rules! input {
    () => {
        $crate::FieldValue::Map(::std::collections::BTreeMap::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = ::std::collections::BTreeMap::new();
        $(
            map.insert(::std::string::String::from($key), $crate::FieldValue::from($value));
        )+
        $crate::FieldValue::Map(map)
    }};
}
