//! # Validation Errors
//!
//! [`ValidationError`] is the single error channel of model validation.
//! Coercion failures, missing fields, and invalid enum values caught by
//! either hook all arrive here as [`ErrorDetail`]s, so callers never need to
//! know which stage rejected the input.
//!
//! [`ModelError`] wraps it for the typed [`Model`](crate::Model) API, adding
//! the failures that can only happen around the pipeline (malformed JSON
//! text, a record that does not fit the target struct).

use std::fmt;

use enumsan_core::EnumError;
use serde::Serialize;
use thiserror::Error;

/// Machine-readable category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An enum field held a value that names no member.
    InvalidEnumValue,
    /// An enum-typed field held a value that matches no member's value.
    Enum,
    /// A required field was absent.
    Missing,
    /// The input was not a mapping.
    ModelType,
    /// Expected a string.
    StringType,
    /// Expected an integer.
    IntType,
    /// A string or float could not be read as an integer.
    IntParsing,
    /// Expected a number.
    FloatType,
    /// A string could not be read as a number.
    FloatParsing,
    /// Expected a boolean.
    BoolType,
    /// A string or integer could not be read as a boolean.
    BoolParsing,
    /// Expected a list.
    ListType,
    /// Expected a tuple.
    TupleType,
    /// A tuple had the wrong number of items.
    TupleLength,
    /// The input carried a key the model does not declare.
    ExtraForbidden,
    /// An assignment named a field the model does not declare.
    UnknownField,
}

impl ErrorKind {
    /// The snake_case identifier, matching the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidEnumValue => "invalid_enum_value",
            Self::Enum => "enum",
            Self::Missing => "missing",
            Self::ModelType => "model_type",
            Self::StringType => "string_type",
            Self::IntType => "int_type",
            Self::IntParsing => "int_parsing",
            Self::FloatType => "float_type",
            Self::FloatParsing => "float_parsing",
            Self::BoolType => "bool_type",
            Self::BoolParsing => "bool_parsing",
            Self::ListType => "list_type",
            Self::TupleType => "tuple_type",
            Self::TupleLength => "tuple_length",
            Self::ExtraForbidden => "extra_forbidden",
            Self::UnknownField => "unknown_field",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    /// Dotted location of the failing value (`colors.1`); empty for the
    /// input as a whole.
    pub loc: String,
    /// Failure category.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl ErrorDetail {
    /// Create a detail.
    pub fn new(loc: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            kind,
            message: message.into(),
        }
    }

    /// Detail for a sanitizer failure on field `loc`.
    pub fn invalid_enum(loc: impl Into<String>, err: &EnumError) -> Self {
        Self::new(loc, ErrorKind::InvalidEnumValue, err.to_string())
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.loc.is_empty() {
            write!(f, "  (root): {} [{}]", self.message, self.kind)
        } else {
            write!(f, "  {}: {} [{}]", self.loc, self.message, self.kind)
        }
    }
}

/// Validation failure of one model, carrying every collected detail.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{}", summarize(.title, .errors))]
pub struct ValidationError {
    title: String,
    errors: Vec<ErrorDetail>,
}

impl ValidationError {
    /// Create an error for model `title`.
    pub fn new(title: impl Into<String>, errors: Vec<ErrorDetail>) -> Self {
        Self {
            title: title.into(),
            errors,
        }
    }

    /// The model that failed.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Every failure in discovery order.
    pub fn errors(&self) -> &[ErrorDetail] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if any detail has the given kind.
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    /// Consumes self and returns the details.
    pub fn into_inner(self) -> Vec<ErrorDetail> {
        self.errors
    }
}

/// `N validation error(s) for Title`, then one line per detail.
fn summarize(title: &str, errors: &[ErrorDetail]) -> String {
    let plural = if errors.len() == 1 { "" } else { "s" };
    let mut out = format!("{} validation error{plural} for {title}", errors.len());
    for detail in errors {
        out.push('\n');
        out.push_str(&detail.to_string());
    }
    out
}

/// A field type string that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid field type {input:?}: {reason}")]
pub struct FieldTypeError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: String,
}

/// Error returned by the typed [`Model`](crate::Model) API.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The input text was not valid JSON.
    #[error("invalid JSON input: {0}")]
    Json(#[source] serde_json::Error),

    /// The validated record does not deserialize into the model struct.
    #[error("validated record does not fit model {model}: {source}")]
    Conversion {
        /// Model title.
        model: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The model could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ModelError {
    /// The validation failure, if that is what this is.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}
