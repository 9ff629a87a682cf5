//! # Error Types
//!
//! Errors raised by enumeration definitions and by the enum sanitizer.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - [`EnumError::InvalidValue`] is the only error a caller sees at
//!   validation time. Its message is part of the observable contract and
//!   lists every member in declaration order.
//! - The remaining variants reject malformed enumeration definitions when a
//!   descriptor is built at runtime (definition files, tests). Enumerations
//!   declared with [`int_enum!`](crate::int_enum) cannot hit them.

use thiserror::Error;

/// Error raised by enumeration descriptors and the sanitizer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnumError {
    /// A raw value could not be resolved to any member of the target
    /// enumeration.
    #[error("Invalid enum value: {value}. Must be one of: {choices}")]
    InvalidValue {
        /// The rejected value, rendered for humans.
        value: String,
        /// Every member as `NAME (value)`, comma-separated, declaration order.
        choices: String,
    },

    /// Two members share a name.
    #[error("enum {enum_name} declares member name {name:?} more than once")]
    DuplicateName {
        /// The enumeration being defined.
        enum_name: String,
        /// The repeated member name.
        name: String,
    },

    /// Two members share an integer value.
    #[error("enum {enum_name} declares value {value} more than once")]
    DuplicateValue {
        /// The enumeration being defined.
        enum_name: String,
        /// The repeated integer value.
        value: i64,
    },

    /// The enumeration or one of its members has an empty name.
    #[error("enum and member names must not be empty (in enum {enum_name:?})")]
    EmptyName {
        /// The enumeration being defined (may itself be empty).
        enum_name: String,
    },
}

impl EnumError {
    /// Returns true for the validation-time error kind.
    pub fn is_invalid_value(&self) -> bool {
        matches!(self, Self::InvalidValue { .. })
    }
}
