//! # enumsan-core: Enumerations, Field Values, and the Enum Sanitizer
//!
//! The leaf crate of the workspace. It knows nothing about models; it
//! defines what an integer-backed enumeration is, what a dynamic field value
//! looks like, and how any accepted representation of an enumeration member
//! is normalized to the member's name.
//!
//! ## Key Types
//!
//! - [`EnumType`]: runtime descriptor: a name plus ordered
//!   `NAME = value` members with unique names and values.
//! - [`IntEnum`] / [`int_enum!`]: Rust enums that carry an [`EnumType`].
//! - [`FieldValue`]: the raw/sanitized value tree (JSON plus members and
//!   tuples).
//! - [`sanitize`]: the normalization function.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `enumsan-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod enumeration;
pub mod error;
pub mod sanitize;
pub mod value;

pub use enumeration::{EnumMember, EnumType, EnumValue, IntEnum};
pub use error::EnumError;
pub use sanitize::{invalid_value, sanitize};
pub use value::FieldValue;
