//! # Integer-Backed Enumerations
//!
//! Defines [`EnumType`], the runtime descriptor of a closed, ordered set of
//! named integer constants, and [`IntEnum`], implemented by Rust enums
//! declared through [`int_enum!`](crate::int_enum).
//!
//! ## Invariants
//!
//! - Member names are unique within an enumeration.
//! - Member values are unique within an enumeration.
//! - Declaration order is preserved and is the order used by every
//!   rendering (error messages, descriptions, schema `enum` lists).
//!
//! Runtime descriptors (loaded from definition files) are checked by
//! [`EnumType::new`]. Static enumerations get the same guarantees from the
//! compiler: variant names cannot repeat and `#[repr(i64)]` discriminants
//! cannot collide.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::EnumError;

/// One named constant of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumMember {
    /// Member name, e.g. `"RED"`.
    pub name: String,
    /// Underlying integer value, e.g. `1`.
    pub value: i64,
}

impl EnumMember {
    /// Create a member.
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Wire form of [`EnumType`], validated on the way in.
#[derive(Deserialize)]
struct EnumTypeRepr {
    name: String,
    members: Vec<EnumMember>,
}

/// Descriptor of an integer-backed enumeration.
///
/// Shared as `Arc<EnumType>` by field markers; never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EnumTypeRepr")]
pub struct EnumType {
    name: String,
    members: Vec<EnumMember>,
}

impl TryFrom<EnumTypeRepr> for EnumType {
    type Error = EnumError;

    fn try_from(repr: EnumTypeRepr) -> Result<Self, Self::Error> {
        Self::new(repr.name, repr.members)
    }
}

impl EnumType {
    /// Build a descriptor, rejecting empty names and duplicate names or values.
    ///
    /// # Errors
    ///
    /// Returns [`EnumError::EmptyName`], [`EnumError::DuplicateName`], or
    /// [`EnumError::DuplicateValue`].
    pub fn new(
        name: impl Into<String>,
        members: impl IntoIterator<Item = EnumMember>,
    ) -> Result<Self, EnumError> {
        let name = name.into();
        let members: Vec<EnumMember> = members.into_iter().collect();

        if name.is_empty() || members.iter().any(|m| m.name.is_empty()) {
            return Err(EnumError::EmptyName { enum_name: name });
        }

        for (i, member) in members.iter().enumerate() {
            for earlier in &members[..i] {
                if earlier.name == member.name {
                    return Err(EnumError::DuplicateName {
                        enum_name: name,
                        name: member.name.clone(),
                    });
                }
                if earlier.value == member.value {
                    return Err(EnumError::DuplicateValue {
                        enum_name: name,
                        value: member.value,
                    });
                }
            }
        }

        Ok(Self { name, members })
    }

    /// Build a descriptor for an enumeration the compiler already checked.
    ///
    /// Used by [`int_enum!`](crate::int_enum); not part of the public API.
    #[doc(hidden)]
    pub fn from_declared(name: &'static str, members: &[(&'static str, i64)]) -> Self {
        Self {
            name: name.to_string(),
            members: members
                .iter()
                .map(|(n, v)| EnumMember::new(*n, *v))
                .collect(),
        }
    }

    /// The enumeration's name, e.g. `"Color"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All members in declaration order.
    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    /// Member names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(|m| m.name.as_str())
    }

    /// Find the member with the given integer value.
    pub fn by_value(&self, value: i64) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.value == value)
    }

    /// Find the member with the given name. Case-sensitive.
    pub fn by_name(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Returns true if `member` is one of this enumeration's members.
    pub fn contains(&self, member: &EnumValue) -> bool {
        member.enum_name == self.name
            && self
                .by_name(&member.name)
                .is_some_and(|m| m.value == member.value)
    }

    /// A member value of this enumeration, looked up by name.
    pub fn member(&self, name: &str) -> Option<EnumValue> {
        self.by_name(name)
            .map(|m| EnumValue::new(self.name.clone(), m.name.clone(), m.value))
    }

    /// `NAME (value)` for every member, comma-separated.
    pub fn choices(&self) -> String {
        self.members
            .iter()
            .map(|m| format!("{} ({})", m.name, m.value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Human-readable field description: `Enum values: RED, BLUE, GREEN`.
    pub fn describe(&self) -> String {
        format!("Enum values: {}", self.names().collect::<Vec<_>>().join(", "))
    }
}

impl fmt::Display for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A member of a named enumeration, carried as a raw input value.
///
/// This is the "member itself" input form: it remembers which enumeration it
/// came from so the sanitizer can tell a member of the target enumeration
/// from a member of some other enumeration with the same integer value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    enum_name: String,
    name: String,
    value: i64,
}

impl EnumValue {
    /// Create a member value.
    pub fn new(enum_name: impl Into<String>, name: impl Into<String>, value: i64) -> Self {
        Self {
            enum_name: enum_name.into(),
            name: name.into(),
            value,
        }
    }

    /// The owning enumeration's name.
    pub fn enum_name(&self) -> &str {
        &self.enum_name
    }

    /// The member name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The member's integer value.
    pub fn value(&self) -> i64 {
        self.value
    }
}

/// Renders the integer value, the way an integer-backed member formats.
impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A Rust enum whose variants are the members of an integer-backed
/// enumeration.
///
/// Implement through [`int_enum!`](crate::int_enum) rather than by hand.
pub trait IntEnum: Copy + Sized + 'static {
    /// The shared runtime descriptor, built once.
    fn enum_type() -> Arc<EnumType>;

    /// Every variant in declaration order.
    fn variants() -> &'static [Self];

    /// The member name.
    fn name(self) -> &'static str;

    /// The member's integer value.
    fn value(self) -> i64;

    /// This variant as a raw input value.
    fn member(self) -> EnumValue {
        EnumValue::new(Self::enum_type().name(), self.name(), self.value())
    }

    /// Look a variant up by integer value.
    fn from_value(value: i64) -> Option<Self> {
        Self::variants().iter().copied().find(|v| v.value() == value)
    }

    /// Look a variant up by name.
    fn from_name(name: &str) -> Option<Self> {
        Self::variants().iter().copied().find(|v| v.name() == name)
    }
}

/// Declare an integer-backed enumeration.
///
/// Generates a `#[repr(i64)]` enum deriving `Debug`, `Clone`, `Copy`,
/// `PartialEq`, `Eq`, and `Hash`, an [`IntEnum`] implementation, and a
/// conversion into [`FieldValue`](crate::FieldValue).
///
/// ```
/// use enumsan_core::{int_enum, IntEnum};
///
/// int_enum! {
///     pub enum Color {
///         Red = 1,
///         Blue = 2,
///     }
/// }
///
/// assert_eq!(Color::Blue.value(), 2);
/// assert_eq!(Color::enum_type().describe(), "Enum values: Red, Blue");
/// ```
#[macro_export]
macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i64)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $value ),+
        }

        impl $crate::IntEnum for $name {
            fn enum_type() -> ::std::sync::Arc<$crate::EnumType> {
                static TYPE: ::std::sync::OnceLock<::std::sync::Arc<$crate::EnumType>> =
                    ::std::sync::OnceLock::new();
                TYPE.get_or_init(|| {
                    ::std::sync::Arc::new($crate::EnumType::from_declared(
                        stringify!($name),
                        &[$( (stringify!($variant), $value) ),+],
                    ))
                })
                .clone()
            }

            fn variants() -> &'static [Self] {
                &[$( Self::$variant ),+]
            }

            fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant) ),+
                }
            }

            fn value(self) -> i64 {
                self as i64
            }
        }

        impl ::std::convert::From<$name> for $crate::FieldValue {
            fn from(member: $name) -> Self {
                $crate::FieldValue::Member($crate::IntEnum::member(member))
            }
        }
    };
}
