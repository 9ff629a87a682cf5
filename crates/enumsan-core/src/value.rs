//! # Field Values
//!
//! [`FieldValue`] is the dynamic value tree that flows through model
//! validation: raw input before coercion, coerced record entries after it,
//! and field defaults.
//!
//! It extends the JSON data model with two shapes JSON cannot express:
//! enumeration members ([`FieldValue::Member`]) and fixed-arity tuples
//! ([`FieldValue::Tuple`]). Both collapse on serialization: a member is
//! written as its name and a tuple as an array.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::enumeration::EnumValue;

/// A dynamic field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent value (`null`).
    None,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// String.
    Str(String),
    /// A member of an integer-backed enumeration.
    Member(EnumValue),
    /// Variable-length sequence.
    List(Vec<FieldValue>),
    /// Fixed-arity sequence.
    Tuple(Vec<FieldValue>),
    /// String-keyed mapping.
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Build a tuple from its elements.
    pub fn tuple<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a list from its elements.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a mapping from key/value pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns true for [`FieldValue::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The mapping payload, if this is a mapping.
    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// The mutable mapping payload, if this is a mapping.
    pub fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, FieldValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Member(_) => "enum member",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "dict",
        }
    }

    /// Convert to JSON. Members become their names, tuples become arrays,
    /// and non-finite floats become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::None => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Str(s) => Value::String(s.clone()),
            Self::Member(m) => Value::String(m.name().to_string()),
            Self::List(items) | Self::Tuple(items) => {
                Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Render the way the value prints inside a container: strings quoted.
    pub fn repr(&self) -> Repr<'_> {
        Repr(self)
    }
}

/// Display adapter that quotes strings; see [`FieldValue::repr`].
pub struct Repr<'a>(&'a FieldValue);

impl fmt::Display for Repr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            FieldValue::Str(s) => write!(f, "'{s}'"),
            other => write!(f, "{other}"),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[FieldValue]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item.repr())?;
    }
    Ok(())
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => f.write_str(s),
            Self::Member(m) => write!(f, "{m}"),
            Self::List(items) => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
            Self::Tuple(items) => {
                f.write_str("(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{k}': {}", v.repr())?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::Str(s) => serializer.serialize_str(s),
            Self::Member(m) => serializer.serialize_str(m.name()),
            Self::List(items) | Self::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::None,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Self::Int(i),
                // Above i64::MAX: kept as a float so integer coercion rejects
                // it instead of wrapping.
                (None, Some(u)) => Self::Float(u as f64),
                (None, None) => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::Str(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        Self::from(value.clone())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<EnumValue> for FieldValue {
    fn from(m: EnumValue) -> Self {
        Self::Member(m)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl<A: Into<FieldValue>, B: Into<FieldValue>> From<(A, B)> for FieldValue {
    fn from((a, b): (A, B)) -> Self {
        Self::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<FieldValue>, B: Into<FieldValue>, C: Into<FieldValue>> From<(A, B, C)>
    for FieldValue
{
    fn from((a, b, c): (A, B, C)) -> Self {
        Self::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_maps_shapes() {
        let value = FieldValue::from(json!({"a": [1, "x", null], "b": 1.5, "c": true}));
        let map = value.as_map().unwrap();
        assert_eq!(
            map["a"],
            FieldValue::List(vec![
                FieldValue::Int(1),
                FieldValue::Str("x".into()),
                FieldValue::None
            ])
        );
        assert_eq!(map["b"], FieldValue::Float(1.5));
        assert_eq!(map["c"], FieldValue::Bool(true));
    }

    #[test]
    fn test_integral_json_number_stays_int_but_float_literal_is_float() {
        assert_eq!(FieldValue::from(json!(2)), FieldValue::Int(2));
        assert_eq!(FieldValue::from(json!(2.0)), FieldValue::Float(2.0));
    }

    #[test]
    fn test_json_number_above_i64_range_is_float() {
        let value = FieldValue::from(json!(u64::MAX));
        assert_eq!(value, FieldValue::Float(u64::MAX as f64));
        let value = FieldValue::from(json!(i64::MAX as u64 + 1));
        assert!(matches!(value, FieldValue::Float(x) if x >= i64::MAX as f64));
    }

    #[test]
    fn test_member_and_tuple_serialize_as_name_and_array() {
        let value = FieldValue::map([
            ("color", FieldValue::Member(EnumValue::new("Color", "BLUE", 2))),
            ("pair", FieldValue::tuple(["RED", "GREEN"])),
        ]);
        let expected = json!({"color": "BLUE", "pair": ["RED", "GREEN"]});
        assert_eq!(serde_json::to_value(&value).unwrap(), expected);
        assert_eq!(value.to_json(), expected);
    }

    #[test]
    fn test_display_renders_like_the_input_language() {
        assert_eq!(FieldValue::from("YELLOW").to_string(), "YELLOW");
        assert_eq!(FieldValue::None.to_string(), "None");
        assert_eq!(FieldValue::Float(2.0).to_string(), "2.0");
        assert_eq!(
            FieldValue::list([FieldValue::from("RED"), FieldValue::Int(7)]).to_string(),
            "['RED', 7]"
        );
        assert_eq!(FieldValue::from(("BLUE", 1)).to_string(), "('BLUE', 1)");
        assert_eq!(FieldValue::tuple([1]).to_string(), "(1,)");
        assert_eq!(
            FieldValue::map([("k", "v")]).to_string(),
            "{'k': 'v'}"
        );
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(FieldValue::from(None::<i64>), FieldValue::None);
        assert_eq!(FieldValue::from(Some("a")), FieldValue::Str("a".into()));
    }
}
