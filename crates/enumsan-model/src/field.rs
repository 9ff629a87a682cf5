//! # Field Descriptors
//!
//! Per-field metadata of a model: declared type, default, description,
//! title, schema extensions, and the enum markers that bind an enumeration
//! to the field.
//!
//! A descriptor is assembled with the builder-style `with_*` methods while a
//! [`ModelSchema`](crate::ModelSchema) is defined. Once the schema is built
//! the descriptor is only reachable through shared references.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use enumsan_core::{EnumType, FieldValue, IntEnum};
use serde_json::{Map, Value};

use crate::error::FieldTypeError;

/// Declared type of a field, as the coercion step understands it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Any value, passed through unchanged.
    Any,
    /// String.
    Str,
    /// Integer.
    Int,
    /// Floating-point number.
    Float,
    /// Boolean.
    Bool,
    /// The inner type or `None`.
    Optional(Box<FieldType>),
    /// Variable-length list of the inner type.
    List(Box<FieldType>),
    /// Fixed-arity tuple, one type per position.
    Tuple(Vec<FieldType>),
    /// A member of the enumeration, validated and stored by integer value.
    Enum(Arc<EnumType>),
}

impl FieldType {
    /// `optional[inner]`.
    pub fn optional(inner: FieldType) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// `list[inner]`.
    pub fn list(inner: FieldType) -> Self {
        Self::List(Box::new(inner))
    }

    /// `tuple[items..]`.
    pub fn tuple(items: impl IntoIterator<Item = FieldType>) -> Self {
        Self::Tuple(items.into_iter().collect())
    }

    /// A field holding a member of `E`.
    pub fn enumeration<E: IntEnum>() -> Self {
        Self::Enum(E::enum_type())
    }

    /// Parse like [`FromStr`], resolving names that are not built-in types
    /// through `resolve_enum`. Enumeration names are case-sensitive.
    pub fn parse_with<F>(s: &str, resolve_enum: F) -> Result<Self, FieldTypeError>
    where
        F: Fn(&str) -> Option<Arc<EnumType>>,
    {
        parse_type(s, &resolve_enum).map_err(|reason| FieldTypeError {
            input: s.to_string(),
            reason,
        })
    }

    /// Returns true if `None` is an accepted value.
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_) | Self::Any)
    }

    /// The container shape an enum marker on this type should have.
    pub fn marker_shape(&self) -> MarkerShape {
        match self {
            Self::Optional(inner) => inner.marker_shape(),
            Self::List(_) => MarkerShape::List,
            Self::Tuple(items) => MarkerShape::Tuple(items.len()),
            Self::Any | Self::Str | Self::Int | Self::Float | Self::Bool | Self::Enum(_) => {
                MarkerShape::Scalar
            }
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Str => f.write_str("str"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Bool => f.write_str("bool"),
            Self::Enum(ty) => f.write_str(ty.name()),
            Self::Optional(inner) => write!(f, "optional[{inner}]"),
            Self::List(inner) => write!(f, "list[{inner}]"),
            Self::Tuple(items) => {
                f.write_str("tuple[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl FromStr for FieldType {
    type Err = FieldTypeError;

    /// Parse `str`, `int`, `float`, `bool`, `any`, `optional[T]`, `T | None`,
    /// `list[T]`, and `tuple[T, ..]`. Generic names are case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, |_| None)
    }
}

fn parse_type(
    s: &str,
    resolve_enum: &dyn Fn(&str) -> Option<Arc<EnumType>>,
) -> Result<FieldType, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty type".to_string());
    }

    if let Some(rest) = s.strip_suffix("None") {
        if let Some(inner) = rest.trim_end().strip_suffix('|') {
            return Ok(FieldType::optional(parse_type(inner, resolve_enum)?));
        }
    }

    let Some(open) = s.find('[') else {
        return match s.to_ascii_lowercase().as_str() {
            "str" | "string" => Ok(FieldType::Str),
            "int" | "integer" => Ok(FieldType::Int),
            "float" | "number" => Ok(FieldType::Float),
            "bool" | "boolean" => Ok(FieldType::Bool),
            "any" => Ok(FieldType::Any),
            _ => resolve_enum(s)
                .map(FieldType::Enum)
                .ok_or_else(|| format!("unknown type name {s:?}")),
        };
    };

    let body = s[open + 1..]
        .strip_suffix(']')
        .ok_or_else(|| "missing closing ']'".to_string())?;
    let mut args = split_args(body)?
        .into_iter()
        .map(|arg| parse_type(arg, resolve_enum))
        .collect::<Result<Vec<_>, _>>()?;

    let head = s[..open].trim().to_ascii_lowercase();
    match (head.as_str(), args.len()) {
        ("optional", 1) => Ok(FieldType::optional(args.remove(0))),
        ("list", 1) => Ok(FieldType::list(args.remove(0))),
        ("tuple", n) if n > 0 => Ok(FieldType::Tuple(args)),
        ("optional" | "list", n) => Err(format!("{head} takes exactly one argument, got {n}")),
        (other, _) => Err(format!("unknown generic {other:?}")),
    }
}

/// Split on top-level commas.
fn split_args(body: &str) -> Result<Vec<&str>, String> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced ']'".to_string())?;
            }
            ',' if depth == 0 => {
                args.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced '['".to_string());
    }
    args.push(&body[start..]);
    Ok(args)
}

/// Container shape of an enum marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// A single member, e.g. `Color`.
    Scalar,
    /// A list of members, e.g. `list[Color]`.
    List,
    /// A fixed tuple of members, e.g. `tuple[Color, Color]`.
    Tuple(usize),
}

impl fmt::Display for MarkerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("scalar"),
            Self::List => f.write_str("list"),
            Self::Tuple(n) => write!(f, "tuple({n})"),
        }
    }
}

/// Binds an integer-backed enumeration to a field.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMarker {
    enum_type: Arc<EnumType>,
    shape: MarkerShape,
}

impl EnumMarker {
    /// A marker with an explicit shape.
    pub fn new(enum_type: Arc<EnumType>, shape: MarkerShape) -> Self {
        Self { enum_type, shape }
    }

    /// Marker for a scalar field of `E`.
    pub fn of<E: IntEnum>() -> Self {
        Self::new(E::enum_type(), MarkerShape::Scalar)
    }

    /// Marker for a list of `E`.
    pub fn list_of<E: IntEnum>() -> Self {
        Self::new(E::enum_type(), MarkerShape::List)
    }

    /// Marker for a tuple of `arity` values of `E`.
    pub fn tuple_of<E: IntEnum>(arity: usize) -> Self {
        Self::new(E::enum_type(), MarkerShape::Tuple(arity))
    }

    /// The bound enumeration.
    pub fn enum_type(&self) -> &Arc<EnumType> {
        &self.enum_type
    }

    /// The container shape.
    pub fn shape(&self) -> MarkerShape {
        self.shape
    }
}

/// Metadata of one model field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
    default: Option<FieldValue>,
    description: Option<String>,
    title: Option<String>,
    extensions: Map<String, Value>,
    markers: Vec<EnumMarker>,
}

impl FieldDescriptor {
    /// A required field with no metadata.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            default: None,
            description: None,
            title: None,
            extensions: Map::new(),
            markers: Vec::new(),
        }
    }

    /// Default used when the input omits the field. Makes the field optional
    /// in the input.
    pub fn with_default(mut self, default: impl Into<FieldValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Schema title; derived from the name when unset.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Extra key merged into the field's generated schema.
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Attach an enum marker. When several are attached the last one wins.
    pub fn marker(mut self, marker: EnumMarker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Attach a scalar marker for `E`.
    pub fn enum_of<E: IntEnum>(self) -> Self {
        self.marker(EnumMarker::of::<E>())
    }

    /// Attach a list marker for `E`.
    pub fn enum_list_of<E: IntEnum>(self) -> Self {
        self.marker(EnumMarker::list_of::<E>())
    }

    /// Attach a tuple marker for `E`.
    pub fn enum_tuple_of<E: IntEnum>(self, arity: usize) -> Self {
        self.marker(EnumMarker::tuple_of::<E>(arity))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn default_value(&self) -> Option<&FieldValue> {
        self.default.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn extensions(&self) -> &Map<String, Value> {
        &self.extensions
    }

    pub fn markers(&self) -> &[EnumMarker] {
        &self.markers
    }

    /// A field is required when it has no default.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Explicit title, or the name with underscores as spaces and each word
    /// capitalized (`user_id` → `User Id`).
    pub fn title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => title_case(&self.name),
        }
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = Some(description);
    }

    pub(crate) fn set_extension(&mut self, key: &str, value: Value) {
        self.extensions.insert(key.to_string(), value);
    }
}

fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use enumsan_core::EnumMember;

    #[test]
    fn test_parse_scalars_and_generics() {
        assert_eq!("str".parse::<FieldType>().unwrap(), FieldType::Str);
        assert_eq!(
            "optional[str]".parse::<FieldType>().unwrap(),
            FieldType::optional(FieldType::Str)
        );
        assert_eq!(
            "str | None".parse::<FieldType>().unwrap(),
            FieldType::optional(FieldType::Str)
        );
        assert_eq!(
            "list[str]".parse::<FieldType>().unwrap(),
            FieldType::list(FieldType::Str)
        );
        assert_eq!(
            "tuple[str, int]".parse::<FieldType>().unwrap(),
            FieldType::tuple([FieldType::Str, FieldType::Int])
        );
        assert_eq!(
            "List[tuple[str, str]] | None".parse::<FieldType>().unwrap(),
            FieldType::optional(FieldType::list(FieldType::tuple([
                FieldType::Str,
                FieldType::Str
            ])))
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("".parse::<FieldType>().is_err());
        assert!("colour".parse::<FieldType>().is_err());
        assert!("list[str".parse::<FieldType>().is_err());
        assert!("list[str, int]".parse::<FieldType>().is_err());
        assert!("dict[str]".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_parse_with_resolves_enum_names() {
        let priority = Arc::new(
            EnumType::new(
                "Priority",
                [EnumMember::new("LOW", 1), EnumMember::new("HIGH", 2)],
            )
            .unwrap(),
        );
        let resolve = |name: &str| (name == "Priority").then(|| priority.clone());

        let ty = FieldType::parse_with("optional[Priority]", resolve).unwrap();
        assert_eq!(ty, FieldType::optional(FieldType::Enum(priority.clone())));
        assert_eq!(ty.to_string(), "optional[Priority]");
        assert_eq!(ty.marker_shape(), MarkerShape::Scalar);

        assert_eq!(FieldType::parse_with("int", resolve).unwrap(), FieldType::Int);
        assert!(FieldType::parse_with("priority", resolve).is_err());
        assert!("Priority".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        let ty = FieldType::optional(FieldType::tuple([
            FieldType::Str,
            FieldType::list(FieldType::Int),
        ]));
        assert_eq!(ty.to_string(), "optional[tuple[str, list[int]]]");
        assert_eq!(ty.to_string().parse::<FieldType>().unwrap(), ty);
    }

    #[test]
    fn test_marker_shape_follows_container() {
        assert_eq!(FieldType::Str.marker_shape(), MarkerShape::Scalar);
        assert_eq!(
            FieldType::optional(FieldType::list(FieldType::Str)).marker_shape(),
            MarkerShape::List
        );
        assert_eq!(
            FieldType::tuple([FieldType::Str, FieldType::Str]).marker_shape(),
            MarkerShape::Tuple(2)
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(FieldDescriptor::new("user_id", FieldType::Int).title(), "User Id");
        assert_eq!(FieldDescriptor::new("color", FieldType::Str).title(), "Color");
        assert_eq!(
            FieldDescriptor::new("color", FieldType::Str)
                .with_title("Colour")
                .title(),
            "Colour"
        );
    }

    #[test]
    fn test_required_iff_no_default() {
        let required = FieldDescriptor::new("a", FieldType::optional(FieldType::Str));
        assert!(required.is_required());
        let defaulted = required.with_default(FieldValue::None);
        assert!(!defaulted.is_required());
    }
}
