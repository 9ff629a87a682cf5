//! # Type Coercion
//!
//! The framework step between the pre-parse and post-parse hooks: turns a
//! raw input mapping into a [`Record`] whose values match the declared
//! [`FieldType`]s.
//!
//! ## Rules
//!
//! - Input must be a mapping; anything else is one `model_type` error.
//! - Present fields are coerced; absent fields take their default verbatim
//!   (coerced only with `validate_default`); absent required fields are
//!   `missing`.
//! - Errors are collected across all fields; nothing is returned unless
//!   every field coerced.

use enumsan_core::{EnumType, FieldValue};

use crate::config::ExtraPolicy;
use crate::error::{ErrorDetail, ErrorKind, ValidationError};
use crate::field::FieldType;
use crate::record::Record;
use crate::schema::ModelSchema;

/// Coerce raw input into a record for `schema`.
///
/// # Errors
///
/// Returns every coercion failure in declaration order, followed by
/// `extra_forbidden` errors for undeclared keys under
/// [`ExtraPolicy::Forbid`].
pub fn coerce_input(schema: &ModelSchema, input: FieldValue) -> Result<Record, ValidationError> {
    let FieldValue::Map(mut map) = input else {
        return Err(ValidationError::new(
            schema.title(),
            vec![ErrorDetail::new(
                "",
                ErrorKind::ModelType,
                "Input should be a valid dictionary",
            )],
        ));
    };

    let mut record = Record::new();
    let mut errors = Vec::new();

    for field in schema.fields() {
        let coerced = match map.remove(field.name()) {
            Some(value) => coerce_value(field.field_type(), value, field.name()),
            None => match field.default_value() {
                Some(default) if schema.config().validate_default => {
                    coerce_value(field.field_type(), default.clone(), field.name())
                }
                Some(default) => Ok(default.clone()),
                None => Err(vec![ErrorDetail::new(
                    field.name(),
                    ErrorKind::Missing,
                    "Field required",
                )]),
            },
        };
        match coerced {
            Ok(value) => record.set(field.name(), value),
            Err(details) => errors.extend(details),
        }
    }

    match schema.config().extra {
        ExtraPolicy::Ignore => {}
        ExtraPolicy::Forbid => errors.extend(map.into_keys().map(|key| {
            ErrorDetail::new(key, ErrorKind::ExtraForbidden, "Extra inputs are not permitted")
        })),
        ExtraPolicy::Allow => {
            for (key, value) in map {
                record.set(key, value);
            }
        }
    }

    if errors.is_empty() {
        Ok(record)
    } else {
        Err(ValidationError::new(schema.title(), errors))
    }
}

/// Coerce one value to `ty`, locating failures under `loc`.
///
/// # Errors
///
/// Returns one detail per failing leaf; containers report every failing
/// item.
pub fn coerce_value(
    ty: &FieldType,
    value: FieldValue,
    loc: &str,
) -> Result<FieldValue, Vec<ErrorDetail>> {
    let fail = |kind: ErrorKind, message: String| vec![ErrorDetail::new(loc, kind, message)];

    match ty {
        FieldType::Any => Ok(value),

        FieldType::Optional(inner) => match value {
            FieldValue::None => Ok(FieldValue::None),
            other => coerce_value(inner, other, loc),
        },

        FieldType::Str => match value {
            FieldValue::Str(s) => Ok(FieldValue::Str(s)),
            _ => Err(fail(ErrorKind::StringType, "Input should be a valid string".into())),
        },

        FieldType::Int => match value {
            FieldValue::Int(i) => Ok(FieldValue::Int(i)),
            FieldValue::Member(m) => Ok(FieldValue::Int(m.value())),
            FieldValue::Float(x) if x.is_finite() && x.fract() == 0.0 => {
                // i64::MAX as f64 rounds up to 2^63, which is out of range.
                if x >= i64::MIN as f64 && x < i64::MAX as f64 {
                    Ok(FieldValue::Int(x as i64))
                } else {
                    Err(fail(
                        ErrorKind::IntParsing,
                        "Input should be a valid integer, number out of range".into(),
                    ))
                }
            }
            FieldValue::Float(_) => Err(fail(
                ErrorKind::IntParsing,
                "Input should be a valid integer, got a number with a fractional part".into(),
            )),
            FieldValue::Str(s) => s.trim().parse::<i64>().map(FieldValue::Int).map_err(|_| {
                fail(
                    ErrorKind::IntParsing,
                    "Input should be a valid integer, unable to parse string as an integer".into(),
                )
            }),
            _ => Err(fail(ErrorKind::IntType, "Input should be a valid integer".into())),
        },

        FieldType::Float => match value {
            FieldValue::Float(x) => Ok(FieldValue::Float(x)),
            FieldValue::Int(i) => Ok(FieldValue::Float(i as f64)),
            FieldValue::Str(s) => s.trim().parse::<f64>().map(FieldValue::Float).map_err(|_| {
                fail(
                    ErrorKind::FloatParsing,
                    "Input should be a valid number, unable to parse string as a number".into(),
                )
            }),
            _ => Err(fail(ErrorKind::FloatType, "Input should be a valid number".into())),
        },

        FieldType::Bool => match value {
            FieldValue::Bool(b) => Ok(FieldValue::Bool(b)),
            FieldValue::Int(0) => Ok(FieldValue::Bool(false)),
            FieldValue::Int(1) => Ok(FieldValue::Bool(true)),
            FieldValue::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(FieldValue::Bool(true)),
                "false" | "no" | "off" | "0" => Ok(FieldValue::Bool(false)),
                _ => Err(fail(
                    ErrorKind::BoolParsing,
                    "Input should be a valid boolean, unable to interpret input".into(),
                )),
            },
            FieldValue::Int(_) => Err(fail(
                ErrorKind::BoolParsing,
                "Input should be a valid boolean, unable to interpret input".into(),
            )),
            _ => Err(fail(ErrorKind::BoolType, "Input should be a valid boolean".into())),
        },

        FieldType::Enum(enum_type) => {
            let found = match &value {
                FieldValue::Member(m) => enum_type.by_value(m.value()),
                FieldValue::Int(i) => enum_type.by_value(*i),
                FieldValue::Bool(b) => enum_type.by_value(i64::from(*b)),
                _ => None,
            };
            match found {
                Some(member) => Ok(FieldValue::Int(member.value)),
                None => Err(fail(
                    ErrorKind::Enum,
                    format!("Input should be {}", expected_values(enum_type)),
                )),
            }
        }

        FieldType::List(inner) => match value {
            FieldValue::List(items) | FieldValue::Tuple(items) => {
                coerce_items(items.into_iter().map(|item| (inner.as_ref(), item)), loc)
                    .map(FieldValue::List)
            }
            _ => Err(fail(ErrorKind::ListType, "Input should be a valid list".into())),
        },

        FieldType::Tuple(types) => match value {
            FieldValue::List(items) | FieldValue::Tuple(items) if items.len() == types.len() => {
                coerce_items(types.iter().zip(items), loc).map(FieldValue::Tuple)
            }
            FieldValue::List(items) | FieldValue::Tuple(items) => Err(fail(
                ErrorKind::TupleLength,
                format!(
                    "Tuple should have exactly {} item{}, got {}",
                    types.len(),
                    if types.len() == 1 { "" } else { "s" },
                    items.len()
                ),
            )),
            _ => Err(fail(ErrorKind::TupleType, "Input should be a valid tuple".into())),
        },
    }
}

/// `1, 2 or 3`: the accepted values in declaration order.
fn expected_values(enum_type: &EnumType) -> String {
    let values: Vec<String> = enum_type.members().iter().map(|m| m.value.to_string()).collect();
    match values.split_last() {
        None => format!("a member of {}", enum_type.name()),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
    }
}

fn coerce_items<'a>(
    items: impl Iterator<Item = (&'a FieldType, FieldValue)>,
    loc: &str,
) -> Result<Vec<FieldValue>, Vec<ErrorDetail>> {
    let mut out = Vec::new();
    let mut errors = Vec::new();
    for (i, (ty, item)) in items.enumerate() {
        match coerce_value(ty, item, &format!("{loc}.{i}")) {
            Ok(value) => out.push(value),
            Err(details) => errors.extend(details),
        }
    }
    if errors.is_empty() {
        Ok(out)
    } else {
        Err(errors)
    }
}
