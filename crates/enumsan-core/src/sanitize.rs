//! # Enum Sanitizer
//!
//! Maps a raw field value onto the canonical name-string form of an
//! integer-backed enumeration.
//!
//! | Input | Result |
//! |-------|--------|
//! | member of the target enumeration | its name |
//! | member of another enumeration | treated as its integer value |
//! | integer | name of the member with that value |
//! | boolean | as the integer `0` or `1` |
//! | string | the same string, if it names a member |
//! | list / tuple | element-wise, shape and order preserved |
//! | `None` | `None` |
//! | anything else | [`EnumError::InvalidValue`] |
//!
//! One unresolvable leaf fails the whole value, and the error reports the
//! value that was passed in, not the leaf.

use crate::enumeration::EnumType;
use crate::error::EnumError;
use crate::value::FieldValue;

/// Sanitize `value` against `enum_type`.
///
/// Idempotent: sanitizing an already sanitized value returns it unchanged.
///
/// # Errors
///
/// Returns [`EnumError::InvalidValue`] when any scalar leaf does not resolve
/// to a member.
pub fn sanitize(value: &FieldValue, enum_type: &EnumType) -> Result<FieldValue, EnumError> {
    resolve(value, enum_type).ok_or_else(|| invalid_value(value, enum_type))
}

/// Build the invalid-value error for `value`.
pub fn invalid_value(value: &FieldValue, enum_type: &EnumType) -> EnumError {
    EnumError::InvalidValue {
        value: value.to_string(),
        choices: enum_type.choices(),
    }
}

fn resolve(value: &FieldValue, enum_type: &EnumType) -> Option<FieldValue> {
    match value {
        FieldValue::None => Some(FieldValue::None),
        FieldValue::Member(member) if enum_type.contains(member) => {
            Some(FieldValue::Str(member.name().to_string()))
        }
        FieldValue::Member(member) => by_value(member.value(), enum_type),
        FieldValue::Int(i) => by_value(*i, enum_type),
        FieldValue::Bool(b) => by_value(i64::from(*b), enum_type),
        FieldValue::Str(s) => enum_type
            .by_name(s)
            .map(|m| FieldValue::Str(m.name.clone())),
        FieldValue::List(items) => resolve_all(items, enum_type).map(FieldValue::List),
        FieldValue::Tuple(items) => resolve_all(items, enum_type).map(FieldValue::Tuple),
        FieldValue::Float(_) | FieldValue::Map(_) => None,
    }
}

fn by_value(value: i64, enum_type: &EnumType) -> Option<FieldValue> {
    enum_type
        .by_value(value)
        .map(|m| FieldValue::Str(m.name.clone()))
}

fn resolve_all(items: &[FieldValue], enum_type: &EnumType) -> Option<Vec<FieldValue>> {
    items.iter().map(|item| resolve(item, enum_type)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumeration::{EnumMember, EnumValue, IntEnum};

    crate::int_enum! {
        #[allow(non_camel_case_types)]
        enum Color {
            RED = 1,
            BLUE = 2,
            GREEN = 3,
        }
    }

    crate::int_enum! {
        enum Size {
            Small = 1,
            Huge = 9,
        }
    }

    fn color() -> std::sync::Arc<EnumType> {
        Color::enum_type()
    }

    fn name(s: &str) -> FieldValue {
        FieldValue::Str(s.to_string())
    }

    #[test]
    fn test_member_value_and_name_all_map_to_name() {
        let ty = color();
        for variant in Color::variants() {
            let expected = name(variant.name());
            assert_eq!(sanitize(&FieldValue::from(*variant), &ty).unwrap(), expected);
            assert_eq!(sanitize(&FieldValue::Int(variant.value()), &ty).unwrap(), expected);
            assert_eq!(sanitize(&name(variant.name()), &ty).unwrap(), expected);
        }
    }

    #[test]
    fn test_none_passes_through() {
        assert_eq!(sanitize(&FieldValue::None, &color()).unwrap(), FieldValue::None);
    }

    #[test]
    fn test_unknown_name_message_lists_members_in_order() {
        let err = sanitize(&name("YELLOW"), &color()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid enum value: YELLOW. Must be one of: RED (1), BLUE (2), GREEN (3)"
        );
    }

    #[test]
    fn test_unknown_integer_fails() {
        let err = sanitize(&FieldValue::Int(666), &color()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid enum value: 666. "));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!(sanitize(&name("blue"), &color()).is_err());
    }

    #[test]
    fn test_wrong_types_fail() {
        let ty = color();
        assert!(sanitize(&FieldValue::Float(2.0), &ty).is_err());
        assert!(sanitize(&FieldValue::map([("BLUE", 2)]), &ty).is_err());
    }

    #[test]
    fn test_bool_resolves_as_integer() {
        let ty = color();
        assert_eq!(sanitize(&FieldValue::Bool(true), &ty).unwrap(), name("RED"));
        let err = sanitize(&FieldValue::Bool(false), &ty).unwrap_err();
        assert!(err.to_string().starts_with("Invalid enum value: False. "));
    }

    #[test]
    fn test_list_preserves_order() {
        let raw = FieldValue::list([
            FieldValue::from(Color::GREEN),
            FieldValue::Int(1),
            name("BLUE"),
        ]);
        assert_eq!(
            sanitize(&raw, &color()).unwrap(),
            FieldValue::list(["GREEN", "RED", "BLUE"])
        );
    }

    #[test]
    fn test_tuple_preserves_shape() {
        let raw = FieldValue::from((Color::RED, Color::GREEN));
        assert_eq!(
            sanitize(&raw, &color()).unwrap(),
            FieldValue::tuple(["RED", "GREEN"])
        );
    }

    #[test]
    fn test_mixed_tuple_of_scalars_is_sanitized() {
        let raw = FieldValue::from(("BLUE", 1));
        assert_eq!(
            sanitize(&raw, &color()).unwrap(),
            FieldValue::tuple(["BLUE", "RED"])
        );
    }

    #[test]
    fn test_one_bad_element_fails_container_and_reports_container() {
        let raw = FieldValue::list([FieldValue::Int(1), FieldValue::Int(42)]);
        let err = sanitize(&raw, &color()).unwrap_err();
        assert_eq!(
            err,
            EnumError::InvalidValue {
                value: "[1, 42]".to_string(),
                choices: "RED (1), BLUE (2), GREEN (3)".to_string(),
            }
        );
    }

    #[test]
    fn test_nested_containers() {
        let raw = FieldValue::list([FieldValue::tuple([1, 2]), FieldValue::tuple([3, 1])]);
        assert_eq!(
            sanitize(&raw, &color()).unwrap(),
            FieldValue::list([
                FieldValue::tuple(["RED", "BLUE"]),
                FieldValue::tuple(["GREEN", "RED"]),
            ])
        );
    }

    #[test]
    fn test_member_of_other_enum_resolves_by_value() {
        let ty = color();
        assert_eq!(sanitize(&FieldValue::from(Size::Small), &ty).unwrap(), name("RED"));
        let err = sanitize(&FieldValue::from(Size::Huge), &ty).unwrap_err();
        assert!(err.to_string().starts_with("Invalid enum value: 9."));
    }

    #[test]
    fn test_forged_member_of_same_enum_falls_back_to_value() {
        let forged = FieldValue::Member(EnumValue::new("Color", "RED", 3));
        assert_eq!(sanitize(&forged, &color()).unwrap(), name("GREEN"));
    }

    #[test]
    fn test_runtime_enum_type() {
        let ty = EnumType::new(
            "Status",
            [EnumMember::new("PENDING", 1), EnumMember::new("APPROVED", 2)],
        )
        .unwrap();
        assert_eq!(sanitize(&FieldValue::Int(2), &ty).unwrap(), name("APPROVED"));
        let err = sanitize(&FieldValue::Int(666), &ty).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid enum value: 666. Must be one of: PENDING (1), APPROVED (2)"
        );
    }
}
