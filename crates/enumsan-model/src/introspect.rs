//! # Field Introspection
//!
//! Finds the fields of a model that carry an enum marker. Bindings are
//! derived on every call from the field table and never stored, so they
//! always reflect the table they were taken from.

use std::iter::FusedIterator;
use std::slice;

use enumsan_core::EnumType;

use crate::field::{EnumMarker, FieldDescriptor};

/// An enum-annotated field.
#[derive(Debug, Clone, Copy)]
pub struct EnumBinding<'a> {
    /// Field name.
    pub name: &'a str,
    /// The field's descriptor.
    pub field: &'a FieldDescriptor,
    /// The marker in effect (the last one attached).
    pub marker: &'a EnumMarker,
}

impl<'a> EnumBinding<'a> {
    /// The bound enumeration.
    pub fn enum_type(&self) -> &'a EnumType {
        self.marker.enum_type()
    }
}

/// Iterator over the enum-annotated fields of a field table, in
/// declaration order. Clone it, or call [`enum_fields`] again, to enumerate
/// twice.
#[derive(Debug, Clone)]
pub struct EnumFields<'a> {
    fields: slice::Iter<'a, FieldDescriptor>,
}

impl<'a> Iterator for EnumFields<'a> {
    type Item = EnumBinding<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.fields.by_ref().find_map(|field| {
            field.markers().last().map(|marker| EnumBinding {
                name: field.name(),
                field,
                marker,
            })
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.fields.size_hint().1)
    }
}

impl FusedIterator for EnumFields<'_> {}

/// Enum-annotated fields of `fields`. Fields without a marker are skipped.
pub fn enum_fields(fields: &[FieldDescriptor]) -> EnumFields<'_> {
    EnumFields {
        fields: fields.iter(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldType, MarkerShape};
    use enumsan_core::{int_enum, IntEnum};

    int_enum! {
        enum Color {
            Red = 1,
            Blue = 2,
        }
    }

    int_enum! {
        enum Size {
            Small = 1,
        }
    }

    fn table() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("user_id", FieldType::Int),
            FieldDescriptor::new("color", FieldType::Str).enum_of::<Color>(),
            FieldDescriptor::new("note", FieldType::Str),
            FieldDescriptor::new("colors", FieldType::list(FieldType::Str)).enum_list_of::<Color>(),
        ]
    }

    #[test]
    fn test_skips_unmarked_fields_in_order() {
        let fields = table();
        let names: Vec<&str> = enum_fields(&fields).map(|b| b.name).collect();
        assert_eq!(names, vec!["color", "colors"]);
    }

    #[test]
    fn test_re_enumerable() {
        let fields = table();
        let iter = enum_fields(&fields);
        assert_eq!(iter.clone().count(), 2);
        assert_eq!(iter.count(), 2);
        assert_eq!(enum_fields(&fields).count(), 2);
    }

    #[test]
    fn test_binding_carries_shape_and_type() {
        let fields = table();
        let binding = enum_fields(&fields).nth(1).unwrap();
        assert_eq!(binding.marker.shape(), MarkerShape::List);
        assert_eq!(binding.enum_type().name(), "Color");
        assert_eq!(binding.field.name(), "colors");
    }

    #[test]
    fn test_last_marker_wins() {
        let fields = vec![FieldDescriptor::new("x", FieldType::Str)
            .enum_of::<Color>()
            .enum_of::<Size>()];
        let binding = enum_fields(&fields).next().unwrap();
        assert_eq!(binding.enum_type(), Size::enum_type().as_ref());
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(enum_fields(&[]).count(), 0);
    }
}
