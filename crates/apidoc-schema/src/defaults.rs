//! Default schemas for scalar kinds.

use crate::descriptor::{FloatWidth, IntWidth, TypeDescriptor, TypeKind};
use crate::schema::{Schema, SchemaType};

/// Default schema for a descriptor's kind
///
/// Kinds without a scalar rendition (maps, interfaces, functions, ...)
/// produce an untyped schema.
pub fn default_schema(descriptor: &TypeDescriptor) -> Schema {
    match &descriptor.kind {
        TypeKind::Bool => Schema::new(SchemaType::Boolean),
        TypeKind::Int(width) => int_schema(*width),
        TypeKind::Uint(width) => uint_schema(*width),
        TypeKind::Float(width) => float_schema(*width),
        TypeKind::String => Schema::new(SchemaType::String),
        TypeKind::Array(element, _) if is_uuid(descriptor, element) => {
            Schema::string_with_format("uuid")
        }
        _ => Schema::default(),
    }
}

/// Whether a fixed-size byte array is a UUID by name
pub(crate) fn is_uuid(descriptor: &TypeDescriptor, element: &TypeDescriptor) -> bool {
    element.is_byte()
        && descriptor
            .name
            .as_deref()
            .map(|name| name.eq_ignore_ascii_case("uuid"))
            .unwrap_or(false)
}

pub(crate) fn int_schema(width: IntWidth) -> Schema {
    let integer = Schema::new(SchemaType::Integer);
    match width {
        IntWidth::W8 => integer.with_bounds(i8::MIN as f64, i8::MAX as f64),
        IntWidth::W16 => integer.with_bounds(i16::MIN as f64, i16::MAX as f64),
        IntWidth::W32 => integer
            .with_format("int32")
            .with_bounds(i32::MIN as f64, i32::MAX as f64),
        IntWidth::W64 => integer
            .with_format("int64")
            .with_bounds(i64::MIN as f64, i64::MAX as f64),
        IntWidth::Size => integer.with_bounds(isize::MIN as f64, isize::MAX as f64),
    }
}

pub(crate) fn uint_schema(width: IntWidth) -> Schema {
    let max = match width {
        IntWidth::W8 => u8::MAX as f64,
        IntWidth::W16 => u16::MAX as f64,
        IntWidth::W32 => u32::MAX as f64,
        IntWidth::W64 => u64::MAX as f64,
        IntWidth::Size => usize::MAX as f64,
    };
    Schema::new(SchemaType::Integer).with_bounds(0.0, max)
}

pub(crate) fn float_schema(width: FloatWidth) -> Schema {
    let number = Schema::new(SchemaType::Number);
    match width {
        FloatWidth::W32 => number
            .with_format("float")
            .with_bounds(-(f32::MAX as f64), f32::MAX as f64),
        FloatWidth::W64 => number.with_format("double").with_bounds(-f64::MAX, f64::MAX),
    }
}
