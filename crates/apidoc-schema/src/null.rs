/*!
Nullable scalar wrappers.

A null-wrapper is a composite named `Null<X>` holding exactly a `Valid`
boolean and an `<X>` value field; an alias is a composite whose single field
is named `Null<X>` and holds such a wrapper. Both document as the plain
scalar with `nullable: true`. Names compare case-insensitively with
underscores ignored, so `NullString { string, valid }` qualifies.

This module also ships ready-made wrappers ([`NullString`], [`NullInt64`],
...) that serialize as the value or `null`.
*/

use crate::defaults::{float_schema, int_schema};
use crate::descriptor::{FieldDescriptor, FloatWidth, IntWidth, TypeDescriptor, TypeKind};
use crate::describe::Describe;
use crate::schema::{Schema, SchemaType};
use crate::tags::normalize_name;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The scalar a null-wrapper carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullWrapper {
    Uuid,
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    Float64,
    Time,
    String,
}

impl NullWrapper {
    /// Every wrapper, in detection order
    pub const ALL: [NullWrapper; 9] = [
        NullWrapper::Uuid,
        NullWrapper::Bool,
        NullWrapper::Byte,
        NullWrapper::Int16,
        NullWrapper::Int32,
        NullWrapper::Int64,
        NullWrapper::Float64,
        NullWrapper::Time,
        NullWrapper::String,
    ];

    /// Name of the value field (`X` in `Null<X>`)
    pub fn value_field(self) -> &'static str {
        match self {
            NullWrapper::Uuid => "UUID",
            NullWrapper::Bool => "Bool",
            NullWrapper::Byte => "Byte",
            NullWrapper::Int16 => "Int16",
            NullWrapper::Int32 => "Int32",
            NullWrapper::Int64 => "Int64",
            NullWrapper::Float64 => "Float64",
            NullWrapper::Time => "Time",
            NullWrapper::String => "String",
        }
    }

    /// Normalized wrapper type name, e.g. `nullstring`
    fn wrapper_name(self) -> String {
        format!("null{}", normalize_name(self.value_field()))
    }

    /// Schema of the carried scalar, always nullable
    pub fn schema(self) -> Schema {
        let mut schema = match self {
            NullWrapper::Uuid => Schema::string_with_format("uuid"),
            NullWrapper::Bool => Schema::new(SchemaType::Boolean),
            NullWrapper::Byte => Schema::string_with_format("byte"),
            NullWrapper::Int16 => int_schema(IntWidth::W16),
            NullWrapper::Int32 => int_schema(IntWidth::W32),
            NullWrapper::Int64 => int_schema(IntWidth::W64),
            NullWrapper::Float64 => float_schema(FloatWidth::W64),
            NullWrapper::Time => Schema::string_with_format("date-time"),
            NullWrapper::String => Schema::new(SchemaType::String),
        };
        schema.nullable = true;
        schema
    }

    /// Detect a null-wrapper or a null-wrapper alias
    pub fn detect(descriptor: &TypeDescriptor) -> Option<NullWrapper> {
        Self::ALL
            .into_iter()
            .find(|wrapper| wrapper.matches(descriptor) || wrapper.matches_alias(descriptor))
    }

    fn matches(self, descriptor: &TypeDescriptor) -> bool {
        let TypeKind::Struct(fields) = &descriptor.kind else {
            return false;
        };
        let named = descriptor
            .name
            .as_deref()
            .map(|name| normalize_name(name) == self.wrapper_name())
            .unwrap_or(false);
        if !named || fields.len() != 2 {
            return false;
        }

        let value_field = normalize_name(self.value_field());
        let has_valid = fields.iter().any(|field| {
            normalize_name(&field.name) == "valid"
                && matches!(field.descriptor().kind, TypeKind::Bool)
        });
        let has_value = fields
            .iter()
            .any(|field| normalize_name(&field.name) == value_field);
        has_valid && has_value
    }

    fn matches_alias(self, descriptor: &TypeDescriptor) -> bool {
        match descriptor.fields() {
            [field] if normalize_name(&field.name) == self.wrapper_name() => {
                let inner = field.descriptor();
                let (inner, _) = inner.strip_pointers();
                self.matches(inner)
            }
            _ => false,
        }
    }
}

macro_rules! null_wrapper {
    ($(#[$meta:meta])* $name:ident, $field:ident: $ty:ty, $value_field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            pub $field: $ty,
            pub valid: bool,
        }

        impl $name {
            /// A valid wrapper holding `value`
            pub fn new(value: $ty) -> Self {
                Self { $field: value, valid: true }
            }

            pub fn null() -> Self {
                Self::default()
            }

            pub fn as_option(&self) -> Option<&$ty> {
                self.valid.then_some(&self.$field)
            }

            pub fn into_option(self) -> Option<$ty> {
                self.valid.then_some(self.$field)
            }
        }

        impl From<Option<$ty>> for $name {
            fn from(value: Option<$ty>) -> Self {
                value.map(Self::new).unwrap_or_default()
            }
        }

        impl From<$name> for Option<$ty> {
            fn from(value: $name) -> Self {
                value.into_option()
            }
        }

        impl Describe for $name {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure(
                    stringify!($name),
                    module_path!(),
                    vec![
                        FieldDescriptor::of::<$ty>($value_field),
                        FieldDescriptor::of::<bool>("Valid"),
                    ],
                )
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.as_option().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                Option::<$ty>::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

null_wrapper!(
    /// Nullable UUID
    NullUuid, uuid: uuid::Uuid, "UUID"
);
null_wrapper!(
    /// Nullable boolean
    NullBool, bool: bool, "Bool"
);
null_wrapper!(
    /// Nullable byte
    NullByte, byte: u8, "Byte"
);
null_wrapper!(
    /// Nullable 16-bit integer
    NullInt16, int16: i16, "Int16"
);
null_wrapper!(
    /// Nullable 32-bit integer
    NullInt32, int32: i32, "Int32"
);
null_wrapper!(
    /// Nullable 64-bit integer
    NullInt64, int64: i64, "Int64"
);
null_wrapper!(
    /// Nullable double precision float
    NullFloat64, float64: f64, "Float64"
);
null_wrapper!(
    /// Nullable UTC timestamp
    NullTime, time: chrono::DateTime<chrono::Utc>, "Time"
);
null_wrapper!(
    /// Nullable string
    NullString, string: String, "String"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_shipped_wrappers() {
        assert_eq!(NullWrapper::detect(&NullString::describe()), Some(NullWrapper::String));
        assert_eq!(NullWrapper::detect(&NullUuid::describe()), Some(NullWrapper::Uuid));
        assert_eq!(NullWrapper::detect(&NullTime::describe()), Some(NullWrapper::Time));
        assert_eq!(NullWrapper::detect(&NullFloat64::describe()), Some(NullWrapper::Float64));
    }

    #[test]
    fn test_detect_alias() {
        let alias = TypeDescriptor::structure(
            "SqlNullString",
            "app::db",
            vec![FieldDescriptor::of::<NullString>("NullString")],
        );
        assert_eq!(NullWrapper::detect(&alias), Some(NullWrapper::String));
    }

    #[test]
    fn test_rejects_lookalikes() {
        // Missing validity flag
        let missing_valid = TypeDescriptor::structure(
            "NullString",
            "app",
            vec![
                FieldDescriptor::of::<String>("String"),
                FieldDescriptor::of::<String>("Other"),
            ],
        );
        assert_eq!(NullWrapper::detect(&missing_valid), None);

        // Validity flag is not a boolean
        let wrong_flag = TypeDescriptor::structure(
            "NullInt32",
            "app",
            vec![
                FieldDescriptor::of::<i32>("Int32"),
                FieldDescriptor::of::<String>("Valid"),
            ],
        );
        assert_eq!(NullWrapper::detect(&wrong_flag), None);

        assert_eq!(NullWrapper::detect(&String::describe()), None);
    }

    #[test]
    fn test_schemas_are_nullable() {
        for wrapper in NullWrapper::ALL {
            assert!(wrapper.schema().nullable, "{:?}", wrapper);
        }
        let byte = NullWrapper::Byte.schema();
        assert!(byte.is_type(SchemaType::String));
        assert_eq!(byte.format.as_deref(), Some("byte"));

        let float = NullWrapper::Float64.schema();
        assert_eq!(float.format.as_deref(), Some("double"));
        assert_eq!(float.maximum, Some(f64::MAX));
    }

    #[test]
    fn test_wrapper_serialization() {
        let present = NullInt64::new(42);
        assert_eq!(serde_json::to_string(&present).unwrap(), "42");
        assert_eq!(serde_json::to_string(&NullInt64::null()).unwrap(), "null");

        let parsed: NullString = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(parsed.as_option().map(String::as_str), Some("hello"));
        let parsed: NullString = serde_json::from_str("null").unwrap();
        assert!(!parsed.valid);
    }

    #[test]
    fn test_option_conversions() {
        let wrapper = NullBool::from(Some(true));
        assert!(wrapper.valid);
        assert_eq!(Option::<bool>::from(wrapper), Some(true));
        assert_eq!(NullBool::from(None).into_option(), None);
    }
}
