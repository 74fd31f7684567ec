//! # apidoc-schema
//!
//! Compiles Rust type descriptions into OpenAPI 3 schemas.
//!
//! Types describe their shape through the [`Describe`] trait, usually via
//! `#[derive(Describe)]`. A [`SchemaCompiler`] walks the description and
//! produces a [`SchemaRef`] tree, storing named composite types in a
//! [`SchemaCache`] so they can be referenced from an OpenAPI document's
//! `components.schemas` section.
//!
//! ## Features
//!
//! - Cycle-safe compilation of self-referential types
//! - Tag-driven refinement (`json`, `xml`, `validate`)
//! - Well-known types: timestamps, UUIDs, file uploads, raw JSON
//! - Nullable scalar wrappers ([`NullString`], [`NullInt64`], ...)
//! - Enum literals through [`EnumValues`]

extern crate self as apidoc_schema;

pub mod cache;
pub mod compiler;
pub mod defaults;
pub mod describe;
pub mod descriptor;
pub mod null;
pub mod schema;
pub mod tags;

pub use cache::{reference_path, type_identifier, SchemaCache};
pub use compiler::{SchemaCompiler, SchemaConfig};
pub use describe::{Describe, EnumValues, UploadedFile};
pub use descriptor::{
    generic_type_name, FieldDescriptor, FloatWidth, IntWidth, Tags, TypeDescriptor, TypeKind,
    WellKnown,
};
pub use null::{
    NullBool, NullByte, NullFloat64, NullInt16, NullInt32, NullInt64, NullString, NullTime,
    NullUuid, NullWrapper,
};
pub use schema::{Origin, Schema, SchemaRef, SchemaType, Types, XmlObject, COMPONENTS_SCHEMAS_PREFIX};

/// Derive [`Describe`] for structs and enums
pub use apidoc_schema_derive::Describe;

#[doc(hidden)]
pub use serde_json;
