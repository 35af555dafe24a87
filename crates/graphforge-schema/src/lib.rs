#![doc = include_str!("../README.md")]
#![allow(unused_assignments)] // thiserror/miette derive macros trigger false positives

pub mod error;
pub mod generator;
mod metadata;
pub mod model;
mod validate;

pub use error::GenerationError;
pub use generator::{DateScalarMode, SchemaGenerator, SchemaGeneratorOptions};
pub use metadata::MetadataSchemaGenerator;
pub use model::{
    BUILTIN_SCALARS, EnumType, EnumValue, Field, InputObjectType, InputValue, InterfaceType,
    NamedType, ObjectType, ScalarType, Schema, UnionType, is_builtin_scalar,
};
