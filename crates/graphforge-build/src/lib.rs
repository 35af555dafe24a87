#![doc = include_str!("../README.md")]
#![allow(unused_assignments)] // thiserror/miette derive macros trigger false positives

extern crate alloc;

mod builder;
mod error;
mod options;

pub use builder::{SchemaBuilder, build_schema, build_schema_sync};
pub use error::{BuildError, ConfigurationError};
pub use options::{
    BuildOptions, DEFAULT_SCHEMA_FILE_NAME, EmitSchemaFile, EmitSchemaFileOptions, EmitTarget,
};

pub use graphforge_emit::{EmissionError, PrintSchemaOptions};
pub use graphforge_schema::{GenerationError, Schema, SchemaGeneratorOptions};
