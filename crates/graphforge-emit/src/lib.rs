#![doc = include_str!("../README.md")]
#![allow(unused_assignments)] // thiserror/miette derive macros trigger false positives

mod emitter;
mod options;
mod printer;

pub use emitter::{
    EmissionError, FileEmitter, GENERATED_SCHEMA_WARNING, SchemaEmitter, schema_file_content,
};
pub use options::PrintSchemaOptions;
pub use printer::{DEFAULT_DEPRECATION_REASON, print_schema};
