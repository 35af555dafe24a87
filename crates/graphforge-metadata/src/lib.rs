#![doc = include_str!("../README.md")]
#![allow(unused_assignments)] // thiserror/miette derive macros trigger false positives

extern crate alloc;

pub mod descriptor;
pub mod loader;
pub mod type_ref;

pub use descriptor::{
    ArgDescriptor, EnumValueDescriptor, FieldDescriptor, FieldResolverDescriptor,
    ResolverDescriptor, TypeDescriptor, TypeKind,
};
pub use loader::{LoadError, ResolverSource, load_resolvers, load_resolvers_async};
pub use type_ref::{MAX_LIST_DEPTH, TypeRef, TypeRefError, is_valid_name};
