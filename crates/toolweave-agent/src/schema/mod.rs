//! Tool schema compilation.
//!
//! A [`ToolSignature`] declares a tool's parameters as [`TypeShape`]s; the
//! [`SchemaCompiler`] resolves them into JSON-Schema fragments and pulls
//! parameter descriptions out of the documentation block.

pub mod compiler;
pub mod docstring;
pub mod types;

pub use compiler::{CompiledSchema, Param, SchemaCompiler, SchemaOptions, ToolSignature};
pub use types::{Described, ParameterSchema, PrimitiveKind, TypeDescriptor, TypeShape};
