//! Authorization model types, loaders and the type system.
//!
//! This module contains:
//! - Core type definitions (types, relations, type restrictions, usersets)
//! - DSL parser for the OpenFGA model format
//! - Loader for the OpenFGA JSON model format
//! - Cached relation lookups used by the graph builder

pub mod json;
mod parser;
mod type_system;
mod types;

pub use parser::{parse, ParserError, ParserResult, DEFAULT_SCHEMA_VERSION};
pub use type_system::{ModelLookup, TypeSystem};
pub use types::*;
