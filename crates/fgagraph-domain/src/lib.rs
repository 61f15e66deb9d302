//! fgagraph-domain: Authorization model graph building and cycle analysis
//!
//! This crate turns an authorization model into a directed relation graph,
//! enumerates and classifies the cycles in it, and renders it as Graphviz DOT:
//! - DSL parser and JSON loader for authorization models
//! - Reference validation
//! - Graph builder, cycle analyzer and DOT writer
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               fgagraph-domain                │
//! ├─────────────────────────────────────────────┤
//! │  model/      - Types, DSL parser, JSON      │
//! │  validation/ - Model reference checks      │
//! │  graph/      - Builder, cycles, DOT         │
//! │  writer      - End-to-end pipeline          │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod graph;
pub mod model;
pub mod validation;
pub mod writer;

// Re-export commonly used types at the crate root
pub use error::{DomainError, DomainResult};
pub use graph::{CycleKind, CycleReport, Graph};
pub use writer::{write_dsl, write_model, WriterOptions, WriterOutput};
