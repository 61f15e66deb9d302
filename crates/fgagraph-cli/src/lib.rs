//! fgagraph-cli: command-line front end for fgagraph-domain
//!
//! Loads an authorization model (DSL or JSON), writes its relation graph as
//! Graphviz DOT and reports the cycles found in it.

pub mod config;
pub mod logging;
pub mod run;

pub use config::CliConfig;
pub use run::{load_model, run, OutputTarget, RunError, RunOptions};
