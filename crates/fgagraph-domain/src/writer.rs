//! End-to-end pipeline: model in, DOT text and cycle report out.

use tracing::{debug, instrument};

use crate::error::DomainResult;
use crate::graph::{build_graph, classify, render, CycleReport};
use crate::model::{self, AuthorizationModel};
use crate::validation;

/// Options for [`write_model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Drop nodes without incident edges before rendering.
    pub prune: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self { prune: true }
    }
}

/// Rendered graph plus the cycles found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOutput {
    pub dot: String,
    pub cycles: CycleReport,
}

/// Builds, analyzes and renders a model that has already been validated.
///
/// Cycles are classified on the full graph. Pruning only affects the DOT
/// output.
#[instrument(skip_all, fields(types = model.type_definitions.len()))]
pub fn write_model(
    model: &AuthorizationModel,
    options: WriterOptions,
) -> DomainResult<WriterOutput> {
    let graph = build_graph(model)?;
    let cycles = classify(&graph);

    let dot = if options.prune {
        render(&graph.pruned())?
    } else {
        render(&graph)?
    };
    debug!(bytes = dot.len(), prune = options.prune, "rendered graph");

    Ok(WriterOutput { dot, cycles })
}

/// Parses, validates, and writes a DSL model with default options.
pub fn write_dsl(input: &str) -> DomainResult<WriterOutput> {
    let model = model::parse(input)?;
    validation::validate(&model).map_err(validation::into_domain_error)?;
    write_model(&model, WriterOptions::default())
}
