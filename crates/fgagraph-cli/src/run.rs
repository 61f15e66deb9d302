//! Loads a model file, writes its DOT graph and reports cycles.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use fgagraph_domain::model::{self, json, AuthorizationModel};
use fgagraph_domain::validation;
use fgagraph_domain::{write_model, CycleKind, CycleReport, DomainResult, WriterOptions};

/// Where the DOT output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// `-` and an absent path both mean stdout.
    pub fn from_arg(path: Option<&Path>) -> Self {
        match path {
            Some(path) if path != Path::new("-") => OutputTarget::File(path.to_path_buf()),
            _ => OutputTarget::Stdout,
        }
    }
}

/// Fully resolved options for one invocation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub model_path: PathBuf,
    pub output: OutputTarget,
    pub cycles_output: Option<PathBuf>,
    pub prune: bool,
    pub fail_on_definitive_cycles: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("model contains {count} definitive cycle(s)")]
    DefinitiveCycles { count: usize },
}

/// Reads a model from disk. Files ending in `.json` use the JSON loader,
/// anything else is parsed as DSL.
pub fn load_model(path: &Path) -> Result<AuthorizationModel> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read model file {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let loaded: DomainResult<AuthorizationModel> = if is_json {
        json::from_json_str(&contents)
    } else {
        model::parse(&contents).map_err(Into::into)
    };
    let model = loaded.with_context(|| format!("failed to load model from {}", path.display()))?;

    validation::validate(&model)
        .map_err(validation::into_domain_error)
        .with_context(|| format!("model {} is invalid", path.display()))?;

    debug!(
        path = %path.display(),
        types = model.type_definitions.len(),
        conditions = model.conditions.len(),
        "loaded model"
    );
    Ok(model)
}

/// Runs the whole pipeline and returns the cycle report.
pub fn run(options: &RunOptions) -> Result<CycleReport> {
    let model = load_model(&options.model_path)?;
    let output = write_model(
        &model,
        WriterOptions {
            prune: options.prune,
        },
    )
    .with_context(|| format!("failed to build graph for {}", options.model_path.display()))?;

    let report = serde_json::to_string_pretty(&output.cycles)
        .context("failed to serialize cycle report")?;

    if let Some(path) = &options.cycles_output {
        fs::write(path, &report)
            .with_context(|| format!("failed to write cycle report to {}", path.display()))?;
    }

    if let Err(err) = write_dot(&options.output, &output.dot) {
        if let Some(path) = &options.cycles_output {
            let _ = fs::remove_file(path);
        }
        return Err(err);
    }

    report_cycles(&output.cycles);

    if options.fail_on_definitive_cycles && output.cycles.definitive_cycle_count > 0 {
        return Err(RunError::DefinitiveCycles {
            count: output.cycles.definitive_cycle_count,
        }
        .into());
    }

    Ok(output.cycles)
}

fn write_dot(target: &OutputTarget, dot: &str) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", dot).context("failed to write DOT to stdout")?;
            stdout.flush()?;
        }
        OutputTarget::File(path) => {
            fs::write(path, format!("{}\n", dot))
                .with_context(|| format!("failed to write DOT to {}", path.display()))?;
            info!(path = %path.display(), "wrote DOT graph");
        }
    }
    Ok(())
}

fn report_cycles(report: &CycleReport) {
    for cycle in &report.cycles {
        match cycle.kind {
            CycleKind::Definitive => {
                warn!(cycle = %cycle.path(), "definitive cycle: relation can never be satisfied")
            }
            CycleKind::Possible => debug!(cycle = %cycle.path(), "possible cycle"),
        }
    }
    info!(
        total_cycles = report.total_cycles,
        definitive = report.definitive_cycle_count,
        possible = report.possible_cycle_count,
        "cycle analysis complete"
    );
}
