//! fgagraph binary
//!
//! Renders an authorization model as a DOT graph and reports relation cycles.
//!
//! # Usage
//!
//! ```bash
//! # DOT to stdout
//! fgagraph --model-path model.fga | dot -Tsvg > model.svg
//!
//! # DOT and cycle report to files, failing on unsatisfiable relations
//! fgagraph --model-path model.json --output-path model.dot \
//!     --cycles-output cycles.json --fail-on-definitive-cycles
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use fgagraph_cli::logging::{init_logging, parse_log_level, LoggingConfig};
use fgagraph_cli::{run, CliConfig, OutputTarget, RunOptions};

/// fgagraph - authorization model graph and cycle analyzer
#[derive(Parser, Debug)]
#[command(name = "fgagraph")]
#[command(version, about, long_about = None)]
struct Args {
    /// Model file (`.json` for the JSON format, DSL otherwise)
    #[arg(short, long)]
    model_path: PathBuf,

    /// DOT output file, `-` for stdout
    #[arg(short, long)]
    output_path: Option<PathBuf>,

    /// Write the cycle report as JSON to this file
    #[arg(long)]
    cycles_output: Option<PathBuf>,

    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep nodes without edges in the DOT output
    #[arg(long)]
    no_prune: bool,

    /// Exit with an error if any relation can never be satisfied
    #[arg(long)]
    fail_on_definitive_cycles: bool,
}

impl Args {
    /// Command-line flags take precedence over loaded configuration.
    fn into_run_options(self, config: &CliConfig) -> RunOptions {
        RunOptions {
            output: OutputTarget::from_arg(self.output_path.as_deref()),
            model_path: self.model_path,
            cycles_output: self.cycles_output,
            prune: config.render.prune && !self.no_prune,
            fail_on_definitive_cycles: config.analysis.fail_on_definitive_cycles
                || self.fail_on_definitive_cycles,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CliConfig::load(path),
        None => CliConfig::from_env(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("fgagraph: {}", err);
            return ExitCode::FAILURE;
        }
    };

    init_logging(LoggingConfig {
        json_format: config.logging.json,
        default_level: parse_log_level(&config.logging.level),
    });

    info!(version = env!("CARGO_PKG_VERSION"), "starting fgagraph");

    match run(&args.into_run_options(&config)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
