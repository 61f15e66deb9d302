//! Structured logging configuration.
//!
//! Logs go to stderr so DOT written to stdout stays machine readable.
//!
//! # Usage
//!
//! ```ignore
//! use fgagraph_cli::logging::{init_logging, LoggingConfig};
//!
//! init_logging(LoggingConfig {
//!     json_format: true,
//!     default_level: tracing::Level::DEBUG,
//! });
//! ```

use tracing::Level;
use tracing_subscriber::{fmt, fmt::MakeWriter, prelude::*, EnvFilter};

/// Configuration for structured logging.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Whether to use JSON format (true) or text format (false)
    pub json_format: bool,
    /// The default log level if RUST_LOG is not set
    pub default_level: Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json_format: false,
            default_level: Level::INFO,
        }
    }
}

/// Initialize the logging subsystem with the given configuration.
///
/// `RUST_LOG` takes precedence over `config.default_level`. Only the first
/// call installs a subscriber; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.to_string()));

    let _ = tracing::subscriber::set_global_default(build_subscriber(
        &config,
        filter,
        std::io::stderr,
    ));
}

/// Builds the JSON or pretty text subscriber described by `config`.
fn build_subscriber<W>(
    config: &LoggingConfig,
    filter: EnvFilter,
    writer: W,
) -> Box<dyn tracing::Subscriber + Send + Sync>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_format {
        Box::new(
            registry.with(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_current_span(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            ),
        )
    } else {
        Box::new(
            registry.with(
                fmt::layer()
                    .pretty()
                    .with_writer(writer)
                    .with_target(true),
            ),
        )
    }
}

/// Parse log level from string, falling back to INFO.
pub fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
