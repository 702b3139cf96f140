//! # Observability
//!
//! Logging bootstrap for rc-announcer.
//!
//! Services call [`init_with_config`] once at startup and then use the
//! standard `tracing` macros. Events are written as JSON lines to a log
//! file (default `~/.rc-announcer/logs/announcer.jsonl`) and, optionally,
//! in compact human form to stderr.
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "rc-announcer".into(),
//!     default_level: "debug".into(),
//!     also_stderr: true,
//!     ..Default::default()
//! });
//! tracing::info!("ready");
//! ```
//!
//! `RUST_LOG` always takes precedence over `default_level`.

mod writer;

pub use writer::LogFileWriter;

use std::io;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service, recorded in the startup event.
    pub service_name: String,

    /// Default level filter (e.g. "debug", "info"), overridden by `RUST_LOG`.
    pub default_level: String,

    /// Log file path. `None` uses `~/.rc-announcer/logs/announcer.jsonl`.
    pub log_path: Option<PathBuf>,

    /// Write JSONL to the log file.
    pub file_output: bool,

    /// Also emit compact logs to stderr.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            file_output: true,
            also_stderr: false,
        }
    }
}

/// Initialize logging with custom configuration.
///
/// Installing a global subscriber twice is a no-op, so tests and embedding
/// hosts may call this freely. If the log file cannot be opened the file
/// layer is skipped and a warning is emitted through whatever layers remain.
pub fn init_with_config(config: LogConfig) {
    let log_path = config
        .log_path
        .clone()
        .or_else(writer::default_log_path);

    let mut open_error: Option<(PathBuf, io::Error)> = None;
    let file_writer = match (&log_path, config.file_output) {
        (Some(path), true) => match LogFileWriter::open(path) {
            Ok(writer) => Some(writer),
            Err(err) => {
                open_error = Some((path.clone(), err));
                None
            }
        },
        _ => None,
    };

    let file_layer = file_writer.map(|writer| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .with_target(true)
            .with_writer(writer)
            .with_filter(env_filter(&config.default_level))
    });

    let stderr_layer = config.also_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .with_writer(io::stderr)
            .with_filter(env_filter(&config.default_level))
    });

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if !installed {
        return;
    }

    if let Some((path, err)) = open_error {
        tracing::warn!(
            log_path = %path.display(),
            error = %err,
            "Failed to open log file, file logging disabled"
        );
    }

    tracing::info!(
        service = %config.service_name,
        log_path = ?log_path.filter(|_| config.file_output),
        "observability initialized"
    );
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Re-export tracing macros for convenience.
pub use tracing::{debug, error, info, instrument, trace, warn};

/// Re-export Level for advanced filtering.
pub use tracing::Level;
