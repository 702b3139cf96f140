//! Logging initialization for the announcer.
//!
//! Thin wrapper over the `observability` package: JSONL to the log file
//! under the base directory, compact output on stderr.

use crate::Paths;
use observability::LogConfig;

/// Service name recorded in the log stream.
const SERVICE_NAME: &str = "rc-announcer";

/// Initialize the logging system.
///
/// # Arguments
///
/// * `level` - Default log level (trace, debug, info, warn, error); `RUST_LOG` wins
/// * `paths` - Determines the log file location
///
/// ```ignore
/// init_logging("info", &paths);
/// tracing::info!("announcer started");
/// ```
pub fn init_logging(level: &str, paths: &Paths) {
    observability::init_with_config(LogConfig {
        service_name: SERVICE_NAME.into(),
        default_level: level.into(),
        log_path: Some(paths.log_file()),
        file_output: true,
        also_stderr: true,
    });
}
