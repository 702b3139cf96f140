//! File system paths for the announcer.

use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Name of the base directory under the user's home.
const BASE_DIR_NAME: &str = ".rc-announcer";

/// Manages file system paths for the announcer.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for runtime files (~/.rc-announcer)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.rc-announcer`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(BASE_DIR_NAME),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.rc-announcer).
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the config file path (~/.rc-announcer/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the state directory holding watermark files (~/.rc-announcer/state).
    pub fn state_dir(&self) -> PathBuf {
        self.base_dir.join("state")
    }

    /// Get the logs directory (~/.rc-announcer/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the JSONL log file path (~/.rc-announcer/logs/announcer.jsonl).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("announcer.jsonl")
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.state_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
