//! File-backed watermark store.

use crate::{PersistenceError, PersistenceResult, Watermark, WatermarkStore};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Stores the watermark as a decimal line in a single file.
#[derive(Debug, Clone)]
pub struct FileWatermarkStore {
    path: PathBuf,
}

impl FileWatermarkStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for the feed identified by `feed_key` inside `state_dir`
    /// (`<state_dir>/watermark-<feed_key>`).
    pub fn for_feed(state_dir: &Path, feed_key: &str) -> Self {
        Self::new(state_dir.join(format!("watermark-{}", feed_key)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> io::Result<Watermark> {
        let content = fs::read_to_string(&self.path)?;
        content.parse::<Watermark>().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid watermark {:?}: {}", content.trim(), e),
            )
        })
    }
}

impl WatermarkStore for FileWatermarkStore {
    fn load(&self) -> Watermark {
        match self.read() {
            Ok(watermark) => {
                debug!(
                    path = %self.path.display(),
                    watermark = watermark.value(),
                    "Loaded persisted watermark"
                );
                watermark
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "No usable persisted watermark, starting from 0"
                );
                Watermark::ZERO
            }
        }
    }

    fn save(&self, watermark: Watermark) -> PersistenceResult<()> {
        write_atomic(&self.path, &format!("{}\n", watermark))?;
        debug!(
            path = %self.path.display(),
            watermark = watermark.value(),
            "Persisted watermark"
        );
        Ok(())
    }
}

/// Replace `path` with `content` so that readers observe either the old or
/// the new file, never a partial one.
fn write_atomic(path: &Path, content: &str) -> PersistenceResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| PersistenceError::InvalidPath(path.to_path_buf()))?;

    let io_err = |source: io::Error| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(dir).map_err(io_err)?;

    let tmp_path = dir.join(format!(
        ".{}.tmp.{}",
        file_name.to_string_lossy(),
        Uuid::new_v4()
    ));

    let write_result = (|| -> io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, path)?;

        if let Ok(parent_dir) = fs::File::open(dir) {
            let _ = parent_dir.sync_all();
        }

        Ok(())
    })();

    if let Err(err) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(err));
    }

    Ok(())
}
