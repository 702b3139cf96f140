//! Append-only JSONL log file writer.
//!
//! Every write is flushed immediately so `tail -f` on the log file sees
//! complete lines, and several announcer processes can share one file.

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Default log file location: `~/.rc-announcer/logs/announcer.jsonl`.
pub(crate) fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(".rc-announcer")
            .join("logs")
            .join("announcer.jsonl")
    })
}

/// Line-flushed file writer shared by every subscriber layer clone.
#[derive(Clone)]
pub struct LogFileWriter {
    inner: Arc<Mutex<BufWriter<File>>>,
}

impl LogFileWriter {
    /// Open (or create) `path` in append mode, creating parent directories.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            inner: Arc::new(Mutex::new(BufWriter::with_capacity(8192, file))),
        })
    }
}

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.inner.lock();
        let written = guard.write(buf)?;
        guard.flush()?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for LogFileWriter {
    type Writer = LogFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn open_creates_parent_dirs_and_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("logs").join("test.jsonl");

        let mut writer = LogFileWriter::open(&path).unwrap();
        writer.write_all(b"{\"n\":1}\n").unwrap();
        drop(writer);

        let mut writer = LogFileWriter::open(&path).unwrap();
        writer.write_all(b"{\"n\":2}\n").unwrap();

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "{\"n\":1}\n{\"n\":2}\n");
    }

    #[test]
    fn writes_are_visible_without_explicit_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("live.jsonl");

        let writer = LogFileWriter::open(&path).unwrap();
        let mut handle = writer.make_writer();
        handle.write_all(b"line\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "line\n");
    }

    #[test]
    fn default_path_ends_with_announcer_log() {
        if let Some(path) = default_log_path() {
            assert!(path.ends_with(".rc-announcer/logs/announcer.jsonl"));
        }
    }
}
