//! Console destinations backed by the `destinations` list in `config.json`.

use announcer_config_and_utils::Config;
use change_announcer::{Destination, DestinationDirectory};
use parking_lot::Mutex;
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

/// Prints announcements as `[destination] line`.
///
/// The config file is re-read on every listing so that `announce` toggles
/// apply without a restart. When it cannot be read, the last known list is
/// used.
pub struct ConsoleDirectory {
    config_path: PathBuf,
    last_known: Mutex<Vec<Destination>>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleDirectory {
    pub fn new(config_path: PathBuf, initial: Vec<Destination>) -> Self {
        Self::with_writer(config_path, initial, Box::new(std::io::stdout()))
    }

    pub fn with_writer(
        config_path: PathBuf,
        initial: Vec<Destination>,
        out: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            config_path,
            last_known: Mutex::new(initial),
            out: Mutex::new(out),
        }
    }
}

impl DestinationDirectory for ConsoleDirectory {
    fn list_active_destinations(&self) -> Vec<Destination> {
        let mut last_known = self.last_known.lock();

        if !self.config_path.exists() {
            return last_known.clone();
        }

        match Config::load_from_file(&self.config_path) {
            Ok(config) => {
                *last_known = config.destinations.iter().map(Destination::from).collect();
            }
            Err(err) => {
                warn!(
                    path = %self.config_path.display(),
                    error = %err,
                    "Could not re-read destinations, using last known list"
                );
            }
        }

        last_known.clone()
    }

    fn deliver(&self, destination: &Destination, line: &str) {
        let mut out = self.out.lock();
        if let Err(err) = writeln!(out, "[{}] {}", destination.name, line).and_then(|_| out.flush())
        {
            warn!(destination = %destination.name, error = %err, "Failed to write announcement");
        }
    }
}
