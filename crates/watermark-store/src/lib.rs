//! # Watermark Store
//!
//! Persists the announcement watermark: the timestamp at or before which
//! every change has already been announced.
//!
//! - **[`Watermark`]**: the value object, non-negative seconds since epoch.
//! - **[`WatermarkStore`]**: load/save contract. `load` never fails (it
//!   falls back to zero), `save` reports [`PersistenceError`].
//! - **[`FileWatermarkStore`]**: one small text file per feed, replaced
//!   atomically (temp file, fsync, rename, directory fsync).
//! - **[`MemoryWatermarkStore`]**: process-local store for hosts without
//!   persistence and for tests.

mod error;
mod file;
mod memory;
mod watermark;

pub use error::{PersistenceError, PersistenceResult};
pub use file::FileWatermarkStore;
pub use memory::MemoryWatermarkStore;
pub use watermark::Watermark;

/// Durable storage for a single watermark.
pub trait WatermarkStore: Send + Sync {
    /// Load the persisted watermark, or [`Watermark::ZERO`] when nothing
    /// usable is stored. Never fails; problems are logged.
    fn load(&self) -> Watermark;

    /// Durably store `watermark`.
    fn save(&self, watermark: Watermark) -> PersistenceResult<()>;
}
