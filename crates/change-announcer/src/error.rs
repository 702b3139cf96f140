//! Announcer error types.

use announcer_config_and_utils::CoreError;
use change_feed_client::FetchError;
use thiserror::Error;
use watermark_store::PersistenceError;

/// Announcer error type.
#[derive(Error, Debug)]
pub enum AnnouncerError {
    /// The change feed could not be fetched or understood.
    #[error("Failed to fetch recent changes: {0}")]
    Fetch(#[from] FetchError),

    /// The watermark could not be persisted.
    #[error("{0}")]
    Persistence(#[from] PersistenceError),

    /// Invalid feed configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),

    /// `start` was called on a running announcer.
    #[error("Announcer is already running")]
    AlreadyStarted,

    /// Another cycle holds the running state.
    #[error("An announcement cycle is already in progress")]
    CycleInProgress,
}

/// Result type alias using AnnouncerError.
pub type AnnouncerResult<T> = Result<T, AnnouncerError>;
