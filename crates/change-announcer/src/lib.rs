//! # Change Announcer
//!
//! Watches a wiki's recent-changes feed and announces every new change to
//! subscribed destinations exactly once, oldest first.
//!
//! ## Architecture
//!
//! - **[`ChangeAnnouncer`]**: owns the watermark and the periodic worker.
//!   One cycle per wait period; cycles never overlap.
//! - **[`select`]**: keeps records strictly newer than the watermark,
//!   ascending by timestamp, ties in feed order.
//! - **[`format_change`]**: `User {actor} {modified|created} {page url}[ - {summary}]`.
//! - **[`DestinationDirectory`]**: host-provided list of destinations and
//!   the fire-and-forget delivery call.
//!
//! ## Failure handling
//!
//! A failed fetch leaves the watermark untouched and the schedule armed.
//! A failed save keeps the advanced in-memory watermark and is retried
//! after the next successful cycle.
//!
//! ```ignore
//! let announcer = ChangeAnnouncer::new(feed, source, directory, store)?;
//! announcer.start()?;
//! // ...
//! announcer.stop().await;
//! ```

mod announcer;
mod destination;
mod error;
mod format;
mod select;

#[cfg(test)]
mod tests;

pub use announcer::{ChangeAnnouncer, CycleReport, CycleState};
pub use destination::{Destination, DestinationDirectory};
pub use error::{AnnouncerError, AnnouncerResult};
pub use format::{format_change, page_reference};
pub use select::select;

pub use change_feed_client::{ChangeKind, ChangeRecord};
pub use watermark_store::Watermark;
