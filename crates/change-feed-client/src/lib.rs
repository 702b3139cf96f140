//! # Change Feed Client
//!
//! Reads a MediaWiki `list=recentchanges` feed.
//!
//! - **[`QuerySpec`]**: per-cycle filter parameters, rebuilt from config and
//!   the current watermark.
//! - **[`ChangeFeedClient`]**: one HTTP GET per call, bounded by a timeout,
//!   first page only.
//! - **[`parse_recent_changes`]**: JSON body to [`ChangeRecord`]s. Entries
//!   with an unrecognized `type` are skipped with a warning.
//!
//! ```ignore
//! let client = ChangeFeedClient::new("https://en.wikipedia.org/w/", Duration::from_secs(30))?;
//! let spec = QuerySpec::new(vec![0], false, 5).after(watermark);
//! let records = client.fetch(&spec).await?;
//! ```

mod client;
mod error;
mod parse;
mod query;
mod record;

pub use client::{ChangeFeedClient, ChangeSource};
pub use error::{FetchError, FetchErrorKind, FetchResult};
pub use parse::{parse_recent_changes, HIDDEN_USER};
pub use query::{api_endpoint, QuerySpec};
pub use record::{ChangeKind, ChangeRecord};
