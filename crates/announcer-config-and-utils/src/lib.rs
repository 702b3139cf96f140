//! Core configuration, paths, errors and logging for rc-announcer.

mod config;
mod error;
mod logging;
mod namespaces;
mod paths;

pub use config::{
    Config, DestinationConfig, FeedConfig, DEFAULT_BASE_ENDPOINT, DEFAULT_FETCH_TIMEOUT_SECS,
    DEFAULT_LIMIT, DEFAULT_LOG_LEVEL, DEFAULT_PAGE_URL_TEMPLATE, DEFAULT_WAIT_PERIOD_SECS,
    PAGE_PLACEHOLDER,
};
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use namespaces::{format_namespaces, parse_namespaces};
pub use paths::Paths;
