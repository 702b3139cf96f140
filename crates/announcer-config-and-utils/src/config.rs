//! Configuration management for the announcer.

use crate::{parse_namespaces, CoreError, CoreResult, Paths};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Default wiki script path; `api.php` is appended when building requests.
pub const DEFAULT_BASE_ENDPOINT: &str = "https://en.wikipedia.org/w/";
/// Default page reference template.
pub const DEFAULT_PAGE_URL_TEMPLATE: &str = "https://en.wikipedia.org/wiki/{page}";
/// Placeholder replaced by the page name in the page reference template.
pub const PAGE_PLACEHOLDER: &str = "{page}";
/// Default maximum number of changes requested per cycle.
pub const DEFAULT_LIMIT: u32 = 5;
/// Default number of seconds between cycles.
pub const DEFAULT_WAIT_PERIOD_SECS: u64 = 1800;
/// Default HTTP timeout for one change feed request.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the log level.
const LOG_LEVEL_ENV: &str = "RC_ANNOUNCER_LOG_LEVEL";

/// Main announcer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// The watched change feed.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Announcement targets and their subscription flags.
    #[serde(default)]
    pub destinations: Vec<DestinationConfig>,
}

/// Settings for one watched change feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Wiki script path (e.g. `https://en.wikipedia.org/w/`) or full `api.php` URL.
    #[serde(default = "default_base_endpoint")]
    pub base_endpoint: String,
    /// Page reference template containing the `{page}` placeholder.
    #[serde(default = "default_page_url_template")]
    pub page_url_template: String,
    /// Namespace numbers to watch; empty means all namespaces.
    /// Accepts a JSON list or the textual form (`"all"`, `"0, 4"`).
    #[serde(default = "default_namespaces", deserialize_with = "deserialize_namespaces")]
    pub namespaces: Vec<u32>,
    /// Whether edits flagged as minor are announced.
    #[serde(default)]
    pub show_minor: bool,
    /// Maximum number of changes fetched per cycle.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Seconds between the starts of two consecutive cycles.
    #[serde(default = "default_wait_period_secs")]
    pub wait_period_secs: u64,
    /// Timeout for one change feed request.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

/// One announcement destination (e.g. a channel name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Destination identifier.
    pub name: String,
    /// Whether changes are announced to this destination.
    #[serde(default)]
    pub announce: bool,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_base_endpoint() -> String {
    DEFAULT_BASE_ENDPOINT.to_string()
}

fn default_page_url_template() -> String {
    DEFAULT_PAGE_URL_TEMPLATE.to_string()
}

fn default_namespaces() -> Vec<u32> {
    vec![0]
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_wait_period_secs() -> u64 {
    DEFAULT_WAIT_PERIOD_SECS
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn deserialize_namespaces<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        List(Vec<u32>),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::List(list) => Ok(list),
        Repr::Text(text) => parse_namespaces(&text).map_err(serde::de::Error::custom),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            feed: FeedConfig::default(),
            destinations: Vec::new(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_endpoint: default_base_endpoint(),
            page_url_template: default_page_url_template(),
            namespaces: default_namespaces(),
            show_minor: false,
            limit: DEFAULT_LIMIT,
            wait_period_secs: DEFAULT_WAIT_PERIOD_SECS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from the config file, falling back to defaults
    /// when it does not exist. The result is validated.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the config file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var(LOG_LEVEL_ENV) {
            self.log_level = log_level;
        }
    }

    /// Reject settings the announcer cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        self.feed.validate()?;
        if let Some(blank) = self.destinations.iter().find(|d| d.name.trim().is_empty()) {
            return Err(CoreError::Config(format!(
                "destination name must not be empty: {:?}",
                blank
            )));
        }
        Ok(())
    }
}

impl FeedConfig {
    /// Reject settings the announcer cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        self.endpoint_url()?;
        if !self.page_url_template.contains(PAGE_PLACEHOLDER) {
            return Err(CoreError::Config(format!(
                "page_url_template must contain {}: {}",
                PAGE_PLACEHOLDER, self.page_url_template
            )));
        }
        if self.limit == 0 {
            return Err(CoreError::Config("limit must be positive".to_string()));
        }
        if self.wait_period_secs == 0 {
            return Err(CoreError::Config(
                "wait_period_secs must be positive".to_string(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(CoreError::Config(
                "fetch_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the base endpoint as a parsed URL.
    pub fn endpoint_url(&self) -> CoreResult<Url> {
        Url::parse(&self.base_endpoint).map_err(CoreError::from)
    }

    /// Time between the starts of two cycles.
    pub fn wait_period(&self) -> Duration {
        Duration::from_secs(self.wait_period_secs)
    }

    /// Timeout for one change feed request.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Stable, filesystem-safe key identifying the watched feed.
    ///
    /// Built from the endpoint host, port and path, e.g.
    /// `https://en.wikipedia.org/w/` becomes `en.wikipedia.org_w`.
    pub fn feed_key(&self) -> CoreResult<String> {
        let url = self.endpoint_url()?;
        let host = url
            .host_str()
            .ok_or_else(|| CoreError::Config(format!("endpoint has no host: {}", url)))?;
        let raw = match url.port() {
            Some(port) => format!("{}:{}{}", host, port, url.path()),
            None => format!("{}{}", host, url.path()),
        };

        let mut key = String::with_capacity(raw.len());
        for ch in raw.chars() {
            let safe = if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' {
                ch
            } else {
                '_'
            };
            if safe == '_' && key.ends_with('_') {
                continue;
            }
            key.push(safe);
        }

        Ok(key.trim_matches('_').to_string())
    }
}
