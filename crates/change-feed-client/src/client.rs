//! HTTP retrieval of the change feed.

use crate::{api_endpoint, parse_recent_changes, ChangeRecord, FetchError, FetchResult, QuerySpec};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Longest response body excerpt kept in a status error.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Something that can produce a batch of change records for a query.
#[async_trait]
pub trait ChangeSource: Send + Sync {
    /// Retrieve the records matching `spec`, in the order the source provides.
    async fn fetch(&self, spec: &QuerySpec) -> FetchResult<Vec<ChangeRecord>>;
}

/// reqwest-backed client for a MediaWiki `api.php` endpoint.
#[derive(Debug, Clone)]
pub struct ChangeFeedClient {
    api_url: Url,
    http_client: Client,
}

impl ChangeFeedClient {
    /// Create a client for the wiki at `base_endpoint`.
    ///
    /// Every request is bounded by `timeout`, covering connect, send and
    /// body read.
    pub fn new(base_endpoint: &str, timeout: Duration) -> FetchResult<Self> {
        let base = Url::parse(base_endpoint)?;
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rc-announcer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            api_url: api_endpoint(&base),
            http_client,
        })
    }

    /// The resolved `api.php` URL.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// URL that `fetch` would request for `spec`.
    pub fn request_url(&self, spec: &QuerySpec) -> Url {
        spec.request_url(&self.api_url)
    }
}

#[async_trait]
impl ChangeSource for ChangeFeedClient {
    async fn fetch(&self, spec: &QuerySpec) -> FetchResult<Vec<ChangeRecord>> {
        let url = self.request_url(spec);
        debug!(url = %url, "Fetching recent changes");

        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body = response.text().await?;
        let records = parse_recent_changes(&body)?;

        debug!(records = records.len(), "Fetched recent changes");
        Ok(records)
    }
}
