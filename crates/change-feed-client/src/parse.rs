//! JSON response parsing.

use crate::{ChangeKind, ChangeRecord, FetchError, FetchResult};
use chrono::DateTime;
use serde::Deserialize;
use tracing::warn;

/// Actor shown for changes whose user name was revision-deleted.
pub const HIDDEN_USER: &str = "(username removed)";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<QueryBlock>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct QueryBlock {
    #[serde(default)]
    recentchanges: Option<Vec<RawChange>>,
}

/// Entry as sent by the API. Fields are optional here so that entries of
/// unknown types never fail the whole batch.
#[derive(Debug, Deserialize)]
struct RawChange {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    user: Option<String>,
    /// Present (as `""` or `true`) when the user name was revision-deleted.
    #[serde(default)]
    userhidden: Option<serde_json::Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    comment: Option<String>,
}

/// Parse a recentchanges response body into records, in feed order.
pub fn parse_recent_changes(body: &str) -> FetchResult<Vec<ChangeRecord>> {
    let response: ApiResponse = serde_json::from_str(body)?;

    if let Some(error) = response.error {
        return Err(FetchError::Parse(format!(
            "API error {}: {}",
            error.code, error.info
        )));
    }

    let entries = response
        .query
        .and_then(|q| q.recentchanges)
        .ok_or_else(|| FetchError::Parse("missing query.recentchanges".to_string()))?;

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let raw_kind = entry.kind.as_deref().unwrap_or_default();
        let Some(kind) = ChangeKind::from_feed(raw_kind) else {
            warn!(
                change_type = %raw_kind,
                title = entry.title.as_deref().unwrap_or_default(),
                "Ignoring unknown change type"
            );
            continue;
        };

        let timestamp = entry
            .timestamp
            .as_deref()
            .ok_or_else(|| missing_field(index, "timestamp"))
            .and_then(parse_timestamp)?;
        let actor = match entry.user {
            Some(user) => user,
            None if entry.userhidden.is_some() => HIDDEN_USER.to_string(),
            None => return Err(missing_field(index, "user")),
        };
        let subject = entry.title.ok_or_else(|| missing_field(index, "title"))?;

        records.push(ChangeRecord::new(
            timestamp,
            kind,
            actor,
            subject,
            entry.comment,
        ));
    }

    Ok(records)
}

fn missing_field(index: usize, field: &str) -> FetchError {
    FetchError::Parse(format!("change #{} has no {}", index, field))
}

/// ISO-8601 (`2013-01-01T12:00:00Z`) to seconds since epoch.
fn parse_timestamp(raw: &str) -> FetchResult<u64> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| FetchError::Parse(format!("invalid timestamp {:?}: {}", raw, e)))?;
    u64::try_from(parsed.timestamp())
        .map_err(|_| FetchError::Parse(format!("timestamp before epoch: {}", raw)))
}
