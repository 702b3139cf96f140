//! Request construction for the recentchanges API.

use url::Url;
use watermark_store::Watermark;

/// Script appended to the configured wiki path.
const API_SCRIPT: &str = "api.php";

/// Filter parameters for one change feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    /// Namespace numbers to include; empty means all namespaces.
    pub namespaces: Vec<u32>,
    /// Include edits flagged as minor.
    pub show_minor: bool,
    /// Maximum number of entries returned.
    pub limit: u32,
    /// Earliest timestamp (inclusive) the API should return, if any.
    pub start: Option<u64>,
}

impl QuerySpec {
    /// Unbounded query (no lower time limit).
    pub fn new(namespaces: Vec<u32>, show_minor: bool, limit: u32) -> Self {
        Self {
            namespaces,
            show_minor,
            limit,
            start: None,
        }
    }

    /// Restrict the query to changes newer than `watermark`.
    ///
    /// A zero watermark leaves the query unbounded.
    pub fn after(mut self, watermark: Watermark) -> Self {
        self.start = (!watermark.is_zero()).then(|| watermark.next_eligible());
        self
    }

    /// Query parameters in request order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("action", "query".to_string()),
            ("list", "recentchanges".to_string()),
            ("format", "json".to_string()),
            ("rcprop", "user|comment|timestamp|title".to_string()),
            ("rctype", "edit|new".to_string()),
        ];

        if !self.namespaces.is_empty() {
            let joined = self
                .namespaces
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join("|");
            pairs.push(("rcnamespace", joined));
        }

        if !self.show_minor {
            pairs.push(("rcshow", "!minor".to_string()));
        }

        // rcstart is only a lower bound when enumerating towards newer entries.
        if let Some(start) = self.start {
            pairs.push(("rcdir", "newer".to_string()));
            pairs.push(("rcstart", start.to_string()));
        }

        pairs.push(("rclimit", self.limit.to_string()));
        pairs
    }

    /// Full request URL against an `api.php` endpoint.
    pub fn request_url(&self, api: &Url) -> Url {
        let mut url = api.clone();
        url.set_query(None);
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in self.query_pairs() {
                query.append_pair(key, &value);
            }
        }
        url
    }
}

/// Resolve the `api.php` URL for a configured wiki path.
///
/// `https://wiki.example/w` and `https://wiki.example/w/` both become
/// `https://wiki.example/w/api.php`; a URL already naming `api.php` is kept.
pub fn api_endpoint(base: &Url) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);

    if !url.path().ends_with(API_SCRIPT) {
        let mut path = url.path().to_string();
        if !path.ends_with('/') {
            path.push('/');
        }
        path.push_str(API_SCRIPT);
        url.set_path(&path);
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs_of(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn value_of(url: &Url, key: &str) -> Option<String> {
        pairs_of(url)
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    #[test]
    fn api_endpoint_appends_script() {
        let with_slash = Url::parse("https://wiki.example/w/").unwrap();
        let without_slash = Url::parse("https://wiki.example/w").unwrap();
        let explicit = Url::parse("https://wiki.example/w/api.php?x=1").unwrap();

        assert_eq!(api_endpoint(&with_slash).as_str(), "https://wiki.example/w/api.php");
        assert_eq!(api_endpoint(&without_slash).as_str(), "https://wiki.example/w/api.php");
        assert_eq!(api_endpoint(&explicit).as_str(), "https://wiki.example/w/api.php");
    }

    #[test]
    fn fixed_parameters_are_always_present() {
        let api = Url::parse("https://wiki.example/w/api.php").unwrap();
        let url = QuerySpec::new(vec![0], false, 5).request_url(&api);

        assert_eq!(value_of(&url, "action").as_deref(), Some("query"));
        assert_eq!(value_of(&url, "list").as_deref(), Some("recentchanges"));
        assert_eq!(value_of(&url, "format").as_deref(), Some("json"));
        assert_eq!(
            value_of(&url, "rcprop").as_deref(),
            Some("user|comment|timestamp|title")
        );
        assert_eq!(value_of(&url, "rctype").as_deref(), Some("edit|new"));
        assert_eq!(value_of(&url, "rcnamespace").as_deref(), Some("0"));
        assert_eq!(value_of(&url, "rcshow").as_deref(), Some("!minor"));
        assert_eq!(value_of(&url, "rclimit").as_deref(), Some("5"));
    }

    #[test]
    fn empty_namespace_set_omits_restriction() {
        let pairs = QuerySpec::new(Vec::new(), false, 5).query_pairs();
        assert!(pairs.iter().all(|(k, _)| *k != "rcnamespace"));

        let pairs = QuerySpec::new(vec![0, 4, 14], false, 5).query_pairs();
        assert!(pairs.contains(&("rcnamespace", "0|4|14".to_string())));
    }

    #[test]
    fn minor_edits_filter_dropped_when_enabled() {
        let pairs = QuerySpec::new(vec![0], true, 5).query_pairs();
        assert!(pairs.iter().all(|(k, _)| *k != "rcshow"));
    }

    #[test]
    fn zero_watermark_leaves_query_unbounded() {
        let spec = QuerySpec::new(vec![0], false, 5).after(Watermark::ZERO);
        assert_eq!(spec.start, None);
        let pairs = spec.query_pairs();
        assert!(pairs.iter().all(|(k, _)| *k != "rcstart" && *k != "rcdir"));
    }

    #[test]
    fn nonzero_watermark_starts_one_second_later() {
        let spec = QuerySpec::new(vec![0], false, 5).after(Watermark::new(1000));
        assert_eq!(spec.start, Some(1001));

        let pairs = spec.query_pairs();
        assert!(pairs.contains(&("rcstart", "1001".to_string())));
        assert!(pairs.contains(&("rcdir", "newer".to_string())));
    }

    #[test]
    fn request_url_replaces_existing_query() {
        let api = Url::parse("https://wiki.example/w/api.php?stale=1").unwrap();
        let url = QuerySpec::new(vec![], true, 10).request_url(&api);
        assert!(value_of(&url, "stale").is_none());
        assert_eq!(url.path(), "/w/api.php");
    }
}
