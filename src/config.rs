//! Scraper configuration
//!
//! Everything needed to talk to the reviews endpoint: where it lives, which
//! persisted query to run, and the header bundle the server expects. The
//! defaults mirror the IMDb Android app; a YAML or JSON file can override any
//! of them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default GraphQL endpoint
pub const DEFAULT_ENDPOINT: &str = "https://caching.graphql.imdb.com/";

/// Default persisted operation
pub const DEFAULT_OPERATION_NAME: &str = "TitleUserReviewsQuery";

/// Hash identifying the persisted query shape server-side
pub const DEFAULT_PERSISTED_QUERY_HASH: &str =
    "80ddad46e8e68fcfef2d7a400809a4ab7fd6d5213d8e313befa3db0a963bff68";

/// Header carrying the per-request session token
pub const SESSION_HEADER: &str = "X-Amzn-Sessionid";

/// Header naming the persisted query hash
pub const OPERATION_ID_HEADER: &str = "X-Apollo-Operation-Id";

/// Header naming the persisted operation
pub const OPERATION_NAME_HEADER: &str = "X-Apollo-Operation-Name";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 14; Supreme; wv) AppleWebKit/537.36 \
    (KHTML, like Gecko) Version/4.0 Chrome/131.0.6778.260 Mobile Safari/537.36 \
    IMDb/9.1.2.109120200 (Supreme|Supreme; Android 34; Supreme) IMDb-flg/9.1.2 \
    (1080,2031,403,402) IMDb-var/app-andr-ph";

// ============================================================================
// Scraper Config
// ============================================================================

/// Configuration for fetching reviews
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,

    /// Persisted operation name
    pub operation_name: String,

    /// sha256 of the persisted query
    pub persisted_query_hash: String,

    /// Fixed headers sent with every request
    ///
    /// The Apollo operation headers are derived from `operation_name` and
    /// `persisted_query_hash` unless set here explicitly.
    pub headers: BTreeMap<String, String>,

    /// Per-request timeout in seconds (unset = no client-side deadline)
    pub timeout_secs: Option<u64>,

    /// Give up after this many pages (unset = follow cursors until exhausted)
    pub max_pages: Option<usize>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            operation_name: DEFAULT_OPERATION_NAME.to_string(),
            persisted_query_hash: DEFAULT_PERSISTED_QUERY_HASH.to_string(),
            headers: default_headers(),
            timeout_secs: Some(30),
            max_pages: None,
        }
    }
}

/// Header bundle identifying the client as the IMDb Android app
pub fn default_headers() -> BTreeMap<String, String> {
    [
        ("Accept", "multipart/mixed; deferSpec=20220824, application/json"),
        ("X-Imdb-Consent-Info", "e30"),
        ("X-Imdb-Weblab-Search-Algorithm", "C"),
        ("User-Agent", DEFAULT_USER_AGENT),
        ("X-Imdb-Client-Name", "imdb-app-android"),
        ("X-Imdb-Client-Version", "9.1.2.109120200"),
        ("Content-Type", "application/json"),
        ("X-Imdb-User-Language", "en-US"),
        ("X-Imdb-User-Country", "US"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl ScraperConfig {
    /// Create a new config builder
    pub fn builder() -> ScraperConfigBuilder {
        ScraperConfigBuilder::default()
    }

    /// Load a config from a YAML or JSON file
    ///
    /// Fields missing from the file keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from YAML
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a config from JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::config(format!("Invalid config JSON: {e}")))
    }

    /// Check that the endpoint is a usable absolute URL
    pub fn validate(&self) -> Result<()> {
        let url = self.endpoint_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Endpoint must be http(s), got '{}'",
                url.scheme()
            )));
        }
        if self.operation_name.is_empty() {
            return Err(Error::config("operation_name must not be empty"));
        }
        if self.max_pages == Some(0) {
            return Err(Error::config("max_pages must be at least 1"));
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::config(
                "timeout_secs must be at least 1, or null for no deadline",
            ));
        }
        Ok(())
    }

    /// Headers for a page request, with the Apollo operation pair filled in
    pub fn request_headers(&self) -> BTreeMap<String, String> {
        let mut headers = self.headers.clone();
        headers
            .entry(OPERATION_ID_HEADER.to_string())
            .or_insert_with(|| self.persisted_query_hash.clone());
        headers
            .entry(OPERATION_NAME_HEADER.to_string())
            .or_insert_with(|| self.operation_name.clone());
        headers
    }

    /// Parsed endpoint URL
    pub fn endpoint_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.endpoint)?)
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Builder for [`ScraperConfig`]
#[derive(Debug, Default)]
pub struct ScraperConfigBuilder {
    config: ScraperConfig,
}

impl ScraperConfigBuilder {
    /// Set the endpoint URL
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the persisted operation name
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.config.operation_name = name.into();
        self
    }

    /// Set the persisted query hash
    pub fn persisted_query_hash(mut self, hash: impl Into<String>) -> Self {
        self.config.persisted_query_hash = hash.into();
        self
    }

    /// Add or replace a fixed header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(key.into(), value.into());
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Remove the client-side deadline
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout_secs = None;
        self
    }

    /// Cap the number of pages fetched
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = Some(max_pages);
        self
    }

    /// Build the config
    pub fn build(self) -> ScraperConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ScraperConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.operation_name, "TitleUserReviewsQuery");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(config.max_pages.is_none());
        assert_eq!(
            config.request_headers().get(OPERATION_ID_HEADER),
            Some(&DEFAULT_PERSISTED_QUERY_HASH.to_string())
        );
        assert_eq!(
            config.headers.get("X-Imdb-Client-Name"),
            Some(&"imdb-app-android".to_string())
        );
        // Session token is generated per request, never fixed
        assert!(!config.headers.contains_key(SESSION_HEADER));
        config.validate().unwrap();
    }

    #[test]
    fn test_builder() {
        let config = ScraperConfig::builder()
            .endpoint("http://localhost:8080/graphql")
            .operation_name("OtherQuery")
            .persisted_query_hash("abc")
            .header("X-Imdb-User-Country", "GB")
            .no_timeout()
            .max_pages(3)
            .build();

        assert_eq!(config.endpoint, "http://localhost:8080/graphql");
        assert_eq!(config.persisted_query_hash, "abc");
        let headers = config.request_headers();
        assert_eq!(headers[OPERATION_ID_HEADER], "abc");
        assert_eq!(headers[OPERATION_NAME_HEADER], "OtherQuery");
        assert_eq!(headers["X-Imdb-User-Country"], "GB");
        assert!(config.timeout().is_none());
        assert_eq!(config.max_pages, Some(3));
    }

    #[test]
    fn test_yaml_partial_override() {
        let yaml = r"
endpoint: http://127.0.0.1:9000/
timeout_secs: 5
";
        let config = ScraperConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:9000/");
        assert_eq!(config.timeout_secs, Some(5));
        assert_eq!(config.operation_name, DEFAULT_OPERATION_NAME);
        assert!(!config.headers.is_empty());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"max_pages": 10, "timeout_secs": null}}"#).unwrap();

        let config = ScraperConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_pages, Some(10));
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let config = ScraperConfig::builder().endpoint("not a url").build();
        assert!(config.validate().is_err());

        let config = ScraperConfig::builder().endpoint("ftp://example.com").build();
        assert!(config.validate().is_err());

        let config = ScraperConfig {
            max_pages: Some(0),
            ..ScraperConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let err = ScraperConfig::from_yaml_str("timeout_secs: 0\n")
            .unwrap()
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "timeout_secs: 0\n").unwrap();
        assert!(ScraperConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_yaml_hash_override_keeps_headers_consistent() {
        let yaml = r"
operation_name: TitleUserReviewsQueryV2
persisted_query_hash: 0123abcd
";
        let config = ScraperConfig::from_yaml_str(yaml).unwrap();
        let headers = config.request_headers();
        assert_eq!(headers[OPERATION_ID_HEADER], "0123abcd");
        assert_eq!(headers[OPERATION_NAME_HEADER], "TitleUserReviewsQueryV2");
        assert_eq!(headers["X-Imdb-Client-Name"], "imdb-app-android");
    }

    #[test]
    fn test_explicit_operation_headers_win() {
        let yaml = r"
persisted_query_hash: 0123abcd
headers:
  X-Apollo-Operation-Id: pinned
";
        let config = ScraperConfig::from_yaml_str(yaml).unwrap();
        let headers = config.request_headers();
        assert_eq!(headers[OPERATION_ID_HEADER], "pinned");
        assert_eq!(headers[OPERATION_NAME_HEADER], DEFAULT_OPERATION_NAME);
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = ScraperConfig::from_file("/nonexistent/config.yaml").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
