//! Page sources and fetchers
//!
//! A [`PageSource`] opens a [`PageFetcher`] for the duration of one
//! collection run. The fetcher owns whatever connection state the run needs
//! and is dropped when the run ends.

use super::request::{build_query_params, FetchRequest};
use crate::config::{ScraperConfig, SESSION_HEADER};
use crate::error::Result;
use crate::http::{
    HttpClient, HttpClientConfig, RandomSessionToken, RequestConfig, SessionTokenGenerator,
};
use crate::types::JsonValue;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Fetches a single raw page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Perform exactly one round trip for `request`
    async fn fetch(&self, request: &FetchRequest) -> Result<JsonValue>;
}

/// Hands out a fresh fetcher per collection run
pub trait PageSource: Send + Sync {
    /// Fetcher owned by a single run
    type Fetcher: PageFetcher;

    /// Acquire the fetcher for one run
    fn open(&self) -> Result<Self::Fetcher>;
}

// ============================================================================
// IMDb GraphQL
// ============================================================================

/// Reviews from the IMDb GraphQL endpoint
#[derive(Clone)]
pub struct ImdbReviewSource {
    config: Arc<ScraperConfig>,
    tokens: Arc<dyn SessionTokenGenerator>,
}

impl ImdbReviewSource {
    /// Create a source using random session tokens
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config: Arc::new(config),
            tokens: Arc::new(RandomSessionToken),
        }
    }

    /// Replace the session token generator
    #[must_use]
    pub fn with_token_generator(mut self, tokens: impl SessionTokenGenerator + 'static) -> Self {
        self.tokens = Arc::new(tokens);
        self
    }
}

impl PageSource for ImdbReviewSource {
    type Fetcher = ImdbReviewFetcher;

    fn open(&self) -> Result<ImdbReviewFetcher> {
        self.config.validate()?;

        let http_config = HttpClientConfig::builder()
            .timeout(self.config.timeout())
            .headers(self.config.request_headers())
            .build();

        Ok(ImdbReviewFetcher {
            client: HttpClient::with_config(http_config)?,
            config: Arc::clone(&self.config),
            tokens: Arc::clone(&self.tokens),
        })
    }
}

impl std::fmt::Debug for ImdbReviewSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImdbReviewSource")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// One run's connection to the IMDb endpoint
pub struct ImdbReviewFetcher {
    client: HttpClient,
    config: Arc<ScraperConfig>,
    tokens: Arc<dyn SessionTokenGenerator>,
}

impl std::fmt::Debug for ImdbReviewFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImdbReviewFetcher")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PageFetcher for ImdbReviewFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<JsonValue> {
        let mut req = RequestConfig::new().header(SESSION_HEADER, self.tokens.next_token());
        for (key, value) in build_query_params(request, &self.config) {
            req = req.query(key, value);
        }

        debug!(
            resource_id = %request.resource_id,
            cursor = %request.cursor,
            sort = %request.sort_mode,
            "Fetching review page"
        );

        self.client
            .get_json_with_config(&self.config.endpoint, req)
            .await
    }
}
