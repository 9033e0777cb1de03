//! Page request types
//!
//! A [`FetchRequest`] names one page of reviews; [`build_query_params`] turns
//! it into the persisted-query parameters the endpoint expects.

use crate::config::ScraperConfig;
use crate::error::{Error, Result};
use crate::types::SortMode;
use serde_json::json;

/// One page of reviews to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Title identifier (e.g. `tt0111161`)
    pub resource_id: String,
    /// Pagination cursor, empty for the first page
    pub cursor: String,
    /// Server-side ordering
    pub sort_mode: SortMode,
}

impl FetchRequest {
    /// Request the first page of a title's reviews
    pub fn first_page(resource_id: impl Into<String>, sort_mode: SortMode) -> Result<Self> {
        let resource_id = resource_id.into();
        if resource_id.trim().is_empty() {
            return Err(Error::invalid_argument("resource id must not be empty"));
        }
        Ok(Self {
            resource_id,
            cursor: String::new(),
            sort_mode,
        })
    }

    /// Validate raw inputs, including the sort mode name
    pub fn parse(resource_id: &str, cursor: &str, sort_mode: &str) -> Result<Self> {
        let sort_mode = sort_mode.parse()?;
        let mut request = Self::first_page(resource_id, sort_mode)?;
        request.cursor = cursor.to_string();
        Ok(request)
    }

    /// Same title and ordering, positioned after `cursor`
    #[must_use]
    pub fn with_cursor(&self, cursor: impl Into<String>) -> Self {
        Self {
            cursor: cursor.into(),
            ..self.clone()
        }
    }

    /// Whether this request targets the first page
    pub fn is_first_page(&self) -> bool {
        self.cursor.is_empty()
    }
}

/// Reviews are always requested in descending order of the sort key
const SORT_ORDER: &str = "DESC";

/// Build the query string parameters for a page request
///
/// Parameters are returned in the order they are sent: operation name,
/// variables, then the persisted query extension.
pub fn build_query_params(request: &FetchRequest, config: &ScraperConfig) -> Vec<(String, String)> {
    let variables = json!({
        "tConst": request.resource_id,
        "sort": {
            "by": request.sort_mode.as_str(),
            "order": SORT_ORDER,
        },
        "after": request.cursor,
        "filter": {},
    });
    let extensions = json!({
        "persistedQuery": {
            "version": 1,
            "sha256Hash": config.persisted_query_hash,
        }
    });

    vec![
        ("operationName".to_string(), config.operation_name.clone()),
        ("variables".to_string(), variables.to_string()),
        ("extensions".to_string(), extensions.to_string()),
    ]
}
