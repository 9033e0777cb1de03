//! Page validation and flattening
//!
//! Locates the reviews container in a raw GraphQL page and turns each edge
//! into a [`ReviewRecord`].

use crate::error::{Error, Result};
use crate::types::{JsonValue, ReviewRecord};
use serde::Deserialize;

/// What a well-formed page contained
#[derive(Debug, Clone, PartialEq)]
pub enum PageContent {
    /// The server reported `reviews: null` for the title
    NoReviews,
    /// Flattened records plus the cursor for the next page
    Reviews {
        /// Flattened edges in server order
        records: Vec<ReviewRecord>,
        /// Cursor for the following page, `None` on the last one
        end_cursor: Option<String>,
    },
}

impl PageContent {
    /// Number of records on the page
    pub fn len(&self) -> usize {
        match self {
            Self::NoReviews => 0,
            Self::Reviews { records, .. } => records.len(),
        }
    }

    /// True when the page carried no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Wire shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct ReviewEdge {
    node: ReviewNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewNode {
    author: Author,
    summary: Option<Summary>,
    text: Option<ReviewText>,
    #[serde(deserialize_with = "Option::deserialize")]
    submission_date: Option<String>,
    helpfulness: Helpfulness,
    author_rating: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Author {
    #[serde(deserialize_with = "Option::deserialize")]
    id: Option<String>,
    #[serde(deserialize_with = "Option::deserialize")]
    nick_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    original_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewText {
    original_text: Option<Markdown>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Markdown {
    plain_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Helpfulness {
    up_votes: i64,
    down_votes: i64,
    score: f64,
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a raw page and flatten its edges
///
/// `data.title.reviews` must be present. An explicit `null` there is the
/// server's way of saying the title has no reviews; anything else missing is
/// a malformed response.
pub fn parse_page(body: &JsonValue) -> Result<PageContent> {
    let Some(reviews) = body
        .get("data")
        .and_then(|data| data.get("title"))
        .and_then(|title| title.get("reviews"))
    else {
        return Err(Error::malformed(missing_reviews_message(body)));
    };

    if reviews.is_null() {
        return Ok(PageContent::NoReviews);
    }

    let edges = reviews
        .get("edges")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| Error::malformed("reviews.edges is missing or not a list"))?;

    let page_info = reviews
        .get("pageInfo")
        .filter(|info| info.is_object())
        .ok_or_else(|| Error::malformed("reviews.pageInfo is missing"))?;

    let end_cursor = match page_info.get("endCursor") {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(cursor)) => Some(cursor.clone()),
        Some(other) => {
            return Err(Error::malformed(format!(
                "pageInfo.endCursor is not a string: {other}"
            )))
        }
    };

    let records = edges
        .iter()
        .enumerate()
        .map(|(index, edge)| {
            flatten_edge(edge).map_err(|e| match e {
                Error::MalformedResponse { message } => {
                    Error::malformed(format!("edge {index}: {message}"))
                }
                other => other,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PageContent::Reviews {
        records,
        end_cursor,
    })
}

/// Flatten one edge into a record
///
/// Optional sub-objects (summary, text, rating) become `None` when absent or
/// null. Author id, author name and submission date must be present but may
/// be null, which passes through as `None`. Nothing is defaulted.
pub fn flatten_edge(edge: &JsonValue) -> Result<ReviewRecord> {
    let ReviewEdge { node } = ReviewEdge::deserialize(edge)
        .map_err(|e| Error::malformed(format!("unexpected review shape: {e}")))?;

    Ok(ReviewRecord {
        author_id: node.author.id,
        author_name: node.author.nick_name,
        summary_text: node.summary.and_then(|s| s.original_text),
        body_text: node
            .text
            .and_then(|t| t.original_text)
            .and_then(|m| m.plain_text),
        submission_date: node.submission_date,
        upvotes: node.helpfulness.up_votes,
        downvotes: node.helpfulness.down_votes,
        helpfulness_score: node.helpfulness.score,
        author_rating: node.author_rating,
    })
}

fn missing_reviews_message(body: &JsonValue) -> String {
    let graphql_error = body
        .get("errors")
        .and_then(JsonValue::as_array)
        .and_then(|errors| errors.first())
        .and_then(|error| error.get("message"))
        .and_then(JsonValue::as_str);

    match graphql_error {
        Some(message) => format!("data.title.reviews not found (server said: {message})"),
        None => "data.title.reviews not found".to_string(),
    }
}
