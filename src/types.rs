//! Common types used throughout imdb-reviews
//!
//! This module contains the sort modes understood by the reviews endpoint
//! and the flattened review records produced by the collector.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Sort Mode
// ============================================================================

/// Server-side ordering of the reviews of a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortMode {
    /// Most helpful reviews first
    #[default]
    HelpfulnessScore,
    /// Most recent reviews first
    SubmissionDate,
}

impl SortMode {
    /// All supported sort modes
    pub const ALL: [SortMode; 2] = [SortMode::HelpfulnessScore, SortMode::SubmissionDate];

    /// Name of the sort mode on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::HelpfulnessScore => "HELPFULNESS_SCORE",
            SortMode::SubmissionDate => "SUBMISSION_DATE",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "unsupported sort mode '{s}', expected HELPFULNESS_SCORE or SUBMISSION_DATE"
                ))
            })
    }
}

// ============================================================================
// Review Records
// ============================================================================

/// One review, flattened into a tabular row
///
/// Field order here is the column order of every export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Author identifier (e.g. `ur0000001`)
    pub author_id: Option<String>,
    /// Author display name
    pub author_name: Option<String>,
    /// Review headline, if the review has one
    pub summary_text: Option<String>,
    /// Plain-text review body, if present
    pub body_text: Option<String>,
    /// Submission timestamp exactly as the server sent it
    pub submission_date: Option<String>,
    /// Helpful votes
    pub upvotes: i64,
    /// Not-helpful votes
    pub downvotes: i64,
    /// Server-computed helpfulness score
    pub helpfulness_score: f64,
    /// The author's own rating of the title
    pub author_rating: Option<i64>,
}

impl ReviewRecord {
    /// Column names, in field order
    pub const COLUMNS: [&'static str; 9] = [
        "author_id",
        "author_name",
        "summary_text",
        "body_text",
        "submission_date",
        "upvotes",
        "downvotes",
        "helpfulness_score",
        "author_rating",
    ];
}

/// How a collection run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completion {
    /// Every page was fetched, up to a null cursor
    #[default]
    Complete,
    /// The server explicitly reported that the title has no reviews
    NoReviews,
    /// Fetching stopped early; the records are only a prefix
    Incomplete,
}

/// Ordered reviews gathered during one run
///
/// Records keep the order the server delivered them in: page order, then
/// edge order within a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewCollection {
    records: Vec<ReviewRecord>,
    completion: Completion,
    pages_fetched: usize,
}

impl ReviewCollection {
    /// Create an empty, complete collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from already flattened records
    pub fn from_records(records: Vec<ReviewRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Append one page worth of records
    pub fn extend_page(&mut self, page: impl IntoIterator<Item = ReviewRecord>) {
        self.records.extend(page);
        self.pages_fetched += 1;
    }

    /// Mark how the run that produced these records ended
    pub fn set_completion(&mut self, completion: Completion) {
        self.completion = completion;
    }

    /// How the run ended
    pub fn completion(&self) -> Completion {
        self.completion
    }

    /// True unless fetching stopped early
    pub fn is_complete(&self) -> bool {
        self.completion != Completion::Incomplete
    }

    /// Number of pages whose records were appended
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no record was gathered
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in delivery order
    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    /// Iterate over the records in delivery order
    pub fn iter(&self) -> std::slice::Iter<'_, ReviewRecord> {
        self.records.iter()
    }

    /// Take the records out of the collection
    pub fn into_records(self) -> Vec<ReviewRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a ReviewCollection {
    type Item = &'a ReviewRecord;
    type IntoIter = std::slice::Iter<'a, ReviewRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
