//! Pagination types
//!
//! Cursor bookkeeping and the collector's state machine.

use crate::error::{Error, Result};
use crate::types::ReviewCollection;
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// Result of advancing past a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available after this cursor
    Continue(String),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }
}

/// Tracks pagination progress during one run
///
/// Every cursor handed out by the server is remembered so that a server
/// repeating itself is caught instead of looping forever.
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages processed so far
    pub pages: usize,
    /// Cursor for the next request
    pub cursor: Option<String>,
    /// Is pagination complete?
    pub done: bool,
    /// Optional page ceiling
    max_pages: Option<usize>,
    seen: HashSet<String>,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state that fails once more than `max_pages` would be needed
    pub fn with_max_pages(max_pages: Option<usize>) -> Self {
        Self {
            max_pages,
            ..Self::default()
        }
    }

    /// Record a processed page and decide where to go next
    ///
    /// A null or empty end cursor finishes pagination. A cursor seen before,
    /// or one that would exceed the page ceiling, is a pagination loop.
    pub fn advance(&mut self, end_cursor: Option<String>) -> Result<NextPage> {
        self.pages += 1;

        if end_cursor.as_deref() == Some("") {
            warn!(
                "Server returned an empty end cursor after page {}; treating it as the last page",
                self.pages
            );
        }

        let Some(cursor) = end_cursor.filter(|c| !c.is_empty()) else {
            self.done = true;
            self.cursor = None;
            return Ok(NextPage::Done);
        };

        if let Some(max) = self.max_pages {
            if self.pages >= max {
                return Err(Error::pagination_loop(format!(
                    "page limit of {max} reached with cursor '{cursor}' still pending"
                )));
            }
        }

        if !self.seen.insert(cursor.clone()) {
            return Err(Error::pagination_loop(format!(
                "cursor '{cursor}' repeated after {} pages",
                self.pages
            )));
        }

        self.cursor = Some(cursor.clone());
        Ok(NextPage::Continue(cursor))
    }
}

/// Where a collection run is in its page cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    /// Waiting on the fetcher
    Fetching,
    /// Checking the response shape
    Validating,
    /// Flattening edges into records
    Extracting,
    /// Reading the end cursor
    Advancing,
    /// Finished successfully
    Done,
    /// Stopped on an error
    Failed,
}

impl CollectorState {
    /// Whether the run has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for CollectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetching => "FETCHING",
            Self::Validating => "VALIDATING",
            Self::Extracting => "EXTRACTING",
            Self::Advancing => "ADVANCING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Everything a run produced, including what was gathered before a failure
#[derive(Debug)]
pub struct CollectOutcome {
    /// Records in delivery order; marked incomplete on failure
    pub collection: ReviewCollection,
    /// Terminal state, `Done` or `Failed`
    pub state: CollectorState,
    /// Why the run stopped, when it failed
    pub error: Option<Error>,
}

impl CollectOutcome {
    pub(crate) fn done(collection: ReviewCollection) -> Self {
        Self {
            collection,
            state: CollectorState::Done,
            error: None,
        }
    }

    pub(crate) fn failed(mut collection: ReviewCollection, error: Error) -> Self {
        collection.set_completion(crate::types::Completion::Incomplete);
        Self {
            collection,
            state: CollectorState::Failed,
            error: Some(error),
        }
    }

    /// Check if the run finished successfully
    pub fn is_done(&self) -> bool {
        self.state == CollectorState::Done
    }

    /// Drop partial records on failure
    pub fn into_result(self) -> Result<ReviewCollection> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.collection),
        }
    }
}
