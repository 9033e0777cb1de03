//! Pagination module
//!
//! Follows the reviews endpoint's cursor until it runs dry.
//!
//! # Overview
//!
//! Each page goes through the same cycle:
//!
//! ```text
//! FETCHING -> VALIDATING -> EXTRACTING -> ADVANCING -> FETCHING ...
//!                 |                           |
//!                 +-> FAILED / DONE           +-> DONE (null cursor)
//! ```
//!
//! A missing `data.title.reviews` path fails the run, while an explicit
//! `reviews: null` ends it successfully with no records. Repeated cursors and
//! an optional page ceiling guard against a server that never stops.

mod collector;
mod page;
mod types;

pub use collector::ReviewCollector;
pub use page::{flatten_edge, parse_page, PageContent};
pub use types::{CollectOutcome, CollectorState, NextPage, PaginationState};
