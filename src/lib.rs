// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # IMDb Reviews
//!
//! Collects every user review of an IMDb title from the public GraphQL
//! endpoint, following the cursor chain page by page, and exports the
//! flattened records to an Excel workbook, CSV, Parquet or JSON lines.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use imdb_reviews::{ImdbReviewSource, ReviewCollector, ScraperConfig, SortMode, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let source = ImdbReviewSource::new(ScraperConfig::default());
//!     let reviews = ReviewCollector::new(source)
//!         .collect_all("tt0111161", SortMode::HelpfulnessScore)
//!         .await?;
//!
//!     for review in &reviews {
//!         println!("{:?}: {:?}", review.author_name, review.summary_text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   FetchRequest   ┌──────────────┐   JSON page   ┌────────────┐
//! │ Collector  │ ───────────────► │ PageFetcher  │ ────────────► │ parse_page │
//! │ (cursor    │ ◄─────────────── │ (HTTP, one   │               │ + flatten  │
//! │  loop)     │   ReviewRecords  │  attempt)    │               └────────────┘
//! └─────┬──────┘                  └──────────────┘
//!       │ ReviewCollection
//!       ▼
//! ┌────────────┐
//! │  Output    │  XLSX / CSV / Parquet / JSONL
//! └────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Review records and shared types
pub mod types;

/// Scraper configuration
pub mod config;

/// HTTP client and session tokens
pub mod http;

/// Review query construction and page fetching
pub mod query;

/// Cursor pagination and review collection
pub mod pagination;

/// XLSX/CSV/Parquet/JSONL export
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

pub use config::ScraperConfig;
pub use output::{export_reviews, ExportFormat};
pub use pagination::{CollectOutcome, CollectorState, ReviewCollector};
pub use query::{FetchRequest, ImdbReviewSource, PageFetcher, PageSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
