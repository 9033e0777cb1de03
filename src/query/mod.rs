//! Request builder
//!
//! Builds and sends a single page request against the reviews endpoint.
//!
//! # Overview
//!
//! - [`FetchRequest`] identifies one page: title, cursor and sort mode
//! - [`PageSource`] opens a [`PageFetcher`] scoped to one collection run
//! - [`ImdbReviewSource`] is the GraphQL implementation, sending the header
//!   bundle from [`ScraperConfig`](crate::config::ScraperConfig) plus a fresh
//!   session token per request
//!
//! The fetcher performs exactly one round trip per call and never looks
//! inside the payload; validating it is the collector's job.

mod request;
mod source;

pub use request::{build_query_params, FetchRequest};
pub use source::{ImdbReviewFetcher, ImdbReviewSource, PageFetcher, PageSource};

#[cfg(test)]
mod tests;
