//! Output module
//!
//! Export sink for collected reviews.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Converting reviews to an Arrow RecordBatch with a fixed schema
//! - Writing Excel, CSV, Parquet or JSON-lines files

mod schema;
mod writer;

pub use schema::{review_schema, reviews_to_batch};
pub use writer::{
    export_reviews, write_batch_to_csv, write_batch_to_jsonl, write_batch_to_parquet,
    write_reviews_to_xlsx, ExportFormat,
};
