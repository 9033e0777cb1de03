//! Arrow schema for review records
//!
//! Converts flattened reviews into a single Arrow RecordBatch whose columns
//! follow [`ReviewRecord`] field order.

use crate::error::{Error, Result};
use crate::types::ReviewRecord;
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Schema shared by every export format
pub fn review_schema() -> SchemaRef {
    let [author_id, author_name, summary_text, body_text, submission_date, upvotes, downvotes, helpfulness_score, author_rating] =
        ReviewRecord::COLUMNS;

    Arc::new(Schema::new(vec![
        Field::new(author_id, DataType::Utf8, true),
        Field::new(author_name, DataType::Utf8, true),
        Field::new(summary_text, DataType::Utf8, true),
        Field::new(body_text, DataType::Utf8, true),
        Field::new(submission_date, DataType::Utf8, true),
        Field::new(upvotes, DataType::Int64, false),
        Field::new(downvotes, DataType::Int64, false),
        Field::new(helpfulness_score, DataType::Float64, false),
        Field::new(author_rating, DataType::Int64, true),
    ]))
}

/// Convert reviews to a RecordBatch, one row per review
pub fn reviews_to_batch(records: &[ReviewRecord]) -> Result<RecordBatch> {
    let schema = review_schema();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter(
            records.iter().map(|r| r.author_id.as_deref()),
        )),
        Arc::new(StringArray::from_iter(
            records.iter().map(|r| r.author_name.as_deref()),
        )),
        Arc::new(StringArray::from_iter(
            records.iter().map(|r| r.summary_text.as_deref()),
        )),
        Arc::new(StringArray::from_iter(
            records.iter().map(|r| r.body_text.as_deref()),
        )),
        Arc::new(StringArray::from_iter(
            records.iter().map(|r| r.submission_date.as_deref()),
        )),
        Arc::new(Int64Array::from_iter_values(records.iter().map(|r| r.upvotes))),
        Arc::new(Int64Array::from_iter_values(records.iter().map(|r| r.downvotes))),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.helpfulness_score),
        )),
        Arc::new(Int64Array::from_iter(records.iter().map(|r| r.author_rating))),
    ];

    RecordBatch::try_new(schema, columns).map_err(|e| Error::Output {
        message: format!("Failed to create RecordBatch: {e}"),
    })
}
