//! Review export writers
//!
//! Writes a [`ReviewCollection`] as an Excel workbook, CSV, Parquet or JSON
//! lines. Every format carries the column names: a header row, the Parquet
//! schema, or the keys of each JSON object.

use super::schema::reviews_to_batch;
use crate::error::{Error, Result};
use crate::types::{ReviewCollection, ReviewRecord};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Worksheet holding the exported reviews
const SHEET_NAME: &str = "Reviews";

/// File format for exported reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    /// Excel workbook with a header row
    #[default]
    Xlsx,
    /// Comma-separated values with a header row
    Csv,
    /// Apache Parquet
    Parquet,
    /// One JSON object per line
    Jsonl,
}

impl ExportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(Self::Xlsx),
            "csv" => Some(Self::Csv),
            "parquet" | "pq" => Some(Self::Parquet),
            "jsonl" | "ndjson" => Some(Self::Jsonl),
            _ => None,
        }
    }

    /// Default file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Parquet => "parquet",
            Self::Jsonl => "jsonl",
        }
    }
}

/// Write reviews to `path`, returning the number of rows written
///
/// An empty collection writes nothing and leaves `path` untouched.
pub fn export_reviews(
    path: impl AsRef<Path>,
    reviews: &ReviewCollection,
    format: ExportFormat,
) -> Result<usize> {
    if reviews.is_empty() {
        return Ok(0);
    }

    let path = path.as_ref();
    debug!(
        path = %path.display(),
        rows = reviews.len(),
        ?format,
        "Exporting reviews"
    );

    let records = reviews.records();
    match format {
        ExportFormat::Xlsx => write_reviews_to_xlsx(path, records),
        ExportFormat::Csv => write_batch_to_csv(path, &reviews_to_batch(records)?),
        ExportFormat::Parquet => write_batch_to_parquet(path, &reviews_to_batch(records)?),
        ExportFormat::Jsonl => write_batch_to_jsonl(path, &reviews_to_batch(records)?),
    }
}

// ============================================================================
// Excel
// ============================================================================

/// Write reviews to a single-sheet workbook
///
/// Row 0 holds the column names. Null fields are left as empty cells.
pub fn write_reviews_to_xlsx(path: impl AsRef<Path>, records: &[ReviewRecord]) -> Result<usize> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, name) in ReviewRecord::COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &bold)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = u32::try_from(index + 1).map_err(|_| Error::Output {
            message: format!("Too many rows for a worksheet: {}", records.len()),
        })?;
        write_xlsx_row(sheet, row, record)?;
    }

    workbook.save(path.as_ref())?;
    Ok(records.len())
}

#[allow(clippy::cast_precision_loss)]
fn write_xlsx_row(sheet: &mut Worksheet, row: u32, record: &ReviewRecord) -> Result<()> {
    let text_cells = [
        (0, record.author_id.as_deref()),
        (1, record.author_name.as_deref()),
        (2, record.summary_text.as_deref()),
        (3, record.body_text.as_deref()),
        (4, record.submission_date.as_deref()),
    ];
    for (col, value) in text_cells {
        if let Some(value) = value {
            sheet.write_string(row, col, value)?;
        }
    }

    sheet.write_number(row, 5, record.upvotes as f64)?;
    sheet.write_number(row, 6, record.downvotes as f64)?;
    sheet.write_number(row, 7, record.helpfulness_score)?;
    if let Some(rating) = record.author_rating {
        sheet.write_number(row, 8, rating as f64)?;
    }
    Ok(())
}

fn create_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| Error::Output {
        message: format!("Failed to create file {}: {e}", path.display()),
    })
}

/// Write a RecordBatch as CSV with a header row
pub fn write_batch_to_csv(path: impl AsRef<Path>, batch: &RecordBatch) -> Result<usize> {
    let file = create_file(path.as_ref())?;
    let mut writer = arrow::csv::WriterBuilder::new()
        .with_header(true)
        .build(file);
    writer.write(batch)?;
    Ok(batch.num_rows())
}

/// Write a RecordBatch as JSON lines, keeping null fields
pub fn write_batch_to_jsonl(path: impl AsRef<Path>, batch: &RecordBatch) -> Result<usize> {
    let file = create_file(path.as_ref())?;
    let mut writer = arrow::json::WriterBuilder::new()
        .with_explicit_nulls(true)
        .build::<_, arrow::json::writer::LineDelimited>(file);
    writer.write(batch)?;
    writer.finish()?;
    Ok(batch.num_rows())
}

// ============================================================================
// Parquet
// ============================================================================

/// Write a single RecordBatch to a Snappy-compressed Parquet file
pub fn write_batch_to_parquet(path: impl AsRef<Path>, batch: &RecordBatch) -> Result<usize> {
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let file = create_file(path.as_ref())?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .map_err(|e| Error::Output {
            message: format!("Failed to create Parquet writer: {e}"),
        })?;

    writer.write(batch).map_err(|e| Error::Output {
        message: format!("Failed to write batch: {e}"),
    })?;
    writer.close().map_err(|e| Error::Output {
        message: format!("Failed to close Parquet writer: {e}"),
    })?;

    Ok(batch.num_rows())
}
