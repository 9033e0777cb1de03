//! CLI argument parsing

use crate::output::ExportFormat;
use clap::Parser;
use std::path::PathBuf;

/// Export the user reviews of an IMDb title
#[derive(Parser, Debug)]
#[command(name = "imdb-reviews")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// IMDb title ID (e.g. tt11280740), found in the title's URL
    pub resource_id: String,

    /// Review ordering: HELPFULNESS_SCORE or SUBMISSION_DATE
    #[arg(short, long, default_value = "HELPFULNESS_SCORE")]
    pub sort_by: String,

    /// Output file (default: imdb_reviews_<id>_<sort>.<ext>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (default: from the output extension, else xlsx)
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// Scraper configuration file (YAML or JSON)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Stop with an error after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Write the reviews gathered before a failure instead of nothing
    #[arg(long)]
    pub keep_partial: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
