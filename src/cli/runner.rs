//! CLI runner - collects reviews and writes them out

use crate::cli::commands::Cli;
use crate::config::ScraperConfig;
use crate::error::{Result, ResultExt};
use crate::output::{export_reviews, ExportFormat};
use crate::pagination::{CollectOutcome, ReviewCollector};
use crate::query::ImdbReviewSource;
use crate::types::{Completion, SortMode};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Where the reviews were (or would have been) written
    pub output: PathBuf,
    /// Rows written, 0 when nothing was extracted
    pub rows_written: usize,
    /// How collection ended
    pub completion: Completion,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the scraper
    pub async fn run(&self) -> Result<RunReport> {
        // Reject bad sort modes before touching the network
        let sort_mode: SortMode = self.cli.sort_by.parse()?;
        let config = self.load_config()?;
        let output = self.output_path(sort_mode);
        let format = self.export_format();

        println!(
            "Starting IMDb review scraper for title ID: {}",
            self.cli.resource_id
        );
        println!("Sorting reviews by: {sort_mode}");
        println!("Output file will be saved as: {}", output.display());

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        let mut collector =
            ReviewCollector::new(ImdbReviewSource::new(config.clone())).with_cancellation(cancel);
        if let Some(max_pages) = config.max_pages {
            collector = collector.with_max_pages(max_pages);
        }

        let outcome = collector.collect(&self.cli.resource_id, sort_mode).await;
        interrupt.abort();

        let CollectOutcome {
            collection, error, ..
        } = outcome;

        if let Some(error) = error {
            if !self.cli.keep_partial || collection.is_empty() {
                return Err(error);
            }
            warn!(
                "Fetching stopped early ({error}); writing {} reviews gathered so far",
                collection.len()
            );
        }

        if collection.is_empty() {
            println!("No reviews were extracted.");
            println!(
                "Please check the title ID and try again. If the issue persists, it might be a problem with the IMDb API."
            );
            return Ok(RunReport {
                output,
                rows_written: 0,
                completion: collection.completion(),
            });
        }

        let rows_written = export_reviews(&output, &collection, format)
            .with_context(|| format!("Could not save reviews to {}", output.display()))?;
        println!("Reviews successfully saved to {}", output.display());
        if !collection.is_complete() {
            println!("Note: the export is incomplete, fetching stopped before the last page.");
        }

        Ok(RunReport {
            output,
            rows_written,
            completion: collection.completion(),
        })
    }

    /// Load configuration, then apply command-line overrides
    pub fn load_config(&self) -> Result<ScraperConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ScraperConfig::from_file(path)?,
            None => ScraperConfig::default(),
        };

        if let Some(timeout) = self.cli.timeout_secs {
            config.timeout_secs = Some(timeout);
        }
        if let Some(max_pages) = self.cli.max_pages {
            config.max_pages = Some(max_pages);
        }

        config.validate()?;
        Ok(config)
    }

    /// Output path, derived from the title and sort mode unless given
    pub fn output_path(&self, sort_mode: SortMode) -> PathBuf {
        self.cli.output.clone().unwrap_or_else(|| {
            let ext = self.cli.format.unwrap_or_default().extension();
            PathBuf::from(format!(
                "imdb_reviews_{}_{sort_mode}.{ext}",
                self.cli.resource_id
            ))
        })
    }

    /// Explicit format, else inferred from the output extension, else Excel
    pub fn export_format(&self) -> ExportFormat {
        self.cli
            .format
            .or_else(|| self.cli.output.as_ref().and_then(ExportFormat::from_path))
            .unwrap_or_default()
    }
}
