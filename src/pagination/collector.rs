//! Review collector
//!
//! Drives a [`PageFetcher`] page by page until the server runs out of
//! cursors, accumulating flattened records in delivery order.

use super::page::{parse_page, PageContent};
use super::types::{CollectOutcome, CollectorState, NextPage, PaginationState};
use crate::error::{Error, Result};
use crate::query::{FetchRequest, PageFetcher, PageSource};
use crate::types::{Completion, JsonValue, ReviewCollection, ReviewRecord, SortMode};
use futures::Stream;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace};

/// Stream state: the run's fetcher once opened, the next request, and cursor bookkeeping
type PageSeed<F> = Option<(Option<F>, Result<FetchRequest>, PaginationState)>;

/// One processed page
enum Step {
    NoReviews,
    Page {
        records: Vec<ReviewRecord>,
        next: Option<FetchRequest>,
    },
}

/// Collects every review of a title from a [`PageSource`]
///
/// Pages are fetched strictly one after another. Each call to
/// [`collect`](Self::collect) opens its own fetcher from the source and drops
/// it when the run ends, so one collector can serve independent runs
/// concurrently.
#[derive(Debug)]
pub struct ReviewCollector<S> {
    source: S,
    max_pages: Option<usize>,
    cancel: Option<CancellationToken>,
}

impl<S: PageSource> ReviewCollector<S> {
    /// Create a collector with no page ceiling and no cancellation
    pub fn new(source: S) -> Self {
        Self {
            source,
            max_pages: None,
            cancel: None,
        }
    }

    /// Fail with a pagination loop error rather than fetch more than `max_pages`
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Abort in-flight fetches once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Collect every review, failing on the first error
    pub async fn collect_all(
        &self,
        resource_id: &str,
        sort_mode: SortMode,
    ) -> Result<ReviewCollection> {
        self.collect(resource_id, sort_mode).await.into_result()
    }

    /// Like [`collect_all`](Self::collect_all), taking the sort mode by wire name
    ///
    /// Unknown names fail with `InvalidArgument` before anything is fetched.
    pub async fn collect_all_by_name(
        &self,
        resource_id: &str,
        sort_mode: &str,
    ) -> Result<ReviewCollection> {
        let sort_mode: SortMode = sort_mode.parse()?;
        self.collect_all(resource_id, sort_mode).await
    }

    /// Collect every review, keeping whatever was gathered if a page fails
    pub async fn collect(&self, resource_id: &str, sort_mode: SortMode) -> CollectOutcome {
        let mut collection = ReviewCollection::new();

        let mut request = match FetchRequest::first_page(resource_id, sort_mode) {
            Ok(request) => request,
            Err(e) => return CollectOutcome::failed(collection, e),
        };
        let fetcher = match self.source.open() {
            Ok(fetcher) => fetcher,
            Err(e) => return CollectOutcome::failed(collection, e),
        };
        let mut pagination = PaginationState::with_max_pages(self.max_pages);

        loop {
            info!(
                "Fetching page {} for title '{}' (sorting by {})",
                pagination.pages + 1,
                resource_id,
                sort_mode
            );

            match self.step(&fetcher, &request, &mut pagination).await {
                Ok(Step::NoReviews) => {
                    info!("No reviews found for title '{resource_id}'");
                    if collection.is_empty() {
                        collection.set_completion(Completion::NoReviews);
                    }
                    return CollectOutcome::done(collection);
                }
                Ok(Step::Page { records, next }) => {
                    let count = records.len();
                    collection.extend_page(records);
                    info!(
                        "Retrieved {count} reviews on this page. Total reviews fetched so far: {}",
                        collection.len()
                    );

                    match next {
                        Some(next) => request = next,
                        None => {
                            info!(
                                "All pages fetched for title '{resource_id}'. Total reviews extracted: {}",
                                collection.len()
                            );
                            return CollectOutcome::done(collection);
                        }
                    }
                }
                Err(e) => {
                    trace!(state = %CollectorState::Failed, "collector transition");
                    return CollectOutcome::failed(collection, e);
                }
            }
        }
    }

    /// Stream reviews one page at a time
    ///
    /// The stream ends after the last page, or right after yielding the first
    /// error. A title without reviews yields nothing.
    pub fn pages<'a>(
        &'a self,
        resource_id: &str,
        sort_mode: SortMode,
    ) -> impl Stream<Item = Result<Vec<ReviewRecord>>> + 'a {
        let first = FetchRequest::first_page(resource_id, sort_mode);
        let pagination = PaginationState::with_max_pages(self.max_pages);

        futures::stream::try_unfold(Some((None, first, pagination)), move |seed| {
            self.next_page(seed)
        })
    }

    async fn next_page(
        &self,
        seed: PageSeed<S::Fetcher>,
    ) -> Result<Option<(Vec<ReviewRecord>, PageSeed<S::Fetcher>)>> {
        let Some((fetcher, request, mut pagination)) = seed else {
            return Ok(None);
        };
        let request = request?;
        let fetcher = match fetcher {
            Some(fetcher) => fetcher,
            None => self.source.open()?,
        };

        match self.step(&fetcher, &request, &mut pagination).await? {
            Step::NoReviews => Ok(None),
            Step::Page { records, next } => {
                let seed = next.map(|next| (Some(fetcher), Ok(next), pagination));
                Ok(Some((records, seed)))
            }
        }
    }

    /// Fetch, validate, extract and advance for one page
    async fn step(
        &self,
        fetcher: &S::Fetcher,
        request: &FetchRequest,
        pagination: &mut PaginationState,
    ) -> Result<Step> {
        trace!(state = %CollectorState::Fetching, cursor = %request.cursor, "collector transition");
        let body = self.fetch_page(fetcher, request).await?;

        trace!(state = %CollectorState::Validating, "collector transition");
        let content = parse_page(&body)?;

        let PageContent::Reviews {
            records,
            end_cursor,
        } = content
        else {
            trace!(state = %CollectorState::Done, "collector transition");
            return Ok(Step::NoReviews);
        };

        trace!(state = %CollectorState::Extracting, records = records.len(), "collector transition");

        trace!(state = %CollectorState::Advancing, "collector transition");
        let next = match pagination.advance(end_cursor)? {
            NextPage::Continue(cursor) => Some(request.with_cursor(cursor)),
            NextPage::Done => {
                trace!(state = %CollectorState::Done, "collector transition");
                None
            }
        };

        Ok(Step::Page { records, next })
    }

    async fn fetch_page(&self, fetcher: &S::Fetcher, request: &FetchRequest) -> Result<JsonValue> {
        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => Err(Error::Cancelled),
                    result = fetcher.fetch(request) => result,
                }
            }
            None => fetcher.fetch(request).await,
        }
    }
}
