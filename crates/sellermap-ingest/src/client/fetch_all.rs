//! Multi-page fetch loop for `SellerApiClient`.

use sellermap_core::{PaginationSummary, SellerEntity};

use crate::error::IngestError;
use crate::pagination::{NextStep, PageFold};
use crate::query::SellerQuery;
use crate::types::page_payload;
use crate::wait::WaitPolicy;

use super::SellerApiClient;
use super::MAX_PAGES;

/// Everything one fetch produced.
#[derive(Debug)]
pub struct FetchedPages {
    /// The last raw page response seen, kept for diagnostics.
    pub last_response: serde_json::Value,
    pub pagination: PaginationSummary,
    /// Normalized entities in page-then-within-page order.
    pub sellers: Vec<SellerEntity>,
}

impl SellerApiClient {
    /// Walks the paged endpoint for `query` until the server runs out of pages.
    ///
    /// Starts at page 1 and stops when a page reports `hasNextPage = false`,
    /// when the page number reaches page 1's `totalPages`, or when a response
    /// signals end-of-data (falsy `success` or missing `data`). Each page's
    /// records are normalized as soon as the page arrives and tagged with
    /// `category`. `wait` is consulted between pages, never after the last.
    ///
    /// **All-or-nothing semantics**: a transport or parse failure on any page
    /// discards what earlier pages produced and returns the error, so a caller
    /// can never cache a truncated result by accident.
    ///
    /// # Errors
    ///
    /// - [`IngestError::InvalidQuery`] before any request if the query or the
    ///   category label is unusable.
    /// - Any error from [`Self::fetch_page`] or from envelope parsing.
    /// - [`IngestError::PaginationLimit`] if more than [`MAX_PAGES`] pages
    ///   would be requested; raised before waiting for the page past the cap.
    pub async fn fetch_all_sellers(
        &self,
        query: &SellerQuery,
        category: &str,
        wait: &WaitPolicy,
    ) -> Result<FetchedPages, IngestError> {
        query.validate()?;
        if category.trim().is_empty() {
            return Err(IngestError::InvalidQuery {
                reason: "category label is required".to_string(),
            });
        }

        let mut fold = PageFold::default();
        let mut last_response: serde_json::Value;
        let mut page = 1u32;

        loop {
            tracing::debug!(page, category, "fetching seller page");
            let raw = self.fetch_page(&query.page_request(page)).await?;
            let payload = page_payload(&raw, page)?;
            last_response = raw;

            let Some(payload) = payload else {
                tracing::warn!(page, category, "page signalled end of data; stopping");
                break;
            };

            let page_count = payload.data.len();
            let (next_fold, step) = fold.absorb(page, payload, category);
            fold = next_fold;

            tracing::info!(
                page,
                total_pages = ?fold.total_pages(),
                count = page_count,
                total_so_far = fold.seller_count(),
                category,
                "fetched seller page"
            );

            match step {
                NextStep::Fetch(next_page) => {
                    if next_page > MAX_PAGES {
                        return Err(IngestError::PaginationLimit {
                            max_pages: MAX_PAGES,
                        });
                    }
                    wait.pause(next_page).await;
                    page = next_page;
                }
                NextStep::Done => break,
            }
        }

        let (pagination, sellers) = fold.finish();
        if pagination.is_partial() {
            tracing::warn!(
                category,
                pages_fetched = pagination.pages_fetched,
                total_pages = ?pagination.total_pages,
                "server stopped paging before its reported page count"
            );
        }

        Ok(FetchedPages {
            last_response,
            pagination,
            sellers,
        })
    }
}
