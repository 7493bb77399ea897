//! Page-by-page accumulation for the seller search endpoint.
//!
//! The fetch loop is a reduction over pages: each accepted page is folded into
//! a [`PageFold`], which returns the updated fold together with the decision
//! whether to request another page. Nothing here performs I/O.

use sellermap_core::{PaginationSummary, SellerEntity};

use crate::normalize::normalize_page;
use crate::types::PagePayload;

/// What the fetch loop should do after folding a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Request this page next.
    Fetch(u32),
    /// Stop: the server reported no next page, or the page ceiling was reached.
    Done,
}

/// Running result of a fetch.
#[derive(Debug, Default)]
pub struct PageFold {
    total_pages: Option<u32>,
    total_items: Option<u64>,
    pages_fetched: u32,
    sellers: Vec<SellerEntity>,
}

impl PageFold {
    /// Folds page `page` into the running result.
    ///
    /// Server totals are captured from page 1 only and never revised. Records
    /// are normalized immediately and appended in page order.
    #[must_use]
    pub fn absorb(self, page: u32, payload: PagePayload, category: &str) -> (Self, NextStep) {
        let (total_pages, total_items) = if page == 1 {
            (payload.total_pages, payload.total_items)
        } else {
            (self.total_pages, self.total_items)
        };

        let has_next_page = payload.has_next_page();
        let mut sellers = self.sellers;
        sellers.extend(normalize_page(payload.data, category));

        let folded = Self {
            total_pages,
            total_items,
            pages_fetched: self.pages_fetched + 1,
            sellers,
        };
        let step = next_step(page, has_next_page, total_pages);
        (folded, step)
    }

    /// Server-reported page count from page 1, if any.
    #[must_use]
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    #[must_use]
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    #[must_use]
    pub fn seller_count(&self) -> usize {
        self.sellers.len()
    }

    /// Closes the fold into the pagination summary and the ordered entities.
    #[must_use]
    pub fn finish(self) -> (PaginationSummary, Vec<SellerEntity>) {
        let summary = PaginationSummary {
            total_pages: self.total_pages,
            total_items: self.total_items,
            pages_fetched: self.pages_fetched,
            total_sellers: self.sellers.len(),
        };
        (summary, self.sellers)
    }
}

/// Stops on `hasNextPage = false` or once `page` reaches the page ceiling,
/// whichever comes first. Without a ceiling only the flag decides.
#[must_use]
pub fn next_step(page: u32, has_next_page: bool, page_ceiling: Option<u32>) -> NextStep {
    let ceiling_reached = page_ceiling.is_some_and(|ceiling| page >= ceiling);
    if !has_next_page || ceiling_reached {
        NextStep::Done
    } else {
        NextStep::Fetch(page + 1)
    }
}
