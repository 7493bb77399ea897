//! Query parameters for one fetch run.

use serde::Serialize;

use crate::error::IngestError;
use crate::types::PageRequest;

/// Filters and page size for one fully-paginated fetch.
///
/// List values are canonicalized on construction (trimmed, blanks dropped,
/// duplicates removed keeping first occurrence), and the same lists feed
/// both the request body and the cache fingerprint. Two queries that differ
/// only in list order describe the same result set and share a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerQuery {
    provinces: Vec<String>,
    business_types: Vec<String>,
    limit: u32,
}

impl SellerQuery {
    #[must_use]
    pub fn new(provinces: Vec<String>, business_types: Vec<String>, limit: u32) -> Self {
        Self {
            provinces: canonical(provinces),
            business_types: canonical(business_types),
            limit,
        }
    }

    /// Region filter. Empty means no filter.
    #[must_use]
    pub fn provinces(&self) -> &[String] {
        &self.provinces
    }

    /// Business type codes. Must be non-empty to fetch.
    #[must_use]
    pub fn business_types(&self) -> &[String] {
        &self.business_types
    }

    /// Page size. Must be positive to fetch.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rejects queries the API cannot serve.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::InvalidQuery`] when there are no business types or
    /// the page size is zero.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.business_types.is_empty() {
            return Err(IngestError::InvalidQuery {
                reason: "at least one business type is required".to_string(),
            });
        }
        if self.limit == 0 {
            return Err(IngestError::InvalidQuery {
                reason: "page size must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Request body for `page` (1-based).
    #[must_use]
    pub fn page_request(&self, page: u32) -> PageRequest<'_> {
        PageRequest {
            limit: self.limit,
            business_type: &self.business_types,
            province: &self.provinces,
            page,
        }
    }
}

fn canonical(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let trimmed = value.trim();
        if !trimmed.is_empty() && !out.iter().any(|v| v == trimmed) {
            out.push(trimmed.to_owned());
        }
    }
    out
}
