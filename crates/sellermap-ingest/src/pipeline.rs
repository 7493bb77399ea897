//! Cache-aware ingestion: consult the cache, otherwise fetch and store.

use sellermap_core::{PaginationSummary, SellerEntity};

use crate::cache::{fingerprint, CacheEntry, CacheStore};
use crate::client::SellerApiClient;
use crate::error::IngestError;
use crate::query::SellerQuery;
use crate::wait::WaitPolicy;

/// Where a [`SellerBatch`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOrigin {
    Cache,
    Remote,
}

/// One category's fully paginated, normalized result set.
#[derive(Debug, Clone)]
pub struct SellerBatch {
    pub fingerprint: String,
    /// Last raw page response of the fetch that produced the batch.
    pub response: serde_json::Value,
    pub pagination: PaginationSummary,
    pub sellers: Vec<SellerEntity>,
    pub origin: BatchOrigin,
}

/// Ties the cache store, the paginated client, and the wait policy together.
///
/// The cache file is read once per [`run`](Self::run) and written at most
/// once, only after a fetch completed.
#[derive(Debug)]
pub struct SellerPipeline {
    client: SellerApiClient,
    cache: CacheStore,
    wait: WaitPolicy,
    refresh: bool,
}

impl SellerPipeline {
    #[must_use]
    pub fn new(client: SellerApiClient, cache: CacheStore) -> Self {
        Self {
            client,
            cache,
            wait: WaitPolicy::default(),
            refresh: false,
        }
    }

    #[must_use]
    pub fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// When set, cached entries are ignored and replaced by a fresh fetch.
    #[must_use]
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    #[must_use]
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Returns the result set for `query`, tagging entities with `category`.
    ///
    /// On a cache hit no request is made. On a miss the fetcher runs to
    /// completion and the result is written back before returning. A failed
    /// cache write is logged and does not discard the fetched data.
    ///
    /// Returns `Ok(None)` when the fetch aborted on a transport or parse
    /// failure; the cache is left untouched in that case.
    ///
    /// # Errors
    ///
    /// Returns configuration errors ([`IngestError::is_configuration`]) such
    /// as an invalid query or blank category, before any request is sent.
    pub async fn run(
        &self,
        query: &SellerQuery,
        category: &str,
    ) -> Result<Option<SellerBatch>, IngestError> {
        query.validate()?;
        if category.trim().is_empty() {
            return Err(IngestError::InvalidQuery {
                reason: "category label is required".to_string(),
            });
        }

        let fingerprint = fingerprint(query);
        let mut table = self.cache.load();

        if self.refresh {
            tracing::info!(category, %fingerprint, "refresh requested; skipping cache");
        } else if let Some(entry) = table.get(&fingerprint) {
            tracing::info!(
                category,
                %fingerprint,
                sellers = entry.all_sellers_info.len(),
                "cache hit"
            );
            let sellers = retag(entry.all_sellers_info.clone(), category);
            return Ok(Some(SellerBatch {
                fingerprint,
                response: entry.response_data.clone(),
                pagination: entry.pagination.clone(),
                sellers,
                origin: BatchOrigin::Cache,
            }));
        } else {
            tracing::info!(category, %fingerprint, "cache miss; fetching from API");
        }

        let fetched = match self
            .client
            .fetch_all_sellers(query, category, &self.wait)
            .await
        {
            Ok(fetched) => fetched,
            Err(e) if e.is_configuration() => return Err(e),
            Err(e) => {
                tracing::error!(category, %fingerprint, error = %e, "seller fetch aborted");
                return Ok(None);
            }
        };

        log_seller_summaries(category, &fetched.sellers);
        tracing::info!(
            category,
            pages_fetched = fetched.pagination.pages_fetched,
            total_pages = ?fetched.pagination.total_pages,
            total_items = ?fetched.pagination.total_items,
            total_sellers = fetched.pagination.total_sellers,
            "seller fetch complete"
        );

        table.put(
            fingerprint.clone(),
            CacheEntry {
                response_data: fetched.last_response.clone(),
                pagination: fetched.pagination.clone(),
                all_sellers_info: fetched.sellers.clone(),
            },
        );
        if let Err(e) = self.cache.save(&table) {
            tracing::warn!(
                path = %self.cache.path().display(),
                error = %e,
                "failed to write cache; result not persisted"
            );
        }

        Ok(Some(SellerBatch {
            fingerprint,
            response: fetched.last_response,
            pagination: fetched.pagination,
            sellers: fetched.sellers,
            origin: BatchOrigin::Remote,
        }))
    }
}

/// Cached entries are keyed by filters only, so two categories with the same
/// filters share an entry; the returned copy carries the caller's label.
fn retag(mut sellers: Vec<SellerEntity>, category: &str) -> Vec<SellerEntity> {
    for seller in &mut sellers {
        if seller.business_category != category {
            seller.business_category = category.to_owned();
        }
    }
    sellers
}

fn log_seller_summaries(category: &str, sellers: &[SellerEntity]) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    for (index, seller) in sellers.iter().enumerate() {
        let urls: Vec<String> = seller
            .contact_urls
            .iter()
            .map(|(channel, url)| format!("{channel}={url}"))
            .collect();
        tracing::debug!(
            category,
            index = index + 1,
            id = seller.id.as_deref().unwrap_or("-"),
            name_th = seller.name_th.as_deref().unwrap_or("-"),
            name_en = seller.name_en.as_deref().unwrap_or("-"),
            province = seller.address.province.as_deref().unwrap_or("-"),
            location = ?seller.location.coordinates(),
            mobile = seller.contact.mobile.as_deref().unwrap_or("-"),
            urls = %urls.join(" "),
            rooms = seller.rooms.len(),
            images = seller.images.len(),
            "seller"
        );
    }
}

#[cfg(test)]
mod tests {
    use sellermap_core::{Address, Contact, ContactUrls, GeoLocation};

    use super::*;

    fn seller(category: &str) -> SellerEntity {
        SellerEntity {
            id: Some("1".to_string()),
            name_th: None,
            name_en: Some("Test".to_string()),
            business_category: category.to_string(),
            address: Address::default(),
            location: GeoLocation::default(),
            contact: Contact::default(),
            contact_urls: ContactUrls::default(),
            rooms: vec![],
            images: vec![],
        }
    }

    #[test]
    fn retag_applies_requested_category() {
        let sellers = retag(vec![seller("accommodation"), seller("restaurant")], "restaurant");
        assert!(sellers.iter().all(|s| s.business_category == "restaurant"));
    }

    #[test]
    fn log_seller_summaries_without_subscriber_is_a_noop() {
        log_seller_summaries("accommodation", &[seller("accommodation")]);
    }
}
