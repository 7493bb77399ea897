//! The document handed to the map renderer.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use sellermap_core::{PaginationSummary, SellerEntity};
use sellermap_ingest::SellerBatch;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct CategorySummary {
    pub category: String,
    pub fingerprint: String,
    pub pagination: PaginationSummary,
}

/// `{generated_at, categories, sellers}`; sellers are concatenated in
/// category order and never de-duplicated across categories.
#[derive(Debug, Serialize)]
pub(crate) struct HandoffDocument {
    pub generated_at: DateTime<Utc>,
    pub categories: Vec<CategorySummary>,
    pub sellers: Vec<SellerEntity>,
}

impl HandoffDocument {
    /// Merges per-category batches in the order given.
    ///
    /// # Errors
    ///
    /// Fails when the merged seller list is empty; the renderer has nothing
    /// to draw in that case.
    pub(crate) fn assemble(
        batches: Vec<(String, SellerBatch)>,
        generated_at: DateTime<Utc>,
    ) -> anyhow::Result<Self> {
        let mut categories = Vec::with_capacity(batches.len());
        let mut sellers = Vec::new();

        for (category, batch) in batches {
            categories.push(CategorySummary {
                category,
                fingerprint: batch.fingerprint,
                pagination: batch.pagination,
            });
            sellers.extend(batch.sellers);
        }

        if sellers.is_empty() {
            anyhow::bail!("no seller data available");
        }

        Ok(Self {
            generated_at,
            categories,
            sellers,
        })
    }

    /// Writes the document as pretty-printed JSON, creating parent
    /// directories as needed.
    pub(crate) fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let encoded = serde_json::to_vec_pretty(self).context("failed to encode hand-off document")?;
        std::fs::write(path, encoded)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use sellermap_core::{Address, Contact, ContactUrls, GeoLocation};
    use sellermap_ingest::BatchOrigin;
    use tempfile::TempDir;

    use super::*;

    fn seller(id: &str, category: &str) -> SellerEntity {
        SellerEntity {
            id: Some(id.to_string()),
            name_th: Some(format!("ร้าน {id}")),
            name_en: None,
            business_category: category.to_string(),
            address: Address::default(),
            location: GeoLocation::default(),
            contact: Contact::default(),
            contact_urls: ContactUrls::default(),
            rooms: vec![],
            images: vec![],
        }
    }

    fn batch(category: &str, ids: &[&str]) -> (String, SellerBatch) {
        (
            category.to_string(),
            SellerBatch {
                fingerprint: format!("fp-{category}"),
                response: serde_json::Value::Null,
                pagination: PaginationSummary {
                    total_pages: Some(1),
                    total_items: Some(ids.len() as u64),
                    pages_fetched: 1,
                    total_sellers: ids.len(),
                },
                sellers: ids.iter().map(|id| seller(id, category)).collect(),
                origin: BatchOrigin::Remote,
            },
        )
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap()
    }

    #[test]
    fn assemble_concatenates_in_category_order_without_dedup() {
        let doc = HandoffDocument::assemble(
            vec![
                batch("accommodation", &["1", "2"]),
                batch("restaurant", &["2"]),
            ],
            timestamp(),
        )
        .unwrap();

        let tags: Vec<(&str, &str)> = doc
            .sellers
            .iter()
            .map(|s| (s.id.as_deref().unwrap(), s.business_category.as_str()))
            .collect();
        assert_eq!(
            tags,
            vec![
                ("1", "accommodation"),
                ("2", "accommodation"),
                ("2", "restaurant")
            ]
        );
        assert_eq!(doc.categories.len(), 2);
        assert_eq!(doc.categories[1].fingerprint, "fp-restaurant");
    }

    #[test]
    fn assemble_fails_when_nothing_was_fetched() {
        let err = HandoffDocument::assemble(vec![batch("accommodation", &[])], timestamp())
            .unwrap_err();
        assert!(err.to_string().contains("no seller data"));

        assert!(HandoffDocument::assemble(vec![], timestamp()).is_err());
    }

    #[test]
    fn write_to_produces_documented_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("sellers.json");
        let doc =
            HandoffDocument::assemble(vec![batch("accommodation", &["1"])], timestamp()).unwrap();
        doc.write_to(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["generated_at"], "2026-10-16T08:00:00Z");
        assert_eq!(value["categories"][0]["category"], "accommodation");
        assert_eq!(value["categories"][0]["pagination"]["pagesFetched"], 1);
        assert_eq!(value["sellers"][0]["name_th"], "ร้าน 1");
    }
}
