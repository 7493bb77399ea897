//! `fetch` command: run the pipeline once per enabled query profile and
//! write the merged hand-off document.
//!
//! Categories are fetched one after another. A category whose fetch aborts
//! contributes nothing and the run carries on; configuration errors stop the
//! run immediately.

use std::path::PathBuf;

use anyhow::Context;
use sellermap_core::{AppConfig, QueriesFile, QueryProfile};
use sellermap_ingest::{
    BatchOrigin, CacheStore, SellerApiClient, SellerPipeline, SellerQuery, WaitPolicy,
};

use crate::handoff::HandoffDocument;

/// Picks the profiles to fetch, in file order.
///
/// With a `category_filter`, exactly that profile is returned; it must exist
/// and be enabled.
pub(crate) fn select_profiles<'a>(
    queries: &'a QueriesFile,
    category_filter: Option<&str>,
) -> anyhow::Result<Vec<&'a QueryProfile>> {
    let Some(wanted) = category_filter else {
        let enabled: Vec<&QueryProfile> = queries.enabled().collect();
        for skipped in queries.queries.iter().filter(|q| !q.is_enabled()) {
            tracing::info!(category = %skipped.category, "skipping profile with no business types");
        }
        if enabled.is_empty() {
            anyhow::bail!("no enabled query profiles; add business_types to at least one profile");
        }
        return Ok(enabled);
    };

    let profile = queries
        .queries
        .iter()
        .find(|q| q.category.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| anyhow::anyhow!("category '{wanted}' not found in queries file"))?;
    if !profile.is_enabled() {
        anyhow::bail!("category '{wanted}' has no business types configured");
    }
    Ok(vec![profile])
}

fn seller_query(profile: &QueryProfile) -> SellerQuery {
    SellerQuery::new(
        profile.provinces.clone(),
        profile.business_types.clone(),
        profile.limit,
    )
}

/// Runs the `fetch` command.
///
/// # Errors
///
/// Returns an error if the queries file is invalid, the client cannot be
/// built, a profile is rejected as a configuration error, every category
/// came back empty, or the hand-off document cannot be written.
pub(crate) async fn run_fetch(
    config: &AppConfig,
    category_filter: Option<&str>,
    refresh: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let queries = sellermap_core::load_queries(&config.queries_path).with_context(|| {
        format!(
            "failed to load query profiles from {}",
            config.queries_path.display()
        )
    })?;
    let profiles = select_profiles(&queries, category_filter)?;

    let client = SellerApiClient::from_config(config).context("failed to build API client")?;
    let pipeline = SellerPipeline::new(client, CacheStore::new(&config.cache_path))
        .with_wait(WaitPolicy::uniform_ms(
            config.page_delay_min_ms..=config.page_delay_max_ms,
        ))
        .with_refresh(refresh);

    let mut batches = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let query = seller_query(profile);
        let outcome = pipeline
            .run(&query, &profile.category)
            .await
            .with_context(|| format!("invalid query profile '{}'", profile.category))?;

        match outcome {
            Some(batch) => {
                tracing::info!(
                    category = %profile.category,
                    sellers = batch.sellers.len(),
                    from_cache = batch.origin == BatchOrigin::Cache,
                    "category ready"
                );
                batches.push((profile.category.clone(), batch));
            }
            None => {
                tracing::warn!(category = %profile.category, "category fetch failed; continuing without it");
            }
        }
    }

    let document = HandoffDocument::assemble(batches, chrono::Utc::now())?;
    let output_path = output.unwrap_or_else(|| config.output_path.clone());
    document.write_to(&output_path)?;

    tracing::info!(
        path = %output_path.display(),
        categories = document.categories.len(),
        sellers = document.sellers.len(),
        "hand-off document written"
    );
    println!(
        "wrote {} sellers from {} categories to {}",
        document.sellers.len(),
        document.categories.len(),
        output_path.display()
    );

    Ok(())
}
