//! `cache` command: inspect or delete the response cache file.

use clap::Subcommand;
use sellermap_core::CacheConfig;
use sellermap_ingest::CacheStore;

/// Sub-commands available under `cache`.
#[derive(Debug, Subcommand)]
pub enum CacheCommands {
    /// List cached result sets with their pagination figures
    List,
    /// Delete the cache file so the next fetch goes to the API
    Clear,
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub(crate) fn run_cache_list(config: &CacheConfig) {
    let store = CacheStore::new(&config.cache_path);
    let table = store.load();

    if table.is_empty() {
        println!("cache at {} is empty", store.path().display());
        return;
    }

    println!("{} cached result sets in {}", table.len(), store.path().display());
    for (fingerprint, entry) in table.iter() {
        let categories: Vec<&str> = {
            let mut seen: Vec<&str> = entry
                .all_sellers_info
                .iter()
                .map(|s| s.business_category.as_str())
                .collect();
            seen.sort_unstable();
            seen.dedup();
            seen
        };
        let pagination = &entry.pagination;
        println!(
            "{fingerprint}  sellers={} pages={}/{} items={} categories={}{}",
            entry.all_sellers_info.len(),
            pagination.pages_fetched,
            fmt_opt(pagination.total_pages),
            fmt_opt(pagination.total_items),
            if categories.is_empty() {
                "-".to_string()
            } else {
                categories.join(",")
            },
            if pagination.is_partial() { "  (partial)" } else { "" },
        );
    }
}

pub(crate) fn run_cache_clear(config: &CacheConfig) -> anyhow::Result<()> {
    let store = CacheStore::new(&config.cache_path);
    if store.clear()? {
        tracing::info!(path = %store.path().display(), "cache cleared");
        println!("removed {}", store.path().display());
    } else {
        println!("no cache file at {}", store.path().display());
    }
    Ok(())
}
