use crate::app_config::{AppConfig, CacheConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files; useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load only the cache-related settings (`SELLERMAP_LOG_LEVEL`,
/// `SELLERMAP_CACHE_PATH`), loading `.env` first.
///
/// Unlike [`load_app_config`], this never requires `API_URL` or `API_TOKEN`.
#[must_use]
pub fn load_cache_config() -> CacheConfig {
    dotenvy::dotenv().ok();
    build_cache_config(&|key: &str| std::env::var(key))
}

fn build_cache_config<F>(lookup: &F) -> CacheConfig
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    CacheConfig {
        log_level: lookup("SELLERMAP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        cache_path: lookup("SELLERMAP_CACHE_PATH")
            .map_or_else(|_| "./api_cache.json".into(), std::path::PathBuf::from),
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup, no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    // An empty value in `.env` is as unusable as a missing one.
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        parse_flag(&raw).ok_or_else(|| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{raw}\""),
        })
    };

    let api_url = require("API_URL")?;
    let api_token = require("API_TOKEN")?;

    let CacheConfig {
        log_level,
        cache_path,
    } = build_cache_config(&lookup);
    let queries_path = PathBuf::from(or_default(
        "SELLERMAP_QUERIES_PATH",
        "./config/queries.yaml",
    ));
    let output_path = PathBuf::from(or_default("SELLERMAP_OUTPUT_PATH", "./sellers.json"));

    let request_timeout_secs = parse_u64("SELLERMAP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SELLERMAP_USER_AGENT", "sellermap/0.1 (listing-ingest)");
    let page_delay_min_ms = parse_u64("SELLERMAP_PAGE_DELAY_MIN_MS", "700")?;
    let page_delay_max_ms = parse_u64("SELLERMAP_PAGE_DELAY_MAX_MS", "1500")?;
    let accept_invalid_certs = parse_bool("SELLERMAP_ACCEPT_INVALID_CERTS", "false")?;

    if page_delay_min_ms > page_delay_max_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "SELLERMAP_PAGE_DELAY_MIN_MS".to_string(),
            reason: format!(
                "minimum delay {page_delay_min_ms}ms exceeds maximum delay {page_delay_max_ms}ms"
            ),
        });
    }

    Ok(AppConfig {
        api_url,
        api_token,
        log_level,
        queries_path,
        cache_path,
        output_path,
        request_timeout_secs,
        user_agent,
        page_delay_min_ms,
        page_delay_max_ms,
        accept_invalid_certs,
    })
}

/// Parse a boolean flag value. Accepts `true`/`false`, `1`/`0`, `yes`/`no`.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
