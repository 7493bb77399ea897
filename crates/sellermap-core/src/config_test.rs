use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("API_URL", "https://api.example.test/sellers/search");
    m.insert("API_TOKEN", "test-token");
    m
}

#[test]
fn parse_flag_accepts_common_spellings() {
    assert_eq!(parse_flag("true"), Some(true));
    assert_eq!(parse_flag("YES"), Some(true));
    assert_eq!(parse_flag("1"), Some(true));
    assert_eq!(parse_flag("false"), Some(false));
    assert_eq!(parse_flag(" no "), Some(false));
    assert_eq!(parse_flag("0"), Some(false));
    assert_eq!(parse_flag("maybe"), None);
}

#[test]
fn build_app_config_fails_without_api_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "API_URL"),
        "expected MissingEnvVar(API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_api_token() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("API_URL", "https://api.example.test/sellers/search");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "API_TOKEN"),
        "expected MissingEnvVar(API_TOKEN), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_token_as_missing() {
    let mut map = full_env();
    map.insert("API_TOKEN", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "API_TOKEN"),
        "expected MissingEnvVar(API_TOKEN), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.api_url, "https://api.example.test/sellers/search");
    assert_eq!(cfg.api_token, "test-token");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.queries_path.to_str(), Some("./config/queries.yaml"));
    assert_eq!(cfg.cache_path.to_str(), Some("./api_cache.json"));
    assert_eq!(cfg.output_path.to_str(), Some("./sellers.json"));
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "sellermap/0.1 (listing-ingest)");
    assert_eq!(cfg.page_delay_min_ms, 700);
    assert_eq!(cfg.page_delay_max_ms, 1500);
    assert!(!cfg.accept_invalid_certs);
}

#[test]
fn debug_output_redacts_api_token() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(debug.contains("[redacted]"));
    assert!(!debug.contains("test-token"));
}

#[test]
fn cache_path_override() {
    let mut map = full_env();
    map.insert("SELLERMAP_CACHE_PATH", "/tmp/sellermap/cache.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.cache_path.to_str(), Some("/tmp/sellermap/cache.json"));
}

#[test]
fn request_timeout_secs_override() {
    let mut map = full_env();
    map.insert("SELLERMAP_REQUEST_TIMEOUT_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 60);
}

#[test]
fn request_timeout_secs_invalid() {
    let mut map = full_env();
    map.insert("SELLERMAP_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SELLERMAP_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(SELLERMAP_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn page_delay_override() {
    let mut map = full_env();
    map.insert("SELLERMAP_PAGE_DELAY_MIN_MS", "0");
    map.insert("SELLERMAP_PAGE_DELAY_MAX_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.page_delay_min_ms, 0);
    assert_eq!(cfg.page_delay_max_ms, 0);
}

#[test]
fn page_delay_min_above_max_is_rejected() {
    let mut map = full_env();
    map.insert("SELLERMAP_PAGE_DELAY_MIN_MS", "2000");
    map.insert("SELLERMAP_PAGE_DELAY_MAX_MS", "1000");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SELLERMAP_PAGE_DELAY_MIN_MS"),
        "expected InvalidEnvVar(SELLERMAP_PAGE_DELAY_MIN_MS), got: {result:?}"
    );
}

#[test]
fn page_delay_max_invalid() {
    let mut map = full_env();
    map.insert("SELLERMAP_PAGE_DELAY_MAX_MS", "-5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SELLERMAP_PAGE_DELAY_MAX_MS"),
        "expected InvalidEnvVar(SELLERMAP_PAGE_DELAY_MAX_MS), got: {result:?}"
    );
}

#[test]
fn accept_invalid_certs_override() {
    let mut map = full_env();
    map.insert("SELLERMAP_ACCEPT_INVALID_CERTS", "true");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.accept_invalid_certs);
}

#[test]
fn accept_invalid_certs_invalid() {
    let mut map = full_env();
    map.insert("SELLERMAP_ACCEPT_INVALID_CERTS", "sometimes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SELLERMAP_ACCEPT_INVALID_CERTS"),
        "expected InvalidEnvVar(SELLERMAP_ACCEPT_INVALID_CERTS), got: {result:?}"
    );
}

#[test]
fn user_agent_override() {
    let mut map = full_env();
    map.insert("SELLERMAP_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
}

#[test]
fn build_cache_config_needs_no_api_credentials() {
    let map: HashMap<&str, &str> = HashMap::new();
    let config = build_cache_config(&lookup_from_map(&map));
    assert_eq!(config.log_level, "info");
    assert_eq!(config.cache_path, std::path::PathBuf::from("./api_cache.json"));
}

#[test]
fn build_cache_config_matches_app_config_overrides() {
    let mut map = full_env();
    map.insert("SELLERMAP_CACHE_PATH", "/tmp/sellermap/cache.json");
    map.insert("SELLERMAP_LOG_LEVEL", "debug");
    let cache = build_cache_config(&lookup_from_map(&map));
    let app = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cache.cache_path, app.cache_path);
    assert_eq!(cache.log_level, app.log_level);
    assert_eq!(cache.log_level, "debug");
}
