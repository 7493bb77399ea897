use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub api_token: String,
    pub log_level: String,
    pub queries_path: PathBuf,
    pub cache_path: PathBuf,
    pub output_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub page_delay_min_ms: u64,
    pub page_delay_max_ms: u64,
    pub accept_invalid_certs: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("queries_path", &self.queries_path)
            .field("cache_path", &self.cache_path)
            .field("output_path", &self.output_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_delay_min_ms", &self.page_delay_min_ms)
            .field("page_delay_max_ms", &self.page_delay_max_ms)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

/// Settings for commands that only touch the local cache file. Loading this
/// does not require API credentials.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub log_level: String,
    pub cache_path: PathBuf,
}
