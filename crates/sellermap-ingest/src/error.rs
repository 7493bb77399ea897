use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: u32 },

    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("invalid API endpoint \"{url}\": {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("API token is empty")]
    MissingToken,

    #[error("cache file I/O error at {path}: {source}")]
    CacheIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode cache table: {0}")]
    CacheEncode(#[source] serde_json::Error),
}

impl IngestError {
    /// Configuration problems detected before any request is sent.
    ///
    /// These are hard stops for the caller; every other variant is a fetch
    /// failure that the pipeline absorbs into an absent result.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            IngestError::InvalidQuery { .. }
                | IngestError::InvalidEndpoint { .. }
                | IngestError::MissingToken
        )
    }
}
