//! Endpoint URL validation for the seller API client.

use reqwest::Url;

use crate::error::IngestError;

/// Parses the configured API endpoint.
///
/// The endpoint is used as-is (path and query included); only absolute
/// `http`/`https` URLs with a host are accepted.
///
/// # Errors
///
/// Returns [`IngestError::InvalidEndpoint`] for blank, relative, or non-HTTP URLs.
pub fn parse_endpoint(raw: &str) -> Result<Url, IngestError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IngestError::InvalidEndpoint {
            url: raw.to_owned(),
            reason: "endpoint URL is empty".to_string(),
        });
    }

    let url = Url::parse(trimmed).map_err(|e| IngestError::InvalidEndpoint {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(IngestError::InvalidEndpoint {
            url: raw.to_owned(),
            reason: format!("unsupported scheme \"{}\"", url.scheme()),
        });
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(IngestError::InvalidEndpoint {
            url: raw.to_owned(),
            reason: "endpoint URL has no host".to_string(),
        });
    }

    Ok(url)
}
