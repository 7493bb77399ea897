//! HTTP client for the seller search endpoint.

mod endpoint;
mod fetch_all;

use std::time::Duration;

use reqwest::{Client, Url};
use sellermap_core::AppConfig;

use crate::error::IngestError;
use crate::types::PageRequest;

pub use endpoint::parse_endpoint;
pub use fetch_all::FetchedPages;

/// Hard cap on pages walked in one fetch, independent of what the server
/// reports. Guards against a missing `totalPages` paired with a `hasNextPage`
/// that never turns false.
pub(crate) const MAX_PAGES: u32 = 500;

/// Client for the seller search API.
///
/// Every request is a `POST` of a JSON [`PageRequest`] with a bearer token.
/// One request is in flight at a time; there is no retry layer. Transport
/// failures and non-2xx statuses surface as typed errors.
pub struct SellerApiClient {
    client: Client,
    endpoint: Url,
    api_token: String,
}

impl SellerApiClient {
    /// Creates a client for `endpoint` with the given timeout and `User-Agent`.
    ///
    /// `accept_invalid_certs` disables TLS certificate verification; some
    /// deployments of the API sit behind self-signed certificates.
    ///
    /// # Errors
    ///
    /// - [`IngestError::InvalidEndpoint`] if `endpoint` is not an absolute
    ///   `http`/`https` URL.
    /// - [`IngestError::MissingToken`] if `api_token` is blank.
    /// - [`IngestError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        endpoint: &str,
        api_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        accept_invalid_certs: bool,
    ) -> Result<Self, IngestError> {
        let endpoint = parse_endpoint(endpoint)?;
        if api_token.trim().is_empty() {
            return Err(IngestError::MissingToken);
        }

        if accept_invalid_certs {
            tracing::warn!(%endpoint, "TLS certificate verification is disabled");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_token: api_token.to_owned(),
        })
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, IngestError> {
        Self::new(
            &config.api_url,
            &config.api_token,
            config.request_timeout_secs,
            &config.user_agent,
            config.accept_invalid_certs,
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Requests one page and returns the raw JSON response body.
    ///
    /// Envelope interpretation (`success`, `data`) is left to the caller; see
    /// [`crate::types::page_payload`].
    ///
    /// # Errors
    ///
    /// - [`IngestError::Http`] on network or TLS failure.
    /// - [`IngestError::UnexpectedStatus`] on any non-2xx status.
    /// - [`IngestError::Deserialize`] if the body is not valid JSON.
    pub async fn fetch_page(
        &self,
        body: &PageRequest<'_>,
    ) -> Result<serde_json::Value, IngestError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| IngestError::Deserialize {
            context: format!("seller page {}", body.page),
            source: e,
        })
    }
}

impl std::fmt::Debug for SellerApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SellerApiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_token", &"[redacted]")
            .finish_non_exhaustive()
    }
}
