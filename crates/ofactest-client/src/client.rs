//! OFAC HTTP client implementation.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::error::ClientError;
use crate::types::{ApiErrorResponse, Download, SearchOptions, SearchResponse};

/// OFAC API client.
///
/// Every method reads the response body to completion before judging the
/// status, so connections always go back to the pool.
#[derive(Debug, Clone)]
pub struct OfacClient {
    client: Client,
    base_url: String,
}

impl OfacClient {
    /// Create a new client with default options.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the OFAC service (e.g., `"http://localhost:8084"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the bearer token is not a
    /// valid header value, or [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &options.bearer_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ClientError::Configuration(format!("invalid bearer token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(options.timeout)
            .pool_idle_timeout(options.idle_timeout)
            .user_agent(options.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Liveness probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns a non-2xx status.
    pub async fn ping(&self) -> Result<(), ClientError> {
        let url = format!("{}/ping", self.base_url);
        let response = self.client.get(&url).send().await?;
        Self::read_body(response).await.map(|_| ())
    }

    /// Most recent data refreshes, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server returns a non-2xx
    /// status, or the body is not a list of downloads.
    pub async fn latest_downloads(&self, limit: u32) -> Result<Vec<Download>, ClientError> {
        let url = format!("{}/downloads", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fuzzy search across SDN and alternate names.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server returns a non-2xx
    /// status, or the body is not a search response.
    pub async fn search(&self, options: &SearchOptions) -> Result<SearchResponse, ClientError> {
        let url = format!("{}/search", self.base_url);
        let response = self.client.get(&url).query(options).send().await?;

        let body = Self::read_body(response).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Drain the body, then convert non-2xx statuses into [`ClientError::Api`].
    async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, ClientError> {
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.bytes().await?;
        debug!(%status, path = %url, bytes = body.len(), "response received");

        if status.is_success() {
            return Ok(body.to_vec());
        }

        let message = match serde_json::from_slice::<ApiErrorResponse>(&body) {
            Ok(api_error) => api_error.error,
            Err(_) => String::from_utf8_lossy(&body).trim().to_string(),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Overall request timeout (default: 10s).
    pub timeout: Duration,
    /// How long idle pooled connections are kept (default: 60s).
    pub idle_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// OAuth bearer token sent on every request.
    pub bearer_token: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(60),
            user_agent: format!("moov/ofactest:{}", env!("CARGO_PKG_VERSION")),
            bearer_token: None,
        }
    }
}

impl ClientOptions {
    /// Options carrying a bearer token.
    #[must_use]
    pub fn with_bearer_token(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
            ..Self::default()
        }
    }
}
