//! HTTP client for the inventory API.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use rentdesk_core::{ApiUrl, Error, NetworkError, Result, StatusError};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for an [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: ApiUrl,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("rentdesk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// JSON-over-HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a client for the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if !config.base_url.is_network() {
            return Err(rentdesk_core::InvalidInputError::ApiUrl {
                value: config.base_url.to_string(),
                reason: "the HTTP gateway needs an http:// or https:// URL".to_string(),
            }
            .into());
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| NetworkError::Http {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    /// Returns the API base URL this client is configured for.
    pub fn base_url(&self) -> &ApiUrl {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET `path` with query parameters and decode a JSON body.
    #[instrument(skip(self), fields(api = %self.config.base_url))]
    pub async fn get_json<Q, R>(&self, path: &str, params: &Q) -> Result<R>
    where
        Q: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.config.base_url.endpoint(path);
        debug!(%url, "GET");
        trace!(?params, "query parameters");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        trace!(%status, "response");
        if !status.is_success() {
            return Err(Self::status_error(response).await);
        }

        response
            .json::<R>()
            .await
            .map_err(|e| self.network_error(e).into())
    }

    /// POST a JSON body to `path`, accepting only `expected` as the status.
    #[instrument(skip(self, body), fields(api = %self.config.base_url))]
    pub async fn post_expecting<B>(&self, path: &str, body: &B, expected: StatusCode) -> Result<()>
    where
        B: Serialize + std::fmt::Debug,
    {
        let url = self.config.base_url.endpoint(path);
        debug!(%url, "POST");
        trace!(?body, "request body");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        trace!(%status, "response");
        if status == expected {
            Ok(())
        } else {
            Err(Self::status_error(response).await)
        }
    }

    /// Map a transport failure onto [`NetworkError`].
    fn network_error(&self, err: reqwest::Error) -> NetworkError {
        if err.is_timeout() {
            NetworkError::Timeout {
                duration_ms: u64::try_from(self.config.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else if err.is_connect() {
            NetworkError::Connection {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            NetworkError::Decode {
                message: err.to_string(),
            }
        } else {
            NetworkError::Http {
                message: err.to_string(),
            }
        }
    }

    /// Build a status error from a response, keeping an excerpt of its body.
    async fn status_error(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.ok();
        StatusError::new(status, body).into()
    }
}
