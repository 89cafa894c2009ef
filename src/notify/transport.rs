//! HTTP transport for pings.

use super::PingError;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use std::time::Duration;

/// Content type header sent with every ping.
const PING_CONTENT_TYPE: &str = "application/json";

/// A single outbound ping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingRequest {
    /// Fully encoded request URL.
    pub url: String,
}

impl PingRequest {
    /// Value of the `Content-Type` header.
    pub fn content_type(&self) -> &'static str {
        PING_CONTENT_TYPE
    }
}

/// What came back from the API. The body is never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingResponse {
    /// HTTP status code.
    pub status: u16,
}

/// Sends pings.
///
/// [`HttpTransport`] is the production implementation; tests substitute a
/// recording transport.
#[async_trait]
pub trait PingTransport: Send + Sync {
    /// Issue a GET for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received. Non-success
    /// statuses are reported through [`PingResponse::status`].
    async fn send(&self, request: &PingRequest) -> Result<PingResponse, PingError>;
}

/// `reqwest`-backed transport with a per-request timeout.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, PingError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PingError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Use an existing client. Its timeout settings apply as configured.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PingTransport for HttpTransport {
    async fn send(&self, request: &PingRequest) -> Result<PingResponse, PingError> {
        let response = self
            .client
            .get(&request.url)
            .header(CONTENT_TYPE, HeaderValue::from_static(PING_CONTENT_TYPE))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PingError::Timeout
                } else {
                    PingError::Transport(e.to_string())
                }
            })?;

        Ok(PingResponse {
            status: response.status().as_u16(),
        })
    }
}
