//! Dashboard API Client
//!
//! HTTP client for the monitoring API's dashboard endpoint.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::{FetchError, FetchResult};
use crate::snapshot::DashboardSnapshot;

pub use crate::snapshot::DASHBOARD_ENDPOINT;

/// Anything that can produce a dashboard snapshot
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch and parse the latest snapshot
    async fn fetch_snapshot(&self) -> FetchResult<DashboardSnapshot>;
}

/// Configuration for the dashboard client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the monitoring API (e.g., "http://localhost:5000")
    pub base_url: String,
    /// Path of the dashboard endpoint
    pub endpoint: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            endpoint: DASHBOARD_ENDPOINT.to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Full URL of the dashboard endpoint
    pub fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.endpoint.starts_with('/') {
            format!("{}{}", base, self.endpoint)
        } else {
            format!("{}/{}", base, self.endpoint)
        }
    }
}

/// Dashboard REST client
pub struct DashboardClient {
    client: Client,
    config: ClientConfig,
    url: String,
}

impl DashboardClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let url = config.url();
        Ok(Self { client, config, url })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL that is polled
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the endpoint body as untyped JSON
    pub async fn fetch_raw(&self) -> FetchResult<serde_json::Value> {
        let body = self.get_body().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Plain GET: no body, no query parameters, no extra headers
    async fn get_body(&self) -> FetchResult<String> {
        tracing::debug!(url = %self.url, "Requesting dashboard data");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: if text.is_empty() {
                    status.canonical_reason().unwrap_or("Unknown").to_string()
                } else {
                    text
                },
            });
        }

        response.text().await.map_err(map_request_error)
    }
}

#[async_trait]
impl SnapshotSource for DashboardClient {
    async fn fetch_snapshot(&self) -> FetchResult<DashboardSnapshot> {
        let body = self.get_body().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn map_request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Unavailable(e.to_string())
    } else if e.is_decode() {
        FetchError::Parse(e.to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}
