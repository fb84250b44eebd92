//! HTTP API Client
//!
//! Fetches the dashboard snapshot from the monitoring API.

use gloo_net::http::Request;
use lpdash::{DashboardSnapshot, FetchError, FetchResult, DASHBOARD_ENDPOINT};

/// Local storage key holding an alternative API base URL
pub const API_URL_KEY: &str = "lpdash_api_url";

/// Default API base URL: same origin as the page
pub const DEFAULT_API_BASE: &str = "";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Full URL of the dashboard endpoint for a base URL
pub fn dashboard_url(api_base: &str) -> String {
    format!("{}{}", api_base.trim_end_matches('/'), DASHBOARD_ENDPOINT)
}

/// Fetch and parse the latest snapshot
pub async fn fetch_snapshot(url: &str) -> FetchResult<DashboardSnapshot> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    if !response.ok() {
        let text = response.text().await.unwrap_or_default();
        return Err(FetchError::Status {
            status: response.status(),
            message: if text.is_empty() {
                response.status_text()
            } else {
                text
            },
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    Ok(serde_json::from_str(&body)?)
}
