//! Shared HTTP plumbing for content handlers
//!
//! This module builds the single HTTP client used across the process and
//! provides the two fetch shapes handlers need:
//! - a bounded content-type probe (HEAD) used to decide how to treat a URL
//! - a plain GET returning the response body as text

use crate::config::FetchConfig;
use reqwest::Client;
use std::time::Duration;

/// A fetched page body with its response metadata
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value, empty when absent
    pub content_type: String,

    /// Response body
    pub body: String,
}

/// Builds the HTTP client shared by all handlers
///
/// The client is cheap to clone; handlers hold clones of one instance built
/// at startup.
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Probes a URL's Content-Type with a bounded HEAD request
///
/// Returns `None` when the probe fails or times out — callers treat an
/// unreachable page the same as one with no usable Content-Type. The timeout
/// here is deliberately shorter than the full request timeout so a dead host
/// costs little.
pub async fn probe_content_type(client: &Client, url: &str, timeout: Duration) -> Option<String> {
    let response = client.head(url).timeout(timeout).send().await;

    match response {
        Ok(response) => response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string()),
        Err(e) => {
            tracing::debug!("Content-type probe failed for {}: {}", url, e);
            None
        }
    }
}

/// Fetches a URL and returns its body as text
///
/// Non-success status codes are surfaced as errors so callers can downgrade
/// them uniformly with network failures.
pub async fn fetch_text(client: &Client, url: &str) -> Result<FetchedPage, reqwest::Error> {
    let response = client.get(url).send().await?;
    let response = response.error_for_status()?;

    let final_url = response.url().to_string();
    let status_code = response.status().as_u16();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response.text().await?;

    Ok(FetchedPage {
        final_url,
        status_code,
        content_type,
        body,
    })
}
