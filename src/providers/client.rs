//! Upstream HTTP client

use super::{ErrorStatus, ProviderError, UpstreamRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Seam over the outbound HTTP call so route handlers can be exercised with
/// canned payloads.
#[async_trait]
pub trait UpstreamFetch: Send + Sync {
    /// Perform the GET and decode the body as JSON. Non-2xx statuses and
    /// transport failures surface as `ProviderError`.
    async fn fetch_json(&self, request: &UpstreamRequest) -> Result<Value, ProviderError>;
}

/// reqwest-backed fetcher with a bounded per-request timeout.
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build http client");
        Self { client }
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamFetch for UpstreamClient {
    async fn fetch_json(&self, request: &UpstreamRequest) -> Result<Value, ProviderError> {
        debug!("fetching {} candles from {}", request.provider, request.url);

        let mut builder = self.client.get(&request.url);
        if let Some((name, value)) = &request.auth_header {
            builder = builder.header(*name, value);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            // Prefer the upstream's own error text when it sends one.
            let body = response.text().await.unwrap_or_default();
            let reason = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string()
            } else {
                body
            };
            return Err(ErrorStatus {
                reason,
                code: status.as_u16(),
            }
            .into());
        }

        let payload = response.json::<Value>().await?;
        Ok(payload)
    }
}
