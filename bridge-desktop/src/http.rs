//! Audio Fetcher Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    fetch::AudioFetcher,
};
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Reqwest-based audio fetcher
///
/// Provides pronunciation downloads with:
/// - Connection pooling via reqwest
/// - TLS support by default
/// - Configurable per-client timeout
pub struct ReqwestAudioFetcher {
    client: Client,
}

impl ReqwestAudioFetcher {
    /// Create a new fetcher with default configuration
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new fetcher with custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent("name-pronunciation-core/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    /// Create a new fetcher with a custom reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestAudioFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioFetcher for ReqwestAudioFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        debug!(url = %url, "Downloading pronunciation audio");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Audio download failed");
            BridgeError::OperationFailed(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Remote returned error status");
            return Err(BridgeError::RemoteStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            BridgeError::OperationFailed(format!("Failed to read response body: {}", e))
        })?;

        debug!(url = %url, bytes = body.len(), "Audio download complete");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        let _default = ReqwestAudioFetcher::default();
        let _short = ReqwestAudioFetcher::with_timeout(Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_invalid_url_is_operation_failed() {
        let fetcher = ReqwestAudioFetcher::with_timeout(Duration::from_secs(1));
        let result = fetcher.fetch("not-a-url").await;
        assert!(matches!(result, Err(BridgeError::OperationFailed(_))));
    }
}
