// # HTTP IP Resolver
//
// This crate discovers the host's public IP by asking an external service.
//
// ## Architecture
//
// One GET per call against a configured URL (e.g., checkip.amazonaws.com,
// api.ipify.org). The trimmed response body is the IP value. The engine
// decides when to call and what to do after a failure; this crate never
// retries or caches.
//
// ## Timeouts
//
// The client is built without a request timeout. A hung discovery endpoint
// stalls the current cycle until the connection fails on its own.

use async_trait::async_trait;
use ddns_core::config::IpSourceConfig;
use ddns_core::traits::IpResolver;
use ddns_core::{Error, Result};

/// Public IP resolver backed by a plain-text HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpIpResolver {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a new HTTP IP resolver
    ///
    /// # Parameters
    ///
    /// - `url`: URL returning the caller's IP as the body (e.g., "https://checkip.amazonaws.com")
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    /// Create with a preconfigured client
    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    /// Create from the IP source section of the configuration
    pub fn from_config(config: &IpSourceConfig) -> Self {
        Self::new(config.url.clone())
    }

    /// The discovery URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl IpResolver for HttpIpResolver {
    async fn fetch_public_ip(&self) -> Result<String> {
        tracing::debug!("Fetching public IP from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_discovery(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ip_discovery(format!("HTTP error: {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_discovery(format!("Failed to read response: {}", e)))?;

        Ok(body.trim().to_string())
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
