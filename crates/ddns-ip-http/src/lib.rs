// # HTTP Address Source
//
// This crate provides the HTTP-based address source for the DDNS agent.
//
// ## Purpose
//
// Asks a public "what is my address" service for the host's external
// address. One call is one GET; the plain-text response body, trimmed,
// is the address.
//
// ## Failure Handling
//
// Transport failures, timeouts, non-success statuses and unreadable or
// empty bodies all surface as `Error::Network`. The monitor treats every
// failure the same way, so no finer distinction is made here.

use ddns_core::traits::AddressSource;
use ddns_core::{Error, PublicAddress, Result};

use std::time::Duration;

/// Default discovery service (returns the caller's address as plain text)
pub const DEFAULT_DISCOVERY_URL: &str = "https://api.ipify.org";

/// Lookup timeout, kept well under any sane polling interval
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(1);

/// HTTP-based address source
#[derive(Debug, Clone)]
pub struct HttpAddressSource {
    /// URL to fetch the address from
    url: String,

    /// HTTP client (carries the lookup timeout)
    client: reqwest::Client,
}

impl HttpAddressSource {
    /// Create a source for the default discovery service
    pub fn new() -> Result<Self> {
        Self::with_url(DEFAULT_DISCOVERY_URL, DEFAULT_LOOKUP_TIMEOUT)
    }

    /// Create a source for a custom discovery URL and timeout
    ///
    /// # Parameters
    ///
    /// - `url`: URL answering with the caller's address as plain text
    /// - `timeout`: Upper bound for the whole request, including the body
    pub fn with_url(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        if url.is_empty() {
            return Err(Error::config("Discovery URL cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { url, client })
    }

    /// The discovery URL in use
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl AddressSource for HttpAddressSource {
    async fn fetch(&self) -> Result<PublicAddress> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("Could not get IP: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "Discovery service answered {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;

        let addr = PublicAddress::parse(&body)?;
        tracing::trace!("Discovery service reported {}", addr);

        Ok(addr)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
