// # Namecheap DNS Provider
//
// This crate provides the Namecheap dynamic DNS provider for the DDNS agent.
//
// ## Behavior
//
// - One GET per update, no retries, no background tasks
// - Success is an HTTP 200; anything else is an `Error::Update`
// - Transport failures are an `Error::Update` too
// - Dry-run mode logs the intended update and sends nothing
//
// ## Security
//
// The endpoint takes the dynamic DNS password as a plain query parameter.
// That is the provider's interface and is kept as is, but it means the
// request URL is a secret: it is never logged, and transport errors are
// stripped of their URL before they are reported.
//
// ## API Reference
//
// `GET https://dynamicdns.park-your-domain.com/update?host=..&domain=..&password=..&ip=..`

use async_trait::async_trait;
use ddns_core::traits::DnsProvider;
use ddns_core::{Error, PublicAddress, Result, UpdateCredential};
use reqwest::StatusCode;
use std::time::Duration;

/// Namecheap dynamic DNS update endpoint
pub const NAMECHEAP_UPDATE_ENDPOINT: &str = "https://dynamicdns.park-your-domain.com/update";

/// Upper bound for one update request, so a stalled endpoint cannot pin a task forever
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER_NAME: &str = "namecheap";

/// Namecheap dynamic DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider logs the host, domain and address
/// it would have sent and returns success without any request.
pub struct NamecheapProvider {
    /// Host, domain and password for the record
    credential: UpdateCredential,

    /// Update endpoint (overridable for testing against a local server)
    endpoint: String,

    /// HTTP client for update requests
    client: reqwest::Client,

    /// Dry-run mode: if true, skip the request
    dry_run: bool,
}

// Custom Debug implementation that keeps the password out of logs
impl std::fmt::Debug for NamecheapProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamecheapProvider")
            .field("credential", &self.credential)
            .field("endpoint", &self.endpoint)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl NamecheapProvider {
    /// Create a provider for the live Namecheap endpoint
    pub fn new(credential: UpdateCredential) -> Result<Self> {
        Self::build(credential, NAMECHEAP_UPDATE_ENDPOINT.to_string(), false)
    }

    /// Create a provider that only logs what it would send
    pub fn new_dry_run(credential: UpdateCredential) -> Result<Self> {
        Self::build(credential, NAMECHEAP_UPDATE_ENDPOINT.to_string(), true)
    }

    /// Create a provider for a custom endpoint speaking the same protocol
    pub fn with_endpoint(credential: UpdateCredential, endpoint: impl Into<String>) -> Result<Self> {
        Self::build(credential, endpoint.into(), false)
    }

    fn build(credential: UpdateCredential, endpoint: String, dry_run: bool) -> Result<Self> {
        if endpoint.is_empty() {
            return Err(Error::config("Update endpoint cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credential,
            endpoint,
            client,
            dry_run,
        })
    }

    /// Whether this provider skips the actual request
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[async_trait]
impl DnsProvider for NamecheapProvider {
    async fn update_record(&self, address: &PublicAddress) -> Result<()> {
        if self.dry_run {
            tracing::info!(
                "[DRY RUN] Would update {}.{} -> {}",
                self.credential.host(),
                self.credential.domain(),
                address
            );
            return Ok(());
        }

        tracing::debug!(
            "Updating {}.{} -> {}",
            self.credential.host(),
            self.credential.domain(),
            address
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("host", self.credential.host()),
                ("domain", self.credential.domain()),
                ("password", self.credential.password()),
                ("ip", address.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::update(PROVIDER_NAME, format!("Request failed: {}", e.without_url())))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::update(
                PROVIDER_NAME,
                format!("Could not update remote record. Response status: {}", status),
            ));
        }

        match response.text().await {
            Ok(body) => tracing::trace!("Update response: {}", body),
            Err(e) => tracing::debug!("Could not read update response body: {}", e.without_url()),
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
