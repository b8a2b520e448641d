// # Address Source Trait
//
// Defines the interface for discovering the host's public address.
//
// ## Implementations
//
// - HTTP discovery service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::AddressSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* AddressSource implementation */;
//
//     let addr = source.fetch().await?;
//     println!("public address: {}", addr);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::address::PublicAddress;

/// Trait for public address lookups
///
/// # Contract
///
/// - One call performs exactly one lookup; no caching, no retries
/// - The lookup must be bounded in time so a stalled network never holds
///   the monitor past one polling cycle
/// - Every failure (transport, timeout, unreadable body) maps to
///   `Error::Network`; callers do not distinguish sub-causes
/// - No side effects beyond the outbound request
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Look up the current public address
    ///
    /// # Returns
    ///
    /// - `Ok(PublicAddress)`: The trimmed address reported by the service
    /// - `Err(Error::Network)`: The lookup could not complete
    async fn fetch(&self) -> Result<PublicAddress, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
