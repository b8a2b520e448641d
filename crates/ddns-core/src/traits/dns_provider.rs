// # DNS Provider Trait
//
// Defines the interface for pushing an address to a DNS update endpoint.
//
// ## Implementations
//
// - Namecheap dynamic DNS: `ddns-provider-namecheap` crate
// - Future: any provider that accepts "set this record to this address"
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsProvider, PublicAddress};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     provider.update_record(&PublicAddress::parse("203.0.113.7")?).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::address::PublicAddress;

/// Trait for DNS provider implementations
///
/// A provider owns its credentials and endpoint; the agent hands it only
/// the address snapshot that was delivered through the change channel.
///
/// # Thread Safety
///
/// Implementations are shared across concurrently running update tasks,
/// so they must be `Send + Sync` and must not keep per-request state.
///
/// ## Forbidden
/// - ❌ Retry or back off (a failed update is logged and dropped)
/// - ❌ Spawn tasks
/// - ❌ Read the monitor's state; only the argument is authoritative
///
/// Redundant updates with the same address are allowed; the remote
/// provider defines their effect.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Issue exactly one update request setting the record to `address`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider accepted the update
    /// - `Err(Error::Update)`: Rejected, or the request could not complete
    async fn update_record(&self, address: &PublicAddress) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
