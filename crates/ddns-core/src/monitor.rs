//! Address monitor
//!
//! Owns the polling loop: fetch, compare against the last observed address,
//! publish on change, sleep, repeat. The monitor is the only reader and
//! writer of its [`AddressState`]; everything downstream sees snapshots.
//!
//! ## Cycle
//!
//! 1. Call the [`AddressSource`]
//! 2. On failure: reset to `Unknown`, publish nothing
//! 3. On success: publish if the value differs from the current state
//! 4. Sleep the polling interval
//!
//! Failures are never fatal and there is no backoff; the next attempt
//! always happens one interval later.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::address::{AddressState, PublicAddress};
use crate::channel::ChangePublisher;
use crate::config::PollingConfig;
use crate::traits::AddressSource;

/// Polling change detector
pub struct AddressMonitor {
    /// Where addresses come from
    source: Arc<dyn AddressSource>,

    /// Polling settings
    polling: PollingConfig,

    /// Last observed address
    state: AddressState,
}

impl AddressMonitor {
    /// Create a monitor in the `Unknown` state
    pub fn new(source: Arc<dyn AddressSource>, polling: PollingConfig) -> Self {
        Self {
            source,
            polling,
            state: AddressState::Unknown,
        }
    }

    /// The monitor's current view of the address
    pub fn state(&self) -> &AddressState {
        &self.state
    }

    /// Run one fetch-and-compare step
    ///
    /// Returns the address to publish when this step observed a change.
    pub async fn poll_once(&mut self) -> Option<PublicAddress> {
        let fetched = self.source.fetch().await;

        if let Err(ref e) = fetched {
            debug!("Address lookup via {} failed: {}", self.source.source_name(), e);
        }

        let change = self.state.observe(fetched);
        if let Some(ref addr) = change {
            info!("Address changed: {}", addr);
        }

        change
    }

    /// Poll forever, publishing every change through `publisher`
    ///
    /// Publishing suspends while the previous change is still undelivered.
    /// Returns only when the receiving side of the channel is gone.
    pub async fn run(mut self, publisher: ChangePublisher) {
        info!(
            "Starting address monitoring (source={}, interval={:?})",
            self.source.source_name(),
            self.polling.interval()
        );

        loop {
            if let Some(addr) = self.poll_once().await
                && publisher.publish(addr).await.is_err()
            {
                warn!("Change receiver dropped, stopping monitor");
                return;
            }

            tokio::time::sleep(self.polling.interval()).await;
        }
    }
}
