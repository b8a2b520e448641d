//! DDNS agent
//!
//! The DdnsAgent is responsible for:
//! - Starting the address monitor as a background task
//! - Waiting for changes on the single-slot channel
//! - Dispatching one independent update task per delivered change
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐  publish   ┌───────────────┐  await_change  ┌────────────┐
//! │ AddressMonitor │───────────▶│ ChangeChannel │───────────────▶│ DdnsAgent  │
//! │  (1 task)      │  (1 slot)  └───────────────┘                └────────────┘
//! └────────────────┘                                          │ spawn
//!                                                             ▼
//!                                                          ┌────────────────────────────┐
//!                                                          │ update task per change     │
//!                                                          │ DnsProvider::update_record │
//!                                                          └────────────────────────────┘
//! ```
//!
//! ## Ordering
//!
//! Changes reach the agent in detection order. Update tasks run
//! independently, so two updates in flight may complete in either order.
//! Updates are expected to be rare (minutes to hours apart), which is why
//! in-flight updates are neither bounded nor serialized.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::address::PublicAddress;
use crate::channel::{ChangeReceiver, change_channel};
use crate::config::{AgentConfig, PollingConfig};
use crate::error::{Error, Result};
use crate::monitor::AddressMonitor;
use crate::traits::{AddressSource, DnsProvider};

/// Events emitted by the DdnsAgent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// Agent started
    Started {
        source: &'static str,
        provider: &'static str,
    },

    /// A new address was delivered by the monitor
    AddressChanged { address: PublicAddress },

    /// DNS update accepted by the provider
    UpdateSucceeded { address: PublicAddress },

    /// DNS update failed (not retried)
    UpdateFailed { address: PublicAddress, error: String },

    /// Agent stopped
    Stopped { reason: String },
}

/// Polling DDNS agent
///
/// Owns no state beyond the wiring: the monitor keeps the address cursor,
/// the provider keeps the credentials.
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsAgent::new()`]
/// 2. Start with [`DdnsAgent::run()`]
/// 3. Agent runs until a shutdown signal is received
///
/// In-flight update tasks are not cancelled on shutdown.
pub struct DdnsAgent {
    /// Address source handed to the monitor
    source: Arc<dyn AddressSource>,

    /// DNS provider shared by update tasks
    provider: Arc<dyn DnsProvider>,

    /// Monitor polling settings
    polling: PollingConfig,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<AgentEvent>,
}

impl DdnsAgent {
    /// Create a new DDNS agent
    ///
    /// # Parameters
    ///
    /// - `source`: Address source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: Agent configuration
    ///
    /// # Returns
    ///
    /// A tuple of (agent, event_receiver) where event_receiver yields agent events
    pub fn new(
        source: Arc<dyn AddressSource>,
        provider: Arc<dyn DnsProvider>,
        config: AgentConfig,
    ) -> Result<(Self, mpsc::Receiver<AgentEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let agent = Self {
            source,
            provider,
            polling: config.polling,
            event_tx: tx,
        };

        Ok((agent, rx))
    }

    /// Run the agent until Ctrl-C
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Clean shutdown
    /// - `Err(Error)`: The monitor stopped unexpectedly
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Run the agent until `shutdown_rx` fires
    ///
    /// With `None` this behaves like [`DdnsAgent::run()`]. The daemon uses
    /// this to stop on SIGTERM as well as SIGINT.
    pub async fn run_with_shutdown(&self, shutdown_rx: Option<oneshot::Receiver<()>>) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(&self, shutdown_rx: Option<oneshot::Receiver<()>>) -> Result<()> {
        self.emit_event(AgentEvent::Started {
            source: self.source.source_name(),
            provider: self.provider.provider_name(),
        });

        let (publisher, mut changes) = change_channel();
        let monitor = AddressMonitor::new(Arc::clone(&self.source), self.polling);
        let monitor_handle = tokio::spawn(monitor.run(publisher));

        let result = match shutdown_rx {
            Some(rx) => {
                self.dispatch_until(&mut changes, async {
                    let _ = rx.await;
                })
                .await
            }
            None => {
                self.dispatch_until(&mut changes, async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        error!("Failed to listen for Ctrl-C: {}", e);
                    }
                })
                .await
            }
        };

        monitor_handle.abort();
        info!("Agent stopped");

        result
    }

    /// Wait for changes and dispatch updates until `shutdown` completes
    async fn dispatch_until(
        &self,
        changes: &mut ChangeReceiver,
        shutdown: impl Future<Output = ()>,
    ) -> Result<()> {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                change = changes.await_change() => match change {
                    Some(address) => {
                        self.dispatch_update(address);
                    }
                    None => {
                        error!("Address monitor stopped unexpectedly");
                        self.emit_event(AgentEvent::Stopped {
                            reason: "Address monitor stopped".to_string(),
                        });
                        return Err(Error::other("Address monitor stopped unexpectedly"));
                    }
                },

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    self.emit_event(AgentEvent::Stopped {
                        reason: "Shutdown signal".to_string(),
                    });
                    return Ok(());
                }
            }
        }
    }

    /// Spawn one fire-and-forget update task for `address`
    ///
    /// The task owns its snapshot of the address; nothing it reads can be
    /// changed by the monitor afterwards.
    fn dispatch_update(&self, address: PublicAddress) {
        debug!("Dispatching update for {}", address);

        self.emit_event(AgentEvent::AddressChanged {
            address: address.clone(),
        });

        let provider = Arc::clone(&self.provider);
        let event_tx = self.event_tx.clone();

        tokio::spawn(run_update(provider, address, event_tx));
    }

    fn emit_event(&self, event: AgentEvent) {
        emit_event(&self.event_tx, event);
    }
}

/// Perform a single update and report the outcome
async fn run_update(
    provider: Arc<dyn DnsProvider>,
    address: PublicAddress,
    event_tx: mpsc::Sender<AgentEvent>,
) {
    match provider.update_record(&address).await {
        Ok(()) => {
            info!("Updated new IP: {} (provider: {})", address, provider.provider_name());
            emit_event(&event_tx, AgentEvent::UpdateSucceeded { address });
        }
        Err(e) => {
            error!("Could not update remote record to {}: {}", address, e);
            emit_event(
                &event_tx,
                AgentEvent::UpdateFailed {
                    address,
                    error: e.to_string(),
                },
            );
        }
    }
}

/// Send an event without ever blocking the pipeline
fn emit_event(event_tx: &mpsc::Sender<AgentEvent>, event: AgentEvent) {
    if let Err(mpsc::error::TrySendError::Full(event)) = event_tx.try_send(event) {
        warn!("Event channel full, dropping event: {:?}", event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_event_drops_when_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let address = PublicAddress::parse("1.2.3.4").unwrap();

        emit_event(&tx, AgentEvent::AddressChanged { address: address.clone() });
        emit_event(&tx, AgentEvent::UpdateSucceeded { address: address.clone() });

        assert_eq!(rx.try_recv().unwrap(), AgentEvent::AddressChanged { address });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_emit_event_ignores_closed_receiver() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        emit_event(
            &tx,
            AgentEvent::Stopped {
                reason: "test".to_string(),
            },
        );
    }
}
