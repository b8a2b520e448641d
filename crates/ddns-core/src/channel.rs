//! Single-slot change channel
//!
//! Hands newly detected addresses from the [`AddressMonitor`](crate::AddressMonitor)
//! to the [`DdnsAgent`](crate::DdnsAgent). The channel buffers at most one
//! undelivered address: a second `publish` suspends the monitor until the
//! agent has taken the first. Nothing is ever dropped.

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::address::PublicAddress;
use crate::error::{Error, Result};

/// Number of undelivered addresses the channel can hold
const SLOT_CAPACITY: usize = 1;

/// Create a connected publisher/receiver pair
pub fn change_channel() -> (ChangePublisher, ChangeReceiver) {
    let (tx, rx) = mpsc::channel(SLOT_CAPACITY);
    (ChangePublisher { tx }, ChangeReceiver { rx })
}

/// Producer half, owned by the monitor
#[derive(Debug, Clone)]
pub struct ChangePublisher {
    tx: mpsc::Sender<PublicAddress>,
}

impl ChangePublisher {
    /// Make `addr` available to the next [`ChangeReceiver::await_change`]
    ///
    /// Suspends while a previously published address is still unconsumed.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The address is in the slot
    /// - `Err(Error::ChannelClosed)`: The receiver has been dropped
    pub async fn publish(&self, addr: PublicAddress) -> Result<()> {
        self.tx.send(addr).await.map_err(|_| Error::ChannelClosed)
    }

    /// Whether the receiver has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half, owned by the agent's main loop
#[derive(Debug)]
pub struct ChangeReceiver {
    rx: mpsc::Receiver<PublicAddress>,
}

impl ChangeReceiver {
    /// Wait for the next published address and free the slot
    ///
    /// Returns `None` once every publisher is gone and the slot is empty.
    pub async fn await_change(&mut self) -> Option<PublicAddress> {
        self.rx.recv().await
    }

    /// Consume the receiver as a stream of addresses
    pub fn into_stream(self) -> ReceiverStream<PublicAddress> {
        ReceiverStream::new(self.rx)
    }
}
