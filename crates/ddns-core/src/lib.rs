// # ddns-core
//
// Core library for the polling DDNS update agent.
//
// ## Architecture Overview
//
// This library provides the moving parts of the address → DNS record pipeline:
// - **AddressSource**: Trait for a single lookup of the public address
// - **DnsProvider**: Trait for pushing one address to a DNS update endpoint
// - **ChangeChannel**: Single-slot handoff between the monitor and the agent
// - **AddressMonitor**: Polling loop that detects address changes
// - **DdnsAgent**: Wires the monitor to the provider, one update task per change
//
// ## Design Principles
//
// 1. **Snapshots, not shared state**: Update tasks only see the value that was
//    delivered through the channel, never the monitor's cursor
// 2. **Backpressure**: The channel holds at most one undelivered address
// 3. **Contained failures**: Fetch and update errors are logged, never fatal
// 4. **Library-First**: The daemon is a thin wrapper over this crate

pub mod address;
pub mod agent;
pub mod channel;
pub mod config;
pub mod error;
pub mod monitor;
pub mod traits;

// Re-export core types for convenience
pub use address::{AddressState, PublicAddress};
pub use agent::{AgentEvent, DdnsAgent};
pub use channel::{ChangePublisher, ChangeReceiver, change_channel};
pub use config::{AgentConfig, PollingConfig, UpdateCredential};
pub use error::{Error, Result};
pub use monitor::AddressMonitor;
pub use traits::{AddressSource, DnsProvider};
