//! Configuration types for the DDNS agent
//!
//! All values here are built once at startup and never mutated.

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default wait between address checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default capacity of the agent event channel
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

/// Credentials for the DNS update endpoint
///
/// One host/domain pair plus the dynamic DNS password. The Debug
/// implementation does not expose the password.
#[derive(Clone, PartialEq, Eq)]
pub struct UpdateCredential {
    host: String,
    domain: String,
    password: String,
}

impl UpdateCredential {
    /// Create a credential, rejecting empty fields
    pub fn new(
        host: impl Into<String>,
        domain: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let credential = Self {
            host: host.into(),
            domain: domain.into(),
            password: password.into(),
        };

        if credential.host.is_empty() {
            return Err(Error::config("Host cannot be empty"));
        }
        if credential.domain.is_empty() {
            return Err(Error::config("Domain cannot be empty"));
        }
        if credential.password.is_empty() {
            return Err(Error::config("Password cannot be empty"));
        }

        Ok(credential)
    }

    /// The host label of the record (e.g. "@" or "www")
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The domain the record belongs to
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The dynamic DNS password
    ///
    /// ⚠️ NEVER log this value
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for UpdateCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateCredential")
            .field("host", &self.host)
            .field("domain", &self.domain)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// Polling settings for the address monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    interval: Duration,
}

impl PollingConfig {
    /// Create a polling config; the interval must be positive
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::config("Polling interval must be positive"));
        }
        Ok(Self { interval })
    }

    /// Wait between consecutive address checks
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Agent configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Address monitor settings
    pub polling: PollingConfig,

    /// Capacity of the agent event channel
    ///
    /// When full, new events are dropped (with a warning log) rather than
    /// stalling the pipeline.
    pub event_channel_capacity: usize,
}

impl AgentConfig {
    /// Create an agent config with the given polling settings
    pub fn new(polling: PollingConfig) -> Self {
        Self {
            polling,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }

    /// Set the event channel capacity
    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.polling.interval().is_zero() {
            return Err(Error::config("Polling interval must be positive"));
        }
        if self.event_channel_capacity == 0 {
            return Err(Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(PollingConfig::default())
    }
}
