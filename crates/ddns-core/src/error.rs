//! Error types for the DDNS agent
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS agent
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing parameter, bad credential file, zero interval)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Address lookup failed (transport failure, timeout, unreadable body)
    #[error("Network error: {0}")]
    Network(String),

    /// DNS update request failed or was rejected
    #[error("Update failed ({provider}): {message}")]
    Update {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// The other end of the change channel is gone
    #[error("Change channel closed")]
    ChannelClosed,

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network (address lookup) error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an update error for the given provider
    pub fn update(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Update {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
