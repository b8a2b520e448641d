//! Core traits for the DDNS agent
//!
//! This module defines the seams a deployment plugs into.
//!
//! - [`AddressSource`]: Look up the host's public address
//! - [`DnsProvider`]: Push an address to a DNS update endpoint

pub mod address_source;
pub mod dns_provider;

pub use address_source::AddressSource;
pub use dns_provider::DnsProvider;
