// # Public Address
//
// The value carried through the pipeline and the monitor's cursor over it.
//
// ## State Machine
//
// ```text
//            fetch ok (v)                    fetch ok (v != w)
//  Unknown ───────────────▶ Known(v) ─────────────────────────▶ Known(v)
//     ▲                        │
//     └──── fetch failed ──────┘
// ```
//
// Every transition into `Known` yields the new value for publication.
// A failure always drops back to `Unknown`, so the same address seen
// before and after a failed fetch is published twice.

use std::fmt;
use std::net::IpAddr;

use crate::error::{Error, Result};

/// The host's public address as reported by the discovery service
///
/// Stored as the trimmed response text. The agent never interprets it;
/// it is forwarded to the DNS provider verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicAddress(String);

impl PublicAddress {
    /// Build an address from a raw response body
    ///
    /// Surrounding whitespace is trimmed. An empty body is a `Network` error,
    /// since it means the discovery service did not answer with an address.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::network("Empty address in response body"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The address text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the address as an IP, if it is one
    pub fn as_ip(&self) -> Option<IpAddr> {
        self.0.parse().ok()
    }
}

impl fmt::Display for PublicAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PublicAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The monitor's cursor over the last observed address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AddressState {
    /// Nothing observed yet, or the last fetch failed
    #[default]
    Unknown,
    /// The last successful fetch returned this address
    Known(PublicAddress),
}

impl AddressState {
    /// Apply one fetch result to the state
    ///
    /// Returns the address to publish, if any. The returned value is a
    /// snapshot: later transitions never affect it.
    pub fn observe(&mut self, fetched: Result<PublicAddress>) -> Option<PublicAddress> {
        match fetched {
            Err(_) => {
                *self = AddressState::Unknown;
                None
            }
            Ok(addr) => {
                if matches!(self, AddressState::Known(current) if *current == addr) {
                    return None;
                }
                *self = AddressState::Known(addr.clone());
                Some(addr)
            }
        }
    }

    /// The currently known address, if any
    pub fn current(&self) -> Option<&PublicAddress> {
        match self {
            AddressState::Known(addr) => Some(addr),
            AddressState::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> PublicAddress {
        PublicAddress::parse(s).unwrap()
    }

    fn failure() -> Result<PublicAddress> {
        Err(Error::network("timed out"))
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let parsed = addr("  1.2.3.4\n");
        assert_eq!(parsed.as_str(), "1.2.3.4");
        assert_eq!(parsed.as_ip(), Some(IpAddr::from([1, 2, 3, 4])));
    }

    #[test]
    fn test_parse_rejects_empty_body() {
        assert!(matches!(PublicAddress::parse(" \n"), Err(Error::Network(_))));
    }

    #[test]
    fn test_non_ip_text_is_kept() {
        let parsed = addr("not-an-ip");
        assert_eq!(parsed.to_string(), "not-an-ip");
        assert_eq!(parsed.as_ip(), None);
    }

    #[test]
    fn test_first_success_publishes() {
        let mut state = AddressState::default();
        assert_eq!(state.observe(Ok(addr("1.2.3.4"))), Some(addr("1.2.3.4")));
        assert_eq!(state.current(), Some(&addr("1.2.3.4")));
    }

    #[test]
    fn test_repeated_value_is_not_published() {
        let mut state = AddressState::default();
        let published: Vec<_> = ["1.2.3.4", "1.2.3.4", "5.6.7.8"]
            .into_iter()
            .filter_map(|v| state.observe(Ok(addr(v))))
            .collect();
        assert_eq!(published, vec![addr("1.2.3.4"), addr("5.6.7.8")]);
    }

    #[test]
    fn test_failure_resets_and_republishes_same_value() {
        let mut state = AddressState::default();
        assert!(state.observe(Ok(addr("1.2.3.4"))).is_some());

        assert_eq!(state.observe(failure()), None);
        assert_eq!(state, AddressState::Unknown);

        assert_eq!(state.observe(Ok(addr("1.2.3.4"))), Some(addr("1.2.3.4")));
    }

    #[test]
    fn test_failure_from_unknown_publishes_nothing() {
        let mut state = AddressState::Unknown;
        assert_eq!(state.observe(failure()), None);
        assert_eq!(state.current(), None);
    }

    #[test]
    fn test_published_value_is_a_snapshot() {
        let mut state = AddressState::default();
        let first = state.observe(Ok(addr("1.1.1.1"))).unwrap();
        state.observe(Ok(addr("2.2.2.2")));
        assert_eq!(first, addr("1.1.1.1"));
        assert_eq!(state.current(), Some(&addr("2.2.2.2")));
    }
}
