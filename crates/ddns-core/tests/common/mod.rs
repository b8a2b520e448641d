//! Test doubles and common utilities for pipeline contract tests
//!
//! This module provides minimal test doubles that script address lookups
//! and record provider calls without touching the network.

#![allow(dead_code)]

use ddns_core::agent::AgentEvent;
use ddns_core::error::{Error, Result};
use ddns_core::traits::{AddressSource, DnsProvider};
use ddns_core::{ChangeReceiver, PublicAddress};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};

/// One scripted lookup outcome
#[derive(Debug, Clone)]
pub enum Lookup {
    Ok(&'static str),
    Fail,
}

/// An AddressSource that replays a fixed script of lookups
///
/// Once the script is exhausted every lookup fails, which keeps the
/// monitor in `Unknown` and publishes nothing further.
pub struct ScriptedAddressSource {
    script: std::sync::Mutex<VecDeque<Lookup>>,
    fetch_call_count: Arc<AtomicUsize>,
}

impl ScriptedAddressSource {
    pub fn new(script: impl IntoIterator<Item = Lookup>) -> Self {
        Self {
            script: std::sync::Mutex::new(script.into_iter().collect()),
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times fetch() was called
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AddressSource for ScriptedAddressSource {
    async fn fetch(&self) -> Result<PublicAddress> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);

        match self.script.lock().unwrap().pop_front() {
            Some(Lookup::Ok(raw)) => PublicAddress::parse(raw),
            Some(Lookup::Fail) => Err(Error::network("scripted failure")),
            None => Err(Error::network("script exhausted")),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// An AddressSource whose lookup panics, taking the monitor task down with it
pub struct PanickingAddressSource;

#[async_trait::async_trait]
impl AddressSource for PanickingAddressSource {
    async fn fetch(&self) -> Result<PublicAddress> {
        panic!("address source crashed");
    }

    fn source_name(&self) -> &'static str {
        "panicking"
    }
}

/// A DnsProvider that records every call and optionally fails
pub struct RecordingProvider {
    updated: Arc<std::sync::Mutex<Vec<PublicAddress>>>,
    /// When set, every update fails with this message
    failure: Option<&'static str>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self {
            updated: Arc::new(std::sync::Mutex::new(Vec::new())),
            failure: None,
        }
    }

    /// A provider that rejects every update, like an endpoint answering HTTP 500
    pub fn failing(message: &'static str) -> Self {
        Self {
            failure: Some(message),
            ..Self::new()
        }
    }

    /// Get the addresses passed to update_record(), in call order
    pub fn updated(&self) -> Vec<PublicAddress> {
        self.updated.lock().unwrap().clone()
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.updated.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl DnsProvider for RecordingProvider {
    async fn update_record(&self, address: &PublicAddress) -> Result<()> {
        self.updated.lock().unwrap().push(address.clone());

        match self.failure {
            Some(message) => Err(Error::update("recording", message)),
            None => Ok(()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// A DnsProvider whose updates block until the test opens the gate
pub struct GatedProvider {
    started: Arc<std::sync::Mutex<Vec<PublicAddress>>>,
    completed: Arc<std::sync::Mutex<Vec<PublicAddress>>>,
    gate: Arc<Semaphore>,
}

impl GatedProvider {
    pub fn new() -> Self {
        Self {
            started: Arc::new(std::sync::Mutex::new(Vec::new())),
            completed: Arc::new(std::sync::Mutex::new(Vec::new())),
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    /// Let `n` blocked updates complete
    pub fn open(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn started(&self) -> Vec<PublicAddress> {
        self.started.lock().unwrap().clone()
    }

    pub fn completed(&self) -> Vec<PublicAddress> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for GatedProvider {
    async fn update_record(&self, address: &PublicAddress) -> Result<()> {
        self.started.lock().unwrap().push(address.clone());

        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| Error::update("gated", "gate closed"))?;
        permit.forget();

        self.completed.lock().unwrap().push(address.clone());
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "gated"
    }
}

/// Shorthand for building an address in assertions
pub fn addr(raw: &str) -> PublicAddress {
    PublicAddress::parse(raw).expect("valid test address")
}

/// Polling interval short enough to run whole scripts quickly
pub const FAST_POLL: Duration = Duration::from_millis(1);

/// Drain deliveries from a change receiver until it stays quiet for `quiet`
pub async fn collect_deliveries(rx: &mut ChangeReceiver, quiet: Duration) -> Vec<PublicAddress> {
    let mut delivered = Vec::new();
    while let Ok(Some(addr)) = tokio::time::timeout(quiet, rx.await_change()).await {
        delivered.push(addr);
    }
    delivered
}

/// Collect agent events until `done` holds or the deadline passes
pub async fn wait_for_events(
    rx: &mut mpsc::Receiver<AgentEvent>,
    deadline: Duration,
    mut done: impl FnMut(&[AgentEvent]) -> bool,
) -> Vec<AgentEvent> {
    let mut events = Vec::new();
    let _ = tokio::time::timeout(deadline, async {
        while let Some(event) = rx.recv().await {
            events.push(event);
            if done(&events) {
                break;
            }
        }
    })
    .await;
    events
}

/// Count events matching a predicate
pub fn count(events: &[AgentEvent], pred: impl Fn(&AgentEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}
