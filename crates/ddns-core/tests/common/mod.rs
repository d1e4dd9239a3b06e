//! Test doubles and common utilities for engine contract tests
//!
//! These doubles script what the collaborators return and count how often
//! the engine calls them. Counters live behind `Arc` so a test can keep a
//! handle after the double itself has been boxed into the engine.

#![allow(dead_code)]

use ddns_core::config::{DdnsConfig, EngineConfig, IpSourceConfig, RecordConfig};
use ddns_core::error::{Error, Result};
use ddns_core::traits::{IpResolver, RecordUpdater, UpsertRequest};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted answer from the resolver
#[derive(Debug, Clone)]
pub enum ResolverStep {
    /// Return this IP
    Ip(&'static str),
    /// Fail with a recoverable discovery error
    Fail,
    /// Fail with a fatal configuration error
    MissingConfig(&'static str),
}

/// An IpResolver that replays a script, then repeats a fallback IP
pub struct ScriptedIpResolver {
    steps: Arc<Mutex<VecDeque<ResolverStep>>>,
    fallback: &'static str,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedIpResolver {
    /// Always return `ip`
    pub fn fixed(ip: &'static str) -> Self {
        Self::scripted(Vec::new(), ip)
    }

    /// Return `steps` in order, then `fallback` forever
    pub fn scripted(steps: Vec<ResolverStep>, fallback: &'static str) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into())),
            fallback,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times fetch_public_ip() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Create a new resolver that shares script and counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            steps: Arc::clone(&other.steps),
            fallback: other.fallback,
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpResolver for ScriptedIpResolver {
    async fn fetch_public_ip(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(ResolverStep::Ip(ip)) => Ok(ip.to_string()),
            Some(ResolverStep::Fail) => Err(Error::ip_discovery("connection refused")),
            Some(ResolverStep::MissingConfig(name)) => Err(Error::missing_config(name)),
            None => Ok(self.fallback.to_string()),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A RecordUpdater that records every request and can fail on demand
pub struct MockRecordUpdater {
    /// Every request received, successful or not
    requests: Arc<Mutex<Vec<UpsertRequest>>>,
    /// Number of upcoming calls that should fail
    failures_remaining: Arc<AtomicUsize>,
    /// Simulated provider latency
    delay: Duration,
}

impl MockRecordUpdater {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            failures_remaining: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
        }
    }

    /// Fail the next `n` calls with a recoverable update error
    pub fn failing_first(n: usize) -> Self {
        let updater = Self::new();
        updater.fail_next(n);
        updater
    }

    /// Fail the next `n` calls, counting from now
    pub fn fail_next(&self, n: usize) {
        self.failures_remaining.store(n, Ordering::SeqCst);
    }

    /// Take `delay` to answer each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Get the number of times upsert_a_record() was called
    pub fn update_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Get the requests received so far
    pub fn requests(&self) -> Vec<UpsertRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Target IPs of the requests received so far
    pub fn targets(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .flat_map(|request| request.values)
            .collect()
    }

    /// Create a new MockRecordUpdater that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            requests: Arc::clone(&other.requests),
            failures_remaining: Arc::clone(&other.failures_remaining),
            delay: other.delay,
        }
    }
}

#[async_trait::async_trait]
impl RecordUpdater for MockRecordUpdater {
    async fn upsert_a_record(&self, request: &UpsertRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let should_fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(Error::update("Throttling: Rate exceeded"));
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(record_name: &str, refresh_interval_ms: u64) -> DdnsConfig {
    DdnsConfig {
        ip_source: IpSourceConfig {
            url: "http://127.0.0.1/ip".to_string(),
        },
        record: RecordConfig::new("Z123", record_name),
        refresh_interval_ms,
        engine: EngineConfig {
            event_channel_capacity: 100,
        },
    }
}
