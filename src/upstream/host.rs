//! Upstream host abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream endpoint and its metadata
//! - Track active connections (for Least Connections LB)
//! - Enforce max connection limits
//! - Track health state with consecutive success/failure thresholds

use std::collections::HashMap;
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

/// Health State enum.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Unknown = 0,
    Healthy = 1,
    Unhealthy = 2,
}

impl From<u8> for HealthState {
    fn from(val: u8) -> Self {
        match val {
            1 => HealthState::Healthy,
            2 => HealthState::Unhealthy,
            _ => HealthState::Unknown,
        }
    }
}

/// A single upstream host.
///
/// Metadata is fixed at construction; only connection and health counters
/// change while the host is part of a published host set.
#[derive(Debug)]
pub struct Host {
    addr: SocketAddr,
    metadata: HashMap<String, String>,
    weight: u32,
    max_connections: usize,
    active_connections: AtomicUsize,
    state: AtomicU8,
    consecutive_failures: AtomicUsize,
    consecutive_successes: AtomicUsize,
}

impl Host {
    /// Create a host with weight 1 and no connection cap.
    pub fn new(addr: SocketAddr, metadata: HashMap<String, String>) -> Self {
        Self {
            addr,
            metadata,
            weight: 1,
            max_connections: usize::MAX,
            active_connections: AtomicUsize::new(0),
            state: AtomicU8::new(HealthState::Unknown as u8),
            consecutive_failures: AtomicUsize::new(0),
            consecutive_successes: AtomicUsize::new(0),
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Value of one metadata key, if the host carries it.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Configured weight. Carried as host data; the bundled balancers do not weight selection.
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Get the current number of active connections.
    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::Relaxed)
    }

    /// Try to create a connection guard that increments count.
    pub fn try_acquire(self: &Arc<Self>) -> Option<HostConnectionGuard> {
        let mut prev = self.active_connections.load(Ordering::Relaxed);
        loop {
            if prev >= self.max_connections {
                return None;
            }
            match self.active_connections.compare_exchange_weak(
                prev,
                prev + 1,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(x) => prev = x,
            }
        }
        Some(HostConnectionGuard { host: self.clone() })
    }

    pub fn health_state(&self) -> HealthState {
        HealthState::from(self.state.load(Ordering::Relaxed))
    }

    /// Force a health state, clearing both streak counters.
    pub fn set_health_state(&self, state: HealthState) {
        self.consecutive_failures.store(0, Ordering::Relaxed);
        self.consecutive_successes.store(0, Ordering::Relaxed);
        self.transition(state);
    }

    /// Report a successful request/check.
    ///
    /// A host that is not yet `Healthy` becomes healthy after
    /// `healthy_threshold` consecutive successes.
    pub fn mark_success(&self, healthy_threshold: usize) {
        self.consecutive_failures.store(0, Ordering::Relaxed);
        if self.health_state() == HealthState::Healthy {
            return;
        }

        let successes = self.consecutive_successes.fetch_add(1, Ordering::Relaxed) + 1;
        if successes >= healthy_threshold {
            self.consecutive_successes.store(0, Ordering::Relaxed);
            self.transition(HealthState::Healthy);
        }
    }

    /// Report a failed request/check.
    ///
    /// A host that is not yet `Unhealthy` is excluded from selection after
    /// `unhealthy_threshold` consecutive failures.
    pub fn mark_failure(&self, unhealthy_threshold: usize) {
        self.consecutive_successes.store(0, Ordering::Relaxed);
        if self.health_state() == HealthState::Unhealthy {
            return;
        }

        let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= unhealthy_threshold {
            self.consecutive_failures.store(0, Ordering::Relaxed);
            self.transition(HealthState::Unhealthy);
        }
    }

    fn transition(&self, state: HealthState) {
        let prev = self.state.swap(state as u8, Ordering::Relaxed);
        if prev != state as u8 {
            tracing::debug!(addr = %self.addr, from = ?HealthState::from(prev), to = ?state, "Host health changed");
        }
    }

    /// Return true if host is considered healthy (Healthy or Unknown).
    pub fn is_healthy(&self) -> bool {
        self.health_state() != HealthState::Unhealthy
    }
}

/// A RAII guard that manages the active connection count.
#[derive(Debug)]
pub struct HostConnectionGuard {
    host: Arc<Host>,
}

impl Deref for HostConnectionGuard {
    type Target = Host;
    fn deref(&self) -> &Self::Target {
        &self.host
    }
}

impl Drop for HostConnectionGuard {
    fn drop(&mut self) {
        self.host.active_connections.fetch_sub(1, Ordering::Relaxed);
    }
}
