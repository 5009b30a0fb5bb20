//! Random load balancing strategy.

use std::sync::Arc;

use crate::upstream::{host::Host, host_set::HostSet, LoadBalancer};

/// Picks a random starting offset and returns the first healthy host from there.
#[derive(Debug)]
pub struct Random {
    hosts: HostSet,
}

impl Random {
    pub fn new(hosts: HostSet) -> Self {
        Self { hosts }
    }
}

impl LoadBalancer for Random {
    fn choose_host(&self) -> Option<Arc<Host>> {
        let hosts = self.hosts.hosts();
        if hosts.is_empty() {
            return None;
        }

        let len = hosts.len();
        let start = fastrand::usize(..len);
        (0..len)
            .map(|i| &hosts[(start + i) % len])
            .find(|h| h.is_healthy())
            .cloned()
    }

    fn host_set(&self) -> &HostSet {
        &self.hosts
    }
}
