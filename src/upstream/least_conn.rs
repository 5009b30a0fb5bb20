//! Least Connections load balancing strategy.

use std::sync::Arc;

use crate::upstream::{host::Host, host_set::HostSet, LoadBalancer};

/// Least connections selector.
/// Selects the healthy host with the minimum number of active connections.
#[derive(Debug)]
pub struct LeastConnections {
    hosts: HostSet,
}

impl LeastConnections {
    pub fn new(hosts: HostSet) -> Self {
        Self { hosts }
    }
}

impl LoadBalancer for LeastConnections {
    fn choose_host(&self) -> Option<Arc<Host>> {
        // In case of tie, the first one is selected (stability)
        self.hosts
            .hosts()
            .iter()
            .filter(|h| h.is_healthy())
            .min_by_key(|h| h.active_connections())
            .cloned()
    }

    fn host_set(&self) -> &HostSet {
        &self.hosts
    }
}
