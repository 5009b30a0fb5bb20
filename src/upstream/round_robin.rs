//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::upstream::{host::Host, host_set::HostSet, LoadBalancer};

/// Round-robin selector.
/// Stores an internal counter to rotate through hosts.
#[derive(Debug)]
pub struct RoundRobin {
    hosts: HostSet,
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new(hosts: HostSet) -> Self {
        Self {
            hosts,
            counter: AtomicUsize::new(0),
        }
    }
}

impl LoadBalancer for RoundRobin {
    fn choose_host(&self) -> Option<Arc<Host>> {
        let hosts = self.hosts.hosts();
        if hosts.is_empty() {
            return None;
        }

        // Bounded scan so an all-unhealthy set terminates.
        let start_count = self.counter.fetch_add(1, Ordering::Relaxed);
        let len = hosts.len();

        for i in 0..len {
            let host = &hosts[(start_count + i) % len];
            if host.is_healthy() {
                return Some(host.clone());
            }
        }
        None
    }

    fn host_set(&self) -> &HostSet {
        &self.hosts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::host::HealthState;
    use std::collections::HashMap;

    fn hosts(ports: &[u16]) -> HostSet {
        ports
            .iter()
            .map(|p| Arc::new(Host::new(format!("127.0.0.1:{p}").parse().unwrap(), HashMap::new())))
            .collect()
    }

    #[test]
    fn test_round_robin() {
        let lb = RoundRobin::new(hosts(&[8080, 8081]));
        let h = lb.host_set().hosts().to_vec();

        assert_eq!(lb.choose_host().unwrap().addr(), h[0].addr());
        assert_eq!(lb.choose_host().unwrap().addr(), h[1].addr());
        assert_eq!(lb.choose_host().unwrap().addr(), h[0].addr());
    }

    #[test]
    fn test_round_robin_skips_unhealthy() {
        let lb = RoundRobin::new(hosts(&[8080, 8081]));
        let h = lb.host_set().hosts().to_vec();
        h[0].set_health_state(HealthState::Unhealthy);

        for _ in 0..4 {
            assert_eq!(lb.choose_host().unwrap().addr(), h[1].addr());
        }

        h[1].set_health_state(HealthState::Unhealthy);
        assert!(lb.choose_host().is_none());
    }

    #[test]
    fn test_round_robin_empty() {
        assert!(RoundRobin::new(HostSet::default()).choose_host().is_none());
    }
}
