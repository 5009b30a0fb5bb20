//! Balancer construction.

use std::sync::Arc;

use crate::upstream::{
    cluster_info::ClusterInfo, host_set::HostSet, least_conn::LeastConnections, random::Random,
    round_robin::RoundRobin, LbType, LoadBalancer,
};

/// Builds a balancer for a cluster over a given host set.
///
/// The subset engine calls this once for the full host set, once per
/// non-empty subset, and once for a default-subset fallback.
pub trait LoadBalancerFactory: Send + Sync + std::fmt::Debug {
    fn create(&self, info: &ClusterInfo, hosts: HostSet) -> Arc<dyn LoadBalancer>;
}

/// Dispatches on [`ClusterInfo::lb_type`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLoadBalancerFactory;

impl LoadBalancerFactory for DefaultLoadBalancerFactory {
    fn create(&self, info: &ClusterInfo, hosts: HostSet) -> Arc<dyn LoadBalancer> {
        match info.lb_type() {
            LbType::RoundRobin => Arc::new(RoundRobin::new(hosts)),
            LbType::LeastConnections => Arc::new(LeastConnections::new(hosts)),
            LbType::Random => Arc::new(Random::new(hosts)),
        }
    }
}
