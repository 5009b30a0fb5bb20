//! Upstream hosts and load balancing.
//!
//! # Data Flow
//! ```text
//! ClusterConfig.hosts
//!     → host_set.rs (ordered HostSet snapshot)
//!     → cluster_info.rs (LbType + subset settings + stats)
//!     → factory.rs (LbType → concrete balancer over a HostSet):
//!         - round_robin.rs (rotate through hosts)
//!         - least_conn.rs (pick host with fewest connections)
//!         - random.rs (random starting offset)
//!     → host.rs (acquire connection guard on the chosen host)
//! ```
//!
//! # Design Decisions
//! - A balancer owns the host set it was built over; rebuilds create new balancers
//! - Algorithm selection per cluster, through a factory the subset engine calls
//! - Unhealthy hosts excluded from selection

pub mod cluster_info;
pub mod factory;
pub mod host;
pub mod host_set;
pub mod least_conn;
pub mod random;
pub mod round_robin;
pub mod stats;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use cluster_info::{ClusterInfo, FallbackPolicy, LbSubsetInfo};
pub use factory::{DefaultLoadBalancerFactory, LoadBalancerFactory};
pub use host::{HealthState, Host, HostConnectionGuard};
pub use host_set::{HostError, HostSet};
pub use stats::ClusterStats;

/// A balancer bound to one host set.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Pick a host for the next request, or `None` if no healthy host remains.
    fn choose_host(&self) -> Option<Arc<Host>>;

    /// The hosts this balancer selects from.
    fn host_set(&self) -> &HostSet;
}

/// Load balancing algorithm selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LbType {
    #[default]
    RoundRobin,
    LeastConnections,
    Random,
}
