//! Per-cluster counters.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::observability::metrics;
use crate::upstream::cluster_info::FallbackPolicy;

/// Stats sink shared by every build of one cluster.
///
/// Each update is mirrored to the process metrics recorder.
#[derive(Debug, Default)]
pub struct ClusterStats {
    cluster: String,
    lb_subsets_created: AtomicU64,
    lb_subset_fallbacks: AtomicU64,
    lb_subset_misses: AtomicU64,
}

impl ClusterStats {
    pub fn new(cluster: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            ..Self::default()
        }
    }

    /// Subsets that received a balancer in the most recent build.
    pub fn lb_subsets_created(&self) -> u64 {
        self.lb_subsets_created.load(Ordering::Relaxed)
    }

    /// Replace the created-subset count with the result of a new build.
    pub fn update_subsets_created(&self, count: u64) {
        self.lb_subsets_created.store(count, Ordering::Relaxed);
        metrics::record_subsets_created(&self.cluster, count);
    }

    pub fn lb_subset_fallbacks(&self) -> u64 {
        self.lb_subset_fallbacks.load(Ordering::Relaxed)
    }

    pub fn record_fallback(&self, policy: FallbackPolicy) {
        self.lb_subset_fallbacks.fetch_add(1, Ordering::Relaxed);
        metrics::record_fallback(&self.cluster, policy.as_str());
    }

    /// Selections that ended without any balancer.
    pub fn lb_subset_misses(&self) -> u64 {
        self.lb_subset_misses.load(Ordering::Relaxed)
    }

    pub fn record_miss(&self) {
        self.lb_subset_misses.fetch_add(1, Ordering::Relaxed);
        metrics::record_no_balancer(&self.cluster);
    }
}
