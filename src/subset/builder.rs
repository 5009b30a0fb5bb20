//! Subset load balancer construction.
//!
//! # Steps
//! ```text
//! HostSet + ClusterInfo
//!     → MetadataIndex over every configured key
//!     → full balancer over all hosts
//!     → fallback entry per FallbackPolicy
//!     → for each key group, for each observed combination:
//!         materialize the tree path, filter hosts, attach a balancer if non-empty
//!     → SubsetLoadBalancer (immutable)
//! ```

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::observability::metrics;
use crate::subset::balancer::SubsetLoadBalancer;
use crate::subset::combinations::metadata_combinations;
use crate::subset::entry::{find_or_create_subset, SubsetEntry, SubsetMap};
use crate::subset::filter::{scan_hosts, HostFilter};
use crate::subset::index::{merge_keys, MetadataIndex};
use crate::subset::metadata::MetadataPair;
use crate::upstream::{
    cluster_info::{ClusterInfo, FallbackPolicy},
    factory::LoadBalancerFactory,
    host_set::HostSet,
    LoadBalancer,
};

/// How per-combination host sets are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsetBuildMode {
    /// Intersect per-value ordinal sets from the metadata index.
    #[default]
    PreIndex,
    /// Scan every host's metadata for each combination.
    Filter,
}

/// Single-use builder for one [`SubsetLoadBalancer`].
pub struct SubsetLoadBalancerBuilder<'a> {
    info: &'a ClusterInfo,
    host_set: HostSet,
    factory: &'a dyn LoadBalancerFactory,
    mode: SubsetBuildMode,
    index: MetadataIndex,
    subset_count: u64,
}

impl<'a> SubsetLoadBalancerBuilder<'a> {
    pub fn new(
        info: &'a ClusterInfo,
        host_set: HostSet,
        factory: &'a dyn LoadBalancerFactory,
        mode: SubsetBuildMode,
    ) -> Self {
        let subset_info = info.lb_subset_info();
        let keys = merge_keys(subset_info.subset_keys(), subset_info.default_subset());
        let index = MetadataIndex::build(host_set.hosts(), keys);
        Self {
            info,
            host_set,
            factory,
            mode,
            index,
            subset_count: 0,
        }
    }

    pub fn build(mut self) -> SubsetLoadBalancer {
        let started = Instant::now();

        let full_lb = self.factory.create(self.info, self.filter_hosts(&[]));
        let fallback_subset = self.create_fallback_subset(&full_lb);
        let subsets = self.create_subsets();

        self.info.stats().update_subsets_created(self.subset_count);
        let elapsed = started.elapsed();
        metrics::record_build_duration(self.info.name(), elapsed);
        tracing::info!(
            cluster = %self.info.name(),
            hosts = self.host_set.len(),
            subsets_created = self.subset_count,
            mode = ?self.mode,
            elapsed_us = elapsed.as_micros() as u64,
            "Subset load balancer built"
        );

        SubsetLoadBalancer::new(
            self.info.clone(),
            self.host_set,
            full_lb,
            fallback_subset,
            subsets,
            self.subset_count,
        )
    }

    fn filter_hosts(&self, kvs: &[MetadataPair]) -> HostSet {
        match self.mode {
            SubsetBuildMode::PreIndex => HostFilter::new(&self.host_set, &self.index).filter(kvs),
            SubsetBuildMode::Filter => scan_hosts(&self.host_set, kvs),
        }
    }

    fn create_subsets(&mut self) -> SubsetMap {
        let info = self.info;
        let mut subsets = SubsetMap::new();
        for group in info.lb_subset_info().subset_keys() {
            let combinations = metadata_combinations(&self.index, group.keys());
            tracing::trace!(
                cluster = %info.name(),
                keys = %group,
                combinations = combinations.len(),
                "Expanding subset key group"
            );
            for kvs in combinations {
                let hosts = self.filter_hosts(&kvs);
                let Some(entry) = find_or_create_subset(&mut subsets, &kvs) else {
                    continue;
                };
                if !hosts.is_empty() {
                    entry.set_balancer(self.factory.create(info, hosts));
                    self.subset_count += 1;
                }
            }
        }
        subsets
    }

    fn create_fallback_subset(&self, full_lb: &Arc<dyn LoadBalancer>) -> Option<SubsetEntry> {
        let subset_info = self.info.lb_subset_info();
        match subset_info.fallback_policy() {
            FallbackPolicy::NoFallback => {
                tracing::debug!(cluster = %self.info.name(), "Subset fallback is disabled");
                None
            }
            FallbackPolicy::AnyEndpoint => Some(SubsetEntry::with_balancer(full_lb.clone())),
            FallbackPolicy::DefaultSubset => {
                let hosts = self.filter_hosts(subset_info.default_subset());
                if hosts.is_empty() {
                    tracing::warn!(
                        cluster = %self.info.name(),
                        "Default subset matches no hosts, fallback has no balancer"
                    );
                    return Some(SubsetEntry::new());
                }
                Some(SubsetEntry::with_balancer(self.factory.create(self.info, hosts)))
            }
        }
    }
}

/// Build a subset load balancer in one call.
pub fn build_subset_load_balancer(
    info: &ClusterInfo,
    host_set: HostSet,
    factory: &dyn LoadBalancerFactory,
    mode: SubsetBuildMode,
) -> SubsetLoadBalancer {
    SubsetLoadBalancerBuilder::new(info, host_set, factory, mode).build()
}
