//! Rebuild-and-swap holder for one cluster's subset load balancer.

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;

use crate::config::ClusterConfig;
use crate::observability::metrics;
use crate::subset::builder::{build_subset_load_balancer, SubsetBuildMode};
use crate::subset::{MetadataPair, SubsetLoadBalancer, SubsetSelection};
use crate::upstream::{
    ClusterInfo, DefaultLoadBalancerFactory, Host, HostError, HostSet, LoadBalancerFactory,
};

#[derive(Debug, Clone)]
struct ClusterState {
    info: ClusterInfo,
    hosts: HostSet,
    mode: SubsetBuildMode,
}

/// Owns the inputs of the current build and the published result.
pub struct Cluster {
    state: ArcSwap<ClusterState>,
    balancer: ArcSwap<SubsetLoadBalancer>,
    factory: Arc<dyn LoadBalancerFactory>,
    writer: Mutex<()>,
}

impl Cluster {
    pub fn new(info: ClusterInfo, hosts: HostSet, mode: SubsetBuildMode) -> Self {
        Self::with_factory(info, hosts, mode, Arc::new(DefaultLoadBalancerFactory))
    }

    pub fn with_factory(
        info: ClusterInfo,
        hosts: HostSet,
        mode: SubsetBuildMode,
        factory: Arc<dyn LoadBalancerFactory>,
    ) -> Self {
        let balancer = build_subset_load_balancer(&info, hosts.clone(), factory.as_ref(), mode);
        Self {
            state: ArcSwap::from_pointee(ClusterState { info, hosts, mode }),
            balancer: ArcSwap::from_pointee(balancer),
            factory,
            writer: Mutex::new(()),
        }
    }

    pub fn from_config(config: &ClusterConfig) -> Result<Self, HostError> {
        let hosts = HostSet::from_config(&config.hosts)?;
        Ok(Self::new(
            ClusterInfo::from_config(config),
            hosts,
            config.subset.build_mode,
        ))
    }

    /// The currently published balancer. Holding the `Arc` keeps that build
    /// alive even if a newer one is swapped in.
    pub fn load(&self) -> Arc<SubsetLoadBalancer> {
        self.balancer.load_full()
    }

    pub fn info(&self) -> ClusterInfo {
        self.state.load().info.clone()
    }

    pub fn hosts(&self) -> HostSet {
        self.state.load().hosts.clone()
    }

    pub fn select(&self, metadata: &[MetadataPair]) -> SubsetSelection {
        self.balancer.load().select_balancer(metadata)
    }

    pub fn choose_host(&self, metadata: &[MetadataPair]) -> Option<Arc<Host>> {
        self.balancer.load().choose_host(metadata)
    }

    /// Rebuild over a new host membership.
    pub fn update_hosts(&self, hosts: HostSet) {
        self.rebuild("hosts", |state| ClusterState {
            hosts,
            ..state.clone()
        });
    }

    /// Rebuild with new cluster settings over the current hosts. Stats carry over.
    pub fn update_info(&self, info: ClusterInfo) {
        self.rebuild("info", |state| ClusterState {
            info: info.with_stats(state.info.stats().clone()),
            ..state.clone()
        });
    }

    /// Rebuild from a reloaded configuration. Stats carry over.
    ///
    /// Host addresses are parsed before anything is swapped, so a bad config
    /// leaves the published balancer untouched.
    pub fn apply_config(&self, config: &ClusterConfig) -> Result<(), HostError> {
        let hosts = HostSet::from_config(&config.hosts)?;
        self.rebuild("config", |state| ClusterState {
            info: ClusterInfo::from_config(config).with_stats(state.info.stats().clone()),
            hosts,
            mode: config.subset.build_mode,
        });
        Ok(())
    }

    fn rebuild(&self, trigger: &'static str, next: impl FnOnce(&ClusterState) -> ClusterState) {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let state = next(&self.state.load());
        let balancer = build_subset_load_balancer(
            &state.info,
            state.hosts.clone(),
            self.factory.as_ref(),
            state.mode,
        );
        metrics::record_rebuild(state.info.name(), trigger);
        tracing::debug!(cluster = %state.info.name(), trigger, "Publishing rebuilt subset load balancer");
        // State first: a reader that sees the new balancer also sees its inputs.
        self.state.store(Arc::new(state));
        self.balancer.store(Arc::new(balancer));
    }
}

impl std::fmt::Debug for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.load();
        f.debug_struct("Cluster")
            .field("name", &state.info.name())
            .field("hosts", &state.hosts.len())
            .field("mode", &state.mode)
            .finish()
    }
}
