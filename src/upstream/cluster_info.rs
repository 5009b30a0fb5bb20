//! Cluster-level settings consumed by the subset engine.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ClusterConfig;
use crate::subset::metadata::{SubsetKeyGroup, SubsetMetadata};
use crate::upstream::{stats::ClusterStats, LbType};

/// What to do when a request matches no subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// No fallback: a miss yields no balancer.
    #[default]
    NoFallback,
    /// Fall back to the balancer over every host.
    AnyEndpoint,
    /// Fall back to the hosts matching the default subset metadata.
    DefaultSubset,
}

impl FallbackPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackPolicy::NoFallback => "no_fallback",
            FallbackPolicy::AnyEndpoint => "any_endpoint",
            FallbackPolicy::DefaultSubset => "default_subset",
        }
    }
}

/// Subset configuration of one cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LbSubsetInfo {
    subset_keys: Vec<SubsetKeyGroup>,
    default_subset: SubsetMetadata,
    fallback_policy: FallbackPolicy,
}

impl LbSubsetInfo {
    pub fn new(
        subset_keys: Vec<SubsetKeyGroup>,
        default_subset: SubsetMetadata,
        fallback_policy: FallbackPolicy,
    ) -> Self {
        Self {
            subset_keys,
            default_subset,
            fallback_policy,
        }
    }

    pub fn subset_keys(&self) -> &[SubsetKeyGroup] {
        &self.subset_keys
    }

    pub fn default_subset(&self) -> &SubsetMetadata {
        &self.default_subset
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback_policy
    }
}

/// Name, algorithm, subset settings and stats sink of a cluster.
///
/// Cloning shares the stats sink.
#[derive(Debug, Clone)]
pub struct ClusterInfo {
    name: String,
    lb_type: LbType,
    subset_info: LbSubsetInfo,
    stats: Arc<ClusterStats>,
}

impl ClusterInfo {
    pub fn new(name: impl Into<String>, lb_type: LbType, subset_info: LbSubsetInfo) -> Self {
        let name = name.into();
        let stats = Arc::new(ClusterStats::new(name.clone()));
        Self {
            name,
            lb_type,
            subset_info,
            stats,
        }
    }

    pub fn from_config(config: &ClusterConfig) -> Self {
        let subset = &config.subset;
        let subset_info = LbSubsetInfo::new(
            subset.keys.iter().cloned().map(SubsetKeyGroup::new).collect(),
            subset.default_subset.clone(),
            subset.fallback_policy,
        );
        Self::new(config.name.clone(), config.lb_type, subset_info)
    }

    /// Reuse an existing stats sink, so counters survive a config reload.
    pub fn with_stats(mut self, stats: Arc<ClusterStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lb_type(&self) -> LbType {
        self.lb_type
    }

    pub fn lb_subset_info(&self) -> &LbSubsetInfo {
        &self.subset_info
    }

    pub fn stats(&self) -> &Arc<ClusterStats> {
        &self.stats
    }
}
