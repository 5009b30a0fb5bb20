//! Configuration schema definitions.
//!
//! This module defines the cluster configuration structure.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::subset::builder::SubsetBuildMode;
use crate::subset::metadata::MetadataPair;
use crate::upstream::{FallbackPolicy, LbType};

/// Root configuration for one upstream cluster.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Cluster identifier for logging/metrics.
    pub name: String,

    /// Balancing algorithm used for every subset.
    pub lb_type: LbType,

    /// Subset load balancing settings.
    pub subset: SubsetConfig,

    /// Upstream hosts, in ordinal order.
    pub hosts: Vec<HostConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            lb_type: LbType::default(),
            subset: SubsetConfig::default(),
            hosts: Vec::new(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Subset selection settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SubsetConfig {
    /// Key groups, e.g. `[["version"], ["version", "region"]]`.
    pub keys: Vec<Vec<String>>,

    /// Ordered metadata used by the `default_subset` fallback policy.
    pub default_subset: Vec<MetadataPair>,

    /// Behaviour when a request matches no subset.
    pub fallback_policy: FallbackPolicy,

    /// Strategy used to compute per-subset host sets.
    pub build_mode: SubsetBuildMode,
}

/// Upstream host configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostConfig {
    /// Host address (e.g., "127.0.0.1:3000").
    pub address: String,

    /// Relative weight exposed on the host (default: 1). Not used by the bundled balancers.
    #[serde(default = "default_weight")]
    pub weight: u32,

    /// Maximum concurrent connections to this host.
    #[serde(default = "default_max_host_conns")]
    pub max_connections: usize,

    /// Metadata matched against subset keys.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

fn default_weight() -> u32 {
    1
}

fn default_max_host_conns() -> usize {
    100
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
