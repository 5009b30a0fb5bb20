//! The published subset load balancer.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::Serialize;

use crate::subset::entry::{find_subset, SubsetEntry, SubsetMap};
use crate::subset::metadata::{MetadataPair, SubsetMetadata};
use crate::upstream::{
    cluster_info::ClusterInfo, host::Host, host_set::HostSet, LbType, LoadBalancer,
};

/// Outcome of resolving request metadata to a balancer.
#[derive(Debug, Clone)]
pub enum SubsetSelection {
    /// The request metadata named a populated subset.
    Subset(Arc<dyn LoadBalancer>),
    /// The subset lookup missed and the fallback entry supplied a balancer.
    Fallback(Arc<dyn LoadBalancer>),
    /// Neither a subset nor the fallback can serve the request.
    NoBalancer,
}

impl SubsetSelection {
    pub fn balancer(&self) -> Option<&Arc<dyn LoadBalancer>> {
        match self {
            SubsetSelection::Subset(lb) | SubsetSelection::Fallback(lb) => Some(lb),
            SubsetSelection::NoBalancer => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SubsetSelection::Fallback(_))
    }
}

/// One materialized tree path and the hosts behind it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubsetSnapshot {
    pub path: SubsetMetadata,
    pub hosts: Option<Vec<SocketAddr>>,
}

/// Immutable result of one build.
///
/// Lookups walk the tree pair by pair in the order given. Keys are never
/// reordered, so `[(region, a), (version, v1)]` and `[(version, v1), (region, a)]`
/// are different paths.
#[derive(Debug)]
pub struct SubsetLoadBalancer {
    info: ClusterInfo,
    host_set: HostSet,
    full_lb: Arc<dyn LoadBalancer>,
    fallback_subset: Option<SubsetEntry>,
    subsets: SubsetMap,
    subset_count: u64,
}

impl SubsetLoadBalancer {
    pub(crate) fn new(
        info: ClusterInfo,
        host_set: HostSet,
        full_lb: Arc<dyn LoadBalancer>,
        fallback_subset: Option<SubsetEntry>,
        subsets: SubsetMap,
        subset_count: u64,
    ) -> Self {
        Self {
            info,
            host_set,
            full_lb,
            fallback_subset,
            subsets,
            subset_count,
        }
    }

    /// Resolve request metadata to a balancer, applying the fallback on a miss.
    ///
    /// Empty metadata never matches a subset and goes straight to the fallback.
    pub fn select_balancer(&self, metadata: &[MetadataPair]) -> SubsetSelection {
        if let Some(lb) = find_subset(&self.subsets, metadata).and_then(SubsetEntry::balancer) {
            return SubsetSelection::Subset(lb.clone());
        }

        let policy = self.info.lb_subset_info().fallback_policy();
        match self.fallback_subset.as_ref().and_then(SubsetEntry::balancer) {
            Some(lb) => {
                tracing::trace!(cluster = %self.info.name(), policy = policy.as_str(), "Subset miss, using fallback");
                self.info.stats().record_fallback(policy);
                SubsetSelection::Fallback(lb.clone())
            }
            None => {
                tracing::debug!(
                    cluster = %self.info.name(),
                    policy = policy.as_str(),
                    metadata = ?metadata,
                    "No subset or fallback balancer for request"
                );
                self.info.stats().record_miss();
                SubsetSelection::NoBalancer
            }
        }
    }

    /// Select a balancer and ask it for a host.
    pub fn choose_host(&self, metadata: &[MetadataPair]) -> Option<Arc<Host>> {
        self.select_balancer(metadata).balancer()?.choose_host()
    }

    pub fn cluster_info(&self) -> &ClusterInfo {
        &self.info
    }

    pub fn lb_type(&self) -> LbType {
        self.info.lb_type()
    }

    pub fn host_set(&self) -> &HostSet {
        &self.host_set
    }

    /// Balancer over every host, without filtering.
    pub fn full_balancer(&self) -> &Arc<dyn LoadBalancer> {
        &self.full_lb
    }

    pub fn fallback_subset(&self) -> Option<&SubsetEntry> {
        self.fallback_subset.as_ref()
    }

    pub fn subsets(&self) -> &SubsetMap {
        &self.subsets
    }

    /// Subsets that received a balancer during this build.
    pub fn subset_count(&self) -> u64 {
        self.subset_count
    }

    /// Every materialized path with its hosts, sorted by path.
    pub fn snapshot(&self) -> Vec<SubsetSnapshot> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        collect(&self.subsets, &mut prefix, &mut out);
        out.sort_by(|a, b| a.path.cmp(&b.path));
        out
    }
}

fn collect(subsets: &SubsetMap, prefix: &mut SubsetMetadata, out: &mut Vec<SubsetSnapshot>) {
    for (key, values) in subsets {
        for (value, entry) in values {
            prefix.push(MetadataPair::new(key.clone(), value.clone()));
            out.push(SubsetSnapshot {
                path: prefix.clone(),
                hosts: entry.host_set().map(HostSet::addresses),
            });
            collect(entry.children(), prefix, out);
            prefix.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subset::builder::{build_subset_load_balancer, SubsetBuildMode};
    use crate::subset::metadata::SubsetKeyGroup;
    use crate::upstream::{
        cluster_info::{FallbackPolicy, LbSubsetInfo},
        factory::DefaultLoadBalancerFactory,
    };
    use std::collections::HashMap;

    fn build(fallback: FallbackPolicy, default: &[(&str, &str)]) -> SubsetLoadBalancer {
        let hosts: HostSet = [("v1", 9000u16), ("v2", 9001)]
            .iter()
            .map(|(version, port)| {
                let metadata = HashMap::from([("version".to_string(), version.to_string())]);
                Arc::new(Host::new(format!("127.0.0.1:{port}").parse().unwrap(), metadata))
            })
            .collect();
        let info = ClusterInfo::new(
            "test",
            LbType::RoundRobin,
            LbSubsetInfo::new(
                vec![SubsetKeyGroup::new(["version"])],
                default.iter().map(|(k, v)| MetadataPair::new(*k, *v)).collect(),
                fallback,
            ),
        );
        build_subset_load_balancer(&info, hosts, &DefaultLoadBalancerFactory, SubsetBuildMode::PreIndex)
    }

    fn md(k: &str, v: &str) -> SubsetMetadata {
        vec![MetadataPair::new(k, v)]
    }

    #[test]
    fn test_selection_hit() {
        let lb = build(FallbackPolicy::NoFallback, &[]);
        let selection = lb.select_balancer(&md("version", "v2"));
        assert!(!selection.is_fallback());
        let host = selection.balancer().unwrap().choose_host().unwrap();
        assert_eq!(host.addr().port(), 9001);
    }

    #[test]
    fn test_no_fallback_miss() {
        let lb = build(FallbackPolicy::NoFallback, &[]);
        assert!(matches!(lb.select_balancer(&md("version", "v3")), SubsetSelection::NoBalancer));
        assert!(lb.choose_host(&md("version", "v3")).is_none());
        assert_eq!(lb.cluster_info().stats().lb_subset_misses(), 2);
    }

    #[test]
    fn test_empty_metadata_uses_fallback() {
        let lb = build(FallbackPolicy::AnyEndpoint, &[]);
        let selection = lb.select_balancer(&[]);
        assert!(selection.is_fallback());
        assert_eq!(selection.balancer().unwrap().host_set().len(), 2);
        assert_eq!(lb.cluster_info().stats().lb_subset_fallbacks(), 1);
    }

    #[test]
    fn test_default_subset_fallback() {
        let lb = build(FallbackPolicy::DefaultSubset, &[("version", "v1")]);
        let selection = lb.select_balancer(&md("version", "v7"));
        assert!(selection.is_fallback());
        let ports: Vec<_> = selection
            .balancer()
            .unwrap()
            .host_set()
            .addresses()
            .iter()
            .map(|a| a.port())
            .collect();
        assert_eq!(ports, vec![9000]);
    }

    #[test]
    fn test_snapshot_lists_paths() {
        let lb = build(FallbackPolicy::NoFallback, &[]);
        let snapshot = lb.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].path, md("version", "v1"));
        assert_eq!(snapshot[0].hosts, Some(vec!["127.0.0.1:9000".parse().unwrap()]));
    }
}
