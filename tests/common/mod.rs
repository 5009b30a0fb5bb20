//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use subset_lb::subset::{MetadataPair, SubsetKeyGroup, SubsetMetadata};
use subset_lb::upstream::{ClusterInfo, FallbackPolicy, Host, HostSet, LbSubsetInfo, LbType};

/// Host on 127.0.0.1 with the given metadata.
pub fn host(port: u16, metadata: &[(&str, &str)]) -> Arc<Host> {
    let metadata: HashMap<String, String> = metadata
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Arc::new(Host::new(addr(port), metadata))
}

pub fn addr(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

pub fn md(pairs: &[(&str, &str)]) -> SubsetMetadata {
    pairs.iter().map(|(k, v)| MetadataPair::new(*k, *v)).collect()
}

pub fn cluster_info(
    groups: &[&[&str]],
    fallback: FallbackPolicy,
    default_subset: &[(&str, &str)],
) -> ClusterInfo {
    ClusterInfo::new(
        "test-cluster",
        LbType::RoundRobin,
        LbSubsetInfo::new(
            groups
                .iter()
                .map(|g| SubsetKeyGroup::new(g.iter().copied()))
                .collect(),
            md(default_subset),
            fallback,
        ),
    )
}

/// h0{version=v1,region=a}, h1{version=v1,region=b}, h2{version=v2,region=a}
pub fn scenario_hosts() -> HostSet {
    HostSet::new(vec![
        host(9000, &[("version", "v1"), ("region", "a")]),
        host(9001, &[("version", "v1"), ("region", "b")]),
        host(9002, &[("version", "v2"), ("region", "a")]),
    ])
}

pub fn ports(hosts: &HostSet) -> Vec<u16> {
    hosts.addresses().iter().map(SocketAddr::port).collect()
}
