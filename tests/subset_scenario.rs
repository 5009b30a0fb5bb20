//! End-to-end behaviour of subset construction and lookup.

use subset_lb::subset::{build_subset_load_balancer, SubsetBuildMode, SubsetLoadBalancer, SubsetSelection};
use subset_lb::upstream::{ClusterInfo, DefaultLoadBalancerFactory, FallbackPolicy, HostSet};

mod common;
use common::{cluster_info, host, md, ports, scenario_hosts};

fn build(info: &ClusterInfo, hosts: HostSet) -> SubsetLoadBalancer {
    build_subset_load_balancer(info, hosts, &DefaultLoadBalancerFactory, SubsetBuildMode::PreIndex)
}

fn selected_ports(selection: &SubsetSelection) -> Vec<u16> {
    ports(selection.balancer().expect("selection should carry a balancer").host_set())
}

#[test]
fn test_version_region_scenario() {
    let info = cluster_info(&[&["version"], &["version", "region"]], FallbackPolicy::AnyEndpoint, &[]);
    let lb = build(&info, scenario_hosts());

    assert_eq!(lb.subset_count(), 5);
    assert_eq!(info.stats().lb_subsets_created(), 5);

    let expected = [
        (md(&[("version", "v1")]), vec![9000, 9001]),
        (md(&[("version", "v2")]), vec![9002]),
        (md(&[("version", "v1"), ("region", "a")]), vec![9000]),
        (md(&[("version", "v1"), ("region", "b")]), vec![9001]),
        (md(&[("version", "v2"), ("region", "a")]), vec![9002]),
    ];
    for (path, hosts) in expected {
        let selection = lb.select_balancer(&path);
        assert!(matches!(selection, SubsetSelection::Subset(_)), "{path:?} should hit a subset");
        assert_eq!(selected_ports(&selection), hosts, "hosts for {path:?}");
    }

    // (version=v2, region=b) is materialized but empty, so it falls back.
    let empty = lb.select_balancer(&md(&[("version", "v2"), ("region", "b")]));
    assert!(empty.is_fallback());

    let unknown = lb.select_balancer(&md(&[("version", "v3")]));
    assert!(unknown.is_fallback());
    assert_eq!(selected_ports(&unknown), vec![9000, 9001, 9002]);
}

#[test]
fn test_every_configured_path_is_materialized() {
    let info = cluster_info(&[&["version", "region"]], FallbackPolicy::NoFallback, &[]);
    let lb = build(&info, scenario_hosts());

    // 2 versions x 2 regions at depth two, plus the two version entries above them.
    let snapshot = lb.snapshot();
    assert_eq!(snapshot.len(), 6);
    let empty: Vec<_> = snapshot.iter().filter(|s| s.hosts.is_none()).map(|s| s.path.clone()).collect();
    assert_eq!(
        empty,
        vec![
            md(&[("version", "v1")]),
            md(&[("version", "v2")]),
            md(&[("version", "v2"), ("region", "b")]),
        ]
    );
}

#[test]
fn test_combination_count_is_product_of_observed_values() {
    let hosts = HostSet::new(vec![
        host(9000, &[("a", "1"), ("b", "x"), ("c", "p")]),
        host(9001, &[("a", "2"), ("b", "y")]),
        host(9002, &[("a", "3"), ("c", "q")]),
    ]);
    let info = cluster_info(&[&["a", "b", "c"]], FallbackPolicy::NoFallback, &[]);
    let lb = build(&info, hosts);

    let leaves = lb.snapshot().into_iter().filter(|s| s.path.len() == 3).count();
    assert_eq!(leaves, 3 * 2 * 2);
    // Only h0 carries all three keys.
    assert_eq!(lb.subset_count(), 1);
}

#[test]
fn test_key_without_values_creates_no_subsets() {
    let info = cluster_info(&[&["version", "zone"]], FallbackPolicy::NoFallback, &[]);
    let lb = build(&info, scenario_hosts());

    assert_eq!(lb.subset_count(), 0);
    assert!(lb.subsets().is_empty());
}

#[test]
fn test_no_fallback_miss() {
    let info = cluster_info(&[&["version"]], FallbackPolicy::NoFallback, &[]);
    let lb = build(&info, scenario_hosts());

    assert!(lb.fallback_subset().is_none());
    assert!(matches!(lb.select_balancer(&md(&[("version", "v3")])), SubsetSelection::NoBalancer));
    assert!(lb.choose_host(&md(&[("region", "a")])).is_none());
    assert_eq!(info.stats().lb_subset_misses(), 2);
}

#[test]
fn test_default_subset_fallback() {
    let info = cluster_info(&[&["version"]], FallbackPolicy::DefaultSubset, &[("region", "a")]);
    let lb = build(&info, scenario_hosts());

    let selection = lb.select_balancer(&md(&[("version", "v3")]));
    assert!(selection.is_fallback());
    assert_eq!(selected_ports(&selection), vec![9000, 9002]);

    // Default subset keys are indexed even when no key group names them.
    assert_eq!(lb.subset_count(), 2);
}

#[test]
fn test_default_subset_without_hosts() {
    let info = cluster_info(&[&["version"]], FallbackPolicy::DefaultSubset, &[("region", "z")]);
    let lb = build(&info, scenario_hosts());

    let fallback = lb.fallback_subset().expect("fallback entry exists");
    assert!(!fallback.is_initialized());
    assert!(matches!(lb.select_balancer(&md(&[("version", "v3")])), SubsetSelection::NoBalancer));
}

#[test]
fn test_lookup_key_order_is_literal() {
    let info = cluster_info(&[&["version", "region"]], FallbackPolicy::NoFallback, &[]);
    let lb = build(&info, scenario_hosts());

    assert!(lb.choose_host(&md(&[("version", "v1"), ("region", "a")])).is_some());
    assert!(matches!(
        lb.select_balancer(&md(&[("region", "a"), ("version", "v1")])),
        SubsetSelection::NoBalancer
    ));
}

#[test]
fn test_rebuild_is_stable() {
    let info = cluster_info(&[&["version"], &["version", "region"], &["region"]], FallbackPolicy::AnyEndpoint, &[]);
    let hosts = scenario_hosts();

    let first = build(&info, hosts.clone());
    let second = build(&info, hosts);

    assert_eq!(first.snapshot(), second.snapshot());
    assert_eq!(first.subset_count(), second.subset_count());
}

#[test]
fn test_filter_mode_matches_pre_index() {
    let info = cluster_info(&[&["version"], &["region", "version"]], FallbackPolicy::DefaultSubset, &[("version", "v1")]);
    let indexed = build(&info, scenario_hosts());
    let scanned = build_subset_load_balancer(&info, scenario_hosts(), &DefaultLoadBalancerFactory, SubsetBuildMode::Filter);

    assert_eq!(indexed.snapshot(), scanned.snapshot());
    assert_eq!(indexed.subset_count(), scanned.subset_count());
}

#[test]
fn test_empty_host_set() {
    let info = cluster_info(&[&["version"]], FallbackPolicy::AnyEndpoint, &[]);
    let lb = build(&info, HostSet::default());

    assert_eq!(lb.subset_count(), 0);
    // AnyEndpoint always has a balancer, it just has nothing to pick.
    let selection = lb.select_balancer(&md(&[("version", "v1")]));
    assert!(selection.is_fallback());
    assert!(lb.choose_host(&md(&[("version", "v1")])).is_none());
}
