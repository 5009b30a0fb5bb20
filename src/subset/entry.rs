//! Subset tree nodes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::subset::metadata::MetadataPair;
use crate::upstream::{host_set::HostSet, LoadBalancer};

/// key → value → entry, one level of the subset tree.
pub type SubsetMap = HashMap<String, ValueSubsetMap>;

/// value → entry under one key.
pub type ValueSubsetMap = HashMap<String, SubsetEntry>;

/// A node in the subset tree.
///
/// An entry exists for every configured path. It only carries a balancer
/// when at least one host matched that exact path during the build.
#[derive(Debug, Default)]
pub struct SubsetEntry {
    lb: Option<Arc<dyn LoadBalancer>>,
    children: SubsetMap,
}

impl SubsetEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balancer(lb: Arc<dyn LoadBalancer>) -> Self {
        Self {
            lb: Some(lb),
            children: SubsetMap::new(),
        }
    }

    /// Whether a balancer is attached.
    pub fn is_initialized(&self) -> bool {
        self.lb.is_some()
    }

    pub fn balancer(&self) -> Option<&Arc<dyn LoadBalancer>> {
        self.lb.as_ref()
    }

    pub fn host_set(&self) -> Option<&HostSet> {
        self.lb.as_ref().map(|lb| lb.host_set())
    }

    pub fn children(&self) -> &SubsetMap {
        &self.children
    }

    pub(crate) fn set_balancer(&mut self, lb: Arc<dyn LoadBalancer>) {
        self.lb = Some(lb);
    }
}

/// Walk `kvs` through the tree, creating missing levels, and return the
/// entry at the final pair. Returns `None` only for an empty path.
pub(crate) fn find_or_create_subset<'a>(
    subsets: &'a mut SubsetMap,
    kvs: &[MetadataPair],
) -> Option<&'a mut SubsetEntry> {
    let (pair, rest) = kvs.split_first()?;
    let entry = subsets
        .entry(pair.key.clone())
        .or_default()
        .entry(pair.value.clone())
        .or_default();
    if rest.is_empty() {
        Some(entry)
    } else {
        find_or_create_subset(&mut entry.children, rest)
    }
}

/// Walk `kvs` through the tree without modifying it.
pub(crate) fn find_subset<'a>(subsets: &'a SubsetMap, kvs: &[MetadataPair]) -> Option<&'a SubsetEntry> {
    let (pair, rest) = kvs.split_first()?;
    let entry = subsets.get(&pair.key)?.get(&pair.value)?;
    if rest.is_empty() {
        Some(entry)
    } else {
        find_subset(&entry.children, rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::round_robin::RoundRobin;

    fn path(pairs: &[(&str, &str)]) -> Vec<MetadataPair> {
        pairs.iter().map(|(k, v)| MetadataPair::new(*k, *v)).collect()
    }

    #[test]
    fn test_find_or_create_materializes_path() {
        let mut tree = SubsetMap::new();
        let leaf = find_or_create_subset(&mut tree, &path(&[("version", "v1"), ("region", "a")])).unwrap();
        assert!(!leaf.is_initialized());

        let parent = find_subset(&tree, &path(&[("version", "v1")])).unwrap();
        assert!(!parent.is_initialized());
        assert!(parent.children()["region"].contains_key("a"));
        assert!(find_subset(&tree, &path(&[("version", "v1"), ("region", "a")])).is_some());
    }

    #[test]
    fn test_find_or_create_reuses_entries() {
        let mut tree = SubsetMap::new();
        find_or_create_subset(&mut tree, &path(&[("version", "v1")]))
            .unwrap()
            .set_balancer(Arc::new(RoundRobin::new(HostSet::default())));
        find_or_create_subset(&mut tree, &path(&[("version", "v1"), ("region", "b")])).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree["version"].len(), 1);
        let v1 = find_subset(&tree, &path(&[("version", "v1")])).unwrap();
        assert!(v1.is_initialized(), "extending a path keeps the existing balancer");
        assert!(v1.children().contains_key("region"));
    }

    #[test]
    fn test_lookup_order_is_significant() {
        let mut tree = SubsetMap::new();
        find_or_create_subset(&mut tree, &path(&[("version", "v1"), ("region", "a")])).unwrap();

        assert!(find_subset(&tree, &path(&[("region", "a"), ("version", "v1")])).is_none());
        assert!(find_subset(&tree, &[]).is_none());
        assert!(find_or_create_subset(&mut tree, &[]).is_none());
    }
}
