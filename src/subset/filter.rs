//! Host filtering by ordered metadata constraints.

use crate::subset::index::MetadataIndex;
use crate::subset::metadata::MetadataPair;
use crate::subset::ordinal_set::HostOrdinalSet;
use crate::upstream::host_set::HostSet;

/// Intersects index sets to find the hosts matching every constraint.
#[derive(Debug, Clone, Copy)]
pub struct HostFilter<'a> {
    hosts: &'a HostSet,
    index: &'a MetadataIndex,
}

impl<'a> HostFilter<'a> {
    pub fn new(hosts: &'a HostSet, index: &'a MetadataIndex) -> Self {
        Self { hosts, index }
    }

    /// Hosts whose metadata carries every `(key, value)` in `kvs`.
    ///
    /// An empty constraint list selects all hosts. An unknown key or value
    /// short-circuits to an empty set. The result keeps host set order.
    pub fn filter(&self, kvs: &[MetadataPair]) -> HostSet {
        if kvs.is_empty() {
            return self.hosts.clone();
        }

        let mut matched: Option<HostOrdinalSet> = None;
        for pair in kvs {
            let Some(set) = self.index.lookup(&pair.key, &pair.value) else {
                return HostSet::default();
            };
            match matched.as_mut() {
                None => matched = Some(set.clone()),
                Some(acc) => acc.intersect_with(set),
            }
        }

        match matched {
            Some(set) => self.select(&set),
            None => HostSet::default(),
        }
    }

    fn select(&self, set: &HostOrdinalSet) -> HostSet {
        let hosts = self.hosts.hosts();
        set.iter().filter_map(|ordinal| hosts.get(ordinal).cloned()).collect()
    }
}

/// Linear scan equivalent of [`HostFilter::filter`], used by the filter build mode.
pub fn scan_hosts(hosts: &HostSet, kvs: &[MetadataPair]) -> HostSet {
    hosts
        .hosts()
        .iter()
        .filter(|host| {
            kvs.iter()
                .all(|pair| host.metadata_value(&pair.key) == Some(pair.value.as_str()))
        })
        .cloned()
        .collect()
}
