//! Metadata index: key → value → host ordinals.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use crate::subset::metadata::{MetadataPair, SubsetKeyGroup};
use crate::subset::ordinal_set::HostOrdinalSet;
use crate::upstream::host::Host;

/// Observed values per key, each mapped to the hosts carrying it.
///
/// Built once per construction pass and never mutated afterwards. Every
/// indexed key is present, even when no host carries it.
#[derive(Debug, Default)]
pub struct MetadataIndex {
    keys: HashMap<String, BTreeMap<String, HostOrdinalSet>>,
}

impl MetadataIndex {
    pub fn build<I, S>(hosts: &[Arc<Host>], keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = HashMap::new();
        for key in keys {
            let key = key.into();
            let mut values: BTreeMap<String, HostOrdinalSet> = BTreeMap::new();
            for (ordinal, host) in (0u32..).zip(hosts) {
                // A host without the key is simply not indexed under it.
                let Some(value) = host.metadata_value(&key) else {
                    continue;
                };
                values.entry(value.to_string()).or_default().insert(ordinal);
            }
            index.insert(key, values);
        }
        Self { keys: index }
    }

    /// Values observed for `key`, in ascending order.
    pub fn values(&self, key: &str) -> Option<&BTreeMap<String, HostOrdinalSet>> {
        self.keys.get(key)
    }

    pub fn lookup(&self, key: &str, value: &str) -> Option<&HostOrdinalSet> {
        self.keys.get(key)?.get(value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}

/// Union of every key named by a key group or by the default subset.
pub fn merge_keys(subset_keys: &[SubsetKeyGroup], default_subset: &[MetadataPair]) -> BTreeSet<String> {
    subset_keys
        .iter()
        .flat_map(|group| group.keys().iter())
        .chain(default_subset.iter().map(|pair| &pair.key))
        .cloned()
        .collect()
}
