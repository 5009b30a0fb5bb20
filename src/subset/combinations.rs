//! Enumeration of observed metadata combinations.

use crate::subset::index::MetadataIndex;
use crate::subset::metadata::{MetadataPair, SubsetMetadata};

/// Every combination of observed values for `keys`, in key order.
///
/// For keys `[k1, k2]` with observed values `{a, b}` and `{x}` this yields
/// `[(k1,a),(k2,x)]` and `[(k1,b),(k2,x)]`. Only values present in the index
/// are used, so a key with no observed values yields no combinations.
pub fn metadata_combinations(index: &MetadataIndex, keys: &[String]) -> Vec<SubsetMetadata> {
    let mut combinations = Vec::new();
    if keys.is_empty() {
        return combinations;
    }
    let mut prefix = Vec::with_capacity(keys.len());
    expand(index, keys, &mut prefix, &mut combinations);
    combinations
}

fn expand(
    index: &MetadataIndex,
    keys: &[String],
    prefix: &mut SubsetMetadata,
    out: &mut Vec<SubsetMetadata>,
) {
    let Some((key, rest)) = keys.split_first() else {
        return;
    };
    let Some(values) = index.values(key) else {
        return;
    };
    for value in values.keys() {
        prefix.push(MetadataPair::new(key.clone(), value.clone()));
        if rest.is_empty() {
            out.push(prefix.clone());
        } else {
            expand(index, rest, prefix, out);
        }
        prefix.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::host::Host;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn hosts(rows: &[&[(&str, &str)]]) -> Vec<Arc<Host>> {
        rows.iter()
            .zip(9000u16..)
            .map(|(md, port)| {
                let metadata: HashMap<String, String> =
                    md.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
                Arc::new(Host::new(format!("127.0.0.1:{port}").parse().unwrap(), metadata))
            })
            .collect()
    }

    fn keys(ks: &[&str]) -> Vec<String> {
        ks.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_full_product_of_observed_values() {
        let hosts = hosts(&[
            &[("k1", "v1"), ("k2", "v3"), ("k3", "v4")],
            &[("k1", "v2"), ("k2", "v3"), ("k3", "v5")],
        ]);
        let index = MetadataIndex::build(&hosts, ["k1", "k2", "k3"]);
        let combos = metadata_combinations(&index, &keys(&["k1", "k2", "k3"]));

        // 2 * 1 * 2, including pairings no single host carries.
        assert_eq!(combos.len(), 4);
        assert!(combos.contains(&vec![
            MetadataPair::new("k1", "v1"),
            MetadataPair::new("k2", "v3"),
            MetadataPair::new("k3", "v5"),
        ]));
        for combo in &combos {
            let order: Vec<_> = combo.iter().map(|p| p.key.as_str()).collect();
            assert_eq!(order, vec!["k1", "k2", "k3"]);
        }
    }

    #[test]
    fn test_key_without_values_yields_nothing() {
        let hosts = hosts(&[&[("k1", "v1")]]);
        let index = MetadataIndex::build(&hosts, ["k1", "k2"]);
        assert!(metadata_combinations(&index, &keys(&["k1", "k2"])).is_empty());
        assert!(metadata_combinations(&index, &keys(&["unindexed"])).is_empty());
        assert!(metadata_combinations(&index, &[]).is_empty());
    }
}
