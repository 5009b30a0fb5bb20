//! Compact set of host ordinals.
//!
//! Ordinals are kept as a sorted, deduplicated `Vec<u32>`. Index construction
//! visits hosts in ascending order, so inserts are almost always appends, and
//! intersection is a single linear merge.

/// Sorted set of host positions within one `HostSet`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostOrdinalSet {
    ordinals: Vec<u32>,
}

impl HostOrdinalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an ordinal. Returns `false` if it was already present.
    pub fn insert(&mut self, ordinal: u32) -> bool {
        match self.ordinals.last() {
            None => {
                self.ordinals.push(ordinal);
                true
            }
            Some(&last) if ordinal > last => {
                self.ordinals.push(ordinal);
                true
            }
            _ => match self.ordinals.binary_search(&ordinal) {
                Ok(_) => false,
                Err(pos) => {
                    self.ordinals.insert(pos, ordinal);
                    true
                }
            },
        }
    }

    pub fn contains(&self, ordinal: u32) -> bool {
        self.ordinals.binary_search(&ordinal).is_ok()
    }

    /// Keep only the ordinals also present in `other`.
    pub fn intersect_with(&mut self, other: &HostOrdinalSet) {
        let mut cursor = 0;
        let theirs = &other.ordinals;
        self.ordinals.retain(|ordinal| {
            while cursor < theirs.len() && theirs[cursor] < *ordinal {
                cursor += 1;
            }
            cursor < theirs.len() && theirs[cursor] == *ordinal
        });
    }

    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }

    /// Ordinals in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.ordinals.iter().map(|&ordinal| ordinal as usize)
    }
}

impl FromIterator<u32> for HostOrdinalSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = HostOrdinalSet::new();
        for ordinal in iter {
            set.insert(ordinal);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order() {
        let mut set = HostOrdinalSet::new();
        assert!(set.insert(4));
        assert!(set.insert(1));
        assert!(set.insert(9));
        assert!(!set.insert(4));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 4, 9]);
        assert!(set.contains(9));
        assert!(!set.contains(2));
    }

    #[test]
    fn test_intersection() {
        let mut a: HostOrdinalSet = [0, 2, 3, 5, 8].into_iter().collect();
        let b: HostOrdinalSet = [1, 2, 5, 8, 13].into_iter().collect();
        a.intersect_with(&b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![2, 5, 8]);

        let disjoint: HostOrdinalSet = [100].into_iter().collect();
        a.intersect_with(&disjoint);
        assert!(a.is_empty());
    }

    #[test]
    fn test_intersection_with_empty() {
        let mut a: HostOrdinalSet = [0, 1].into_iter().collect();
        a.intersect_with(&HostOrdinalSet::new());
        assert_eq!(a.len(), 0);
    }
}
