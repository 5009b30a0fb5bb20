//! Metadata vocabulary shared by configuration, indexing and lookup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One `(key, value)` constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct MetadataPair {
    pub key: String,
    pub value: String,
}

impl MetadataPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for MetadataPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Error returned when a `key=value` string cannot be split.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected `key=value`, got `{0}`")]
pub struct ParseMetadataError(String);

impl FromStr for MetadataPair {
    type Err = ParseMetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok(Self::new(key, value)),
            _ => Err(ParseMetadataError(s.to_string())),
        }
    }
}

/// An ordered list of constraints identifying one point in subset space.
///
/// Order is significant: lookups walk the subset tree pair by pair, so a
/// request must present keys in the same order as the key group that built
/// the path.
pub type SubsetMetadata = Vec<MetadataPair>;

/// Ordered, distinct metadata keys defining one subsetting dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SubsetKeyGroup {
    keys: Vec<String>,
}

impl SubsetKeyGroup {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Display for SubsetKeyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.keys.join(", "))
    }
}
