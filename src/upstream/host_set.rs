//! Ordered host snapshots.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::HostConfig;
use crate::upstream::host::Host;

/// Error raised while materializing hosts from configuration.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("invalid host address `{address}`: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// An ordered, point-in-time collection of hosts.
///
/// A host's ordinal is its position in this sequence. Cloning shares the
/// underlying hosts, so connection and health counters stay consistent
/// between the full set and every subset carved out of it.
#[derive(Debug, Clone, Default)]
pub struct HostSet {
    hosts: Vec<Arc<Host>>,
}

impl HostSet {
    pub fn new(hosts: Vec<Arc<Host>>) -> Self {
        Self { hosts }
    }

    /// Build a host set from configuration entries, preserving their order.
    pub fn from_config(configs: &[HostConfig]) -> Result<Self, HostError> {
        configs
            .iter()
            .map(|config| -> Result<Arc<Host>, HostError> {
                let addr = config
                    .address
                    .parse()
                    .map_err(|source| HostError::InvalidAddress {
                        address: config.address.clone(),
                        source,
                    })?;
                let metadata = config
                    .metadata
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                Ok(Arc::new(
                    Host::new(addr, metadata)
                        .with_weight(config.weight)
                        .with_max_connections(config.max_connections),
                ))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    pub fn hosts(&self) -> &[Arc<Host>] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn addresses(&self) -> Vec<SocketAddr> {
        self.hosts.iter().map(|h| h.addr()).collect()
    }
}

impl FromIterator<Arc<Host>> for HostSet {
    fn from_iter<I: IntoIterator<Item = Arc<Host>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
