//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject malformed key groups before any subset build runs
//! - Check host addresses parse and are unique
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClusterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::ClusterConfig;
use crate::upstream::FallbackPolicy;

/// A single semantic problem in a cluster configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("cluster name must not be empty")]
    EmptyClusterName,
    #[error("subset key group {group} is empty")]
    EmptyKeyGroup { group: usize },
    #[error("subset key group {group} contains an empty key")]
    EmptyKey { group: usize },
    #[error("subset key group {group} repeats key `{key}`")]
    DuplicateKey { group: usize, key: String },
    #[error("default subset repeats key `{key}`")]
    DuplicateDefaultKey { key: String },
    #[error("fallback policy `default_subset` requires a non-empty default_subset")]
    MissingDefaultSubset,
    #[error("host {index} has invalid address `{address}`")]
    InvalidHostAddress { index: usize, address: String },
    #[error("host address `{address}` is listed more than once")]
    DuplicateHostAddress { address: String },
    #[error("invalid metrics address `{address}`")]
    InvalidMetricsAddress { address: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClusterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.name.trim().is_empty() {
        errors.push(ValidationError::EmptyClusterName);
    }

    for (group, keys) in config.subset.keys.iter().enumerate() {
        if keys.is_empty() {
            errors.push(ValidationError::EmptyKeyGroup { group });
            continue;
        }
        let mut seen = HashSet::new();
        for key in keys {
            if key.is_empty() {
                errors.push(ValidationError::EmptyKey { group });
            } else if !seen.insert(key.as_str()) {
                errors.push(ValidationError::DuplicateKey {
                    group,
                    key: key.clone(),
                });
            }
        }
    }

    let mut default_keys = HashSet::new();
    for pair in &config.subset.default_subset {
        if !default_keys.insert(pair.key.as_str()) {
            errors.push(ValidationError::DuplicateDefaultKey {
                key: pair.key.clone(),
            });
        }
    }
    if config.subset.fallback_policy == FallbackPolicy::DefaultSubset
        && config.subset.default_subset.is_empty()
    {
        errors.push(ValidationError::MissingDefaultSubset);
    }

    let mut addresses = HashSet::new();
    for (index, host) in config.hosts.iter().enumerate() {
        match host.address.parse::<SocketAddr>() {
            Ok(addr) => {
                if !addresses.insert(addr) {
                    errors.push(ValidationError::DuplicateHostAddress {
                        address: host.address.clone(),
                    });
                }
            }
            Err(_) => errors.push(ValidationError::InvalidHostAddress {
                index,
                address: host.address.clone(),
            }),
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress {
            address: observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
