//! Metadata subset load balancing.
//!
//! # Data Flow
//! ```text
//! HostSet + ClusterInfo (subset keys, default subset, fallback policy)
//!     → index.rs (key → value → host ordinals)
//!     → filter.rs (AND of constraints via set intersection)
//!     → combinations.rs (observed value combinations per key group)
//!     → entry.rs (key → value → entry tree, one level per pair)
//!     → builder.rs (attach a balancer to every non-empty combination)
//!     → balancer.rs (SubsetLoadBalancer: lookup + fallback)
//! ```
//!
//! # Design Decisions
//! - A build never touches a previous build's index or tree
//! - Every configured path is materialized, populated or not
//! - Lookup key order must match the key group order; no canonicalization
//! - Balancer construction goes through a pluggable factory

pub mod balancer;
pub mod builder;
pub mod combinations;
pub mod entry;
pub mod filter;
pub mod index;
pub mod metadata;
pub mod ordinal_set;

pub use balancer::{SubsetLoadBalancer, SubsetSelection, SubsetSnapshot};
pub use builder::{build_subset_load_balancer, SubsetBuildMode, SubsetLoadBalancerBuilder};
pub use entry::{SubsetEntry, SubsetMap, ValueSubsetMap};
pub use metadata::{MetadataPair, SubsetKeyGroup, SubsetMetadata};
