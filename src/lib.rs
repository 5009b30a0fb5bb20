//! Metadata subset load balancing for an upstream cluster.

pub mod cluster;
pub mod config;
pub mod observability;
pub mod subset;
pub mod upstream;

pub use cluster::Cluster;
pub use config::ClusterConfig;
pub use subset::{MetadataPair, SubsetLoadBalancer, SubsetSelection};
