//! Cluster publication.
//!
//! # Data Flow
//! ```text
//! Host update / config reload
//!     → manager.rs (serialize writers, build a fresh SubsetLoadBalancer)
//!     → atomic swap of Arc<SubsetLoadBalancer>
//!     → request path loads the current Arc, lock-free
//! ```
//!
//! # Design Decisions
//! - Readers see the previous or the next structure, never a partial one
//! - Nothing inside a published structure changes; every update rebuilds

pub mod manager;

pub use manager::Cluster;
