//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Subset builds and selections produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (gauges, counters, histograms via `metrics`)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (cluster, policy, counts) rather than formatted strings
//! - Metrics are cheap; recording without an installed exporter is a no-op

pub mod logging;
pub mod metrics;
