//! Metrics collection and exposition.
//!
//! # Metrics
//! - `subset_lb_subsets_created` (gauge): subsets with a balancer after the last build
//! - `subset_lb_build_duration_seconds` (histogram): time spent building
//! - `subset_lb_rebuilds_total` (counter): rebuilds by trigger (hosts, config)
//! - `subset_lb_fallback_total` (counter): selections served by the fallback, by policy
//! - `subset_lb_no_balancer_total` (counter): selections with no balancer at all

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_subsets_created(cluster: &str, count: u64) {
    gauge!("subset_lb_subsets_created", "cluster" => cluster.to_string()).set(count as f64);
}

pub fn record_build_duration(cluster: &str, elapsed: Duration) {
    histogram!("subset_lb_build_duration_seconds", "cluster" => cluster.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_rebuild(cluster: &str, trigger: &'static str) {
    counter!("subset_lb_rebuilds_total", "cluster" => cluster.to_string(), "trigger" => trigger)
        .increment(1);
}

pub fn record_fallback(cluster: &str, policy: &'static str) {
    counter!("subset_lb_fallback_total", "cluster" => cluster.to_string(), "policy" => policy)
        .increment(1);
}

pub fn record_no_balancer(cluster: &str) {
    counter!("subset_lb_no_balancer_total", "cluster" => cluster.to_string()).increment(1);
}
