//! Subset load balancer daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!     cluster.toml ──▶ config::loader ──▶ ClusterConfig
//!                                              │
//!                                              ▼
//!                           ┌──────────────────────────────────────┐
//!                           │              Cluster                 │
//!                           │  HostSet + ClusterInfo               │
//!                           │      → SubsetLoadBalancerBuilder     │
//!                           │      → ArcSwap<SubsetLoadBalancer>   │
//!                           └──────────────────────────────────────┘
//!                                   ▲                   │
//!     config::watcher ──reload──────┘                   ▼
//!                                         request path: select_balancer
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use subset_lb::config::{load_config, watcher::ConfigWatcher};
use subset_lb::observability::{logging, metrics};
use subset_lb::Cluster;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("cluster.toml"));

    let config = load_config(&path)?;
    logging::init_logging(&config.observability)?;

    tracing::info!(
        path = ?path,
        cluster = %config.name,
        hosts = config.hosts.len(),
        key_groups = config.subset.keys.len(),
        fallback = config.subset.fallback_policy.as_str(),
        "subset-lb v0.1.0 starting"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let cluster = Cluster::from_config(&config)?;
    tracing::info!(subsets_created = cluster.load().subset_count(), "Cluster ready");

    let (watcher, mut updates) = ConfigWatcher::new(&path);
    let _watch_handle = watcher.run()?;

    loop {
        tokio::select! {
            Some(next) = updates.recv() => {
                let current = cluster.info();
                if next.name != current.name() {
                    tracing::warn!(from = %current.name(), to = %next.name, "Cluster name changed on reload");
                }
                match cluster.apply_config(&next) {
                    Ok(()) => tracing::info!(
                        cluster = %next.name,
                        subsets_created = cluster.load().subset_count(),
                        "Configuration reloaded"
                    ),
                    Err(e) => tracing::error!(error = %e, "Rejected reloaded configuration"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
