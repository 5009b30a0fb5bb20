use std::path::PathBuf;

use clap::{Parser, Subcommand};
use subset_lb::config::load_config;
use subset_lb::subset::{MetadataPair, SubsetSelection};
use subset_lb::Cluster;

#[derive(Parser)]
#[command(name = "subset-cli")]
#[command(about = "Inspect the subset load balancer built from a cluster config", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "cluster.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every subset path and its hosts
    Tree {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve request metadata (key=value, in key group order)
    Select {
        metadata: Vec<MetadataPair>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let cluster = Cluster::from_config(&config)?;
    let lb = cluster.load();

    match cli.command {
        Commands::Tree { json } => {
            let snapshot = lb.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                println!(
                    "cluster {} ({} hosts, {} subsets created)",
                    config.name,
                    lb.host_set().len(),
                    lb.subset_count()
                );
                for subset in snapshot {
                    let path: Vec<_> = subset.path.iter().map(ToString::to_string).collect();
                    match subset.hosts {
                        Some(hosts) => println!("  {} -> {:?}", path.join(","), hosts),
                        None => println!("  {} -> (empty)", path.join(",")),
                    }
                }
            }
        }
        Commands::Select { metadata } => {
            let selection = lb.select_balancer(&metadata);
            let kind = match &selection {
                SubsetSelection::Subset(_) => "subset",
                SubsetSelection::Fallback(_) => "fallback",
                SubsetSelection::NoBalancer => "none",
            };
            match selection.balancer() {
                Some(balancer) => {
                    println!("{kind}: {:?}", balancer.host_set().addresses());
                    match balancer.choose_host() {
                        Some(host) => println!("chosen: {}", host.addr()),
                        None => println!("chosen: no healthy host"),
                    }
                }
                None => println!("{kind}: no balancer available"),
            }
        }
    }
    Ok(())
}
