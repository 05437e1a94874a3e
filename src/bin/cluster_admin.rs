//! Operator tool for the coordinator's admin API.

use clap::{Parser, Subcommand};
use content_cluster::coordinator::admin_client::AdminClient;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "cluster-admin", version, about)]
struct Args {
    /// Admin address of the coordinator.
    #[arg(long, default_value = "localhost:8081")]
    server: String,

    /// Give up after this many seconds. Without it, add/remove wait for the whole migration.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the raw response as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List storage nodes in ring order.
    List,
    /// Add a storage node and rebalance onto it.
    Add { node_address: String },
    /// Drain a storage node and remove it.
    Remove { node_address: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut client = AdminClient::new(&args.server);
    if let Some(secs) = args.timeout_secs {
        client = client.with_timeout(Duration::from_secs(secs));
    }

    match args.command {
        Command::List => {
            let nodes = client.list_nodes().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&nodes)?);
            } else {
                for node in nodes {
                    println!("{}", node);
                }
            }
        }
        Command::Add { node_address } => {
            let response = client.add_node(&node_address).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!(
                    "Added {}: migrated {} file(s), skipped {}",
                    node_address, response.migrated_file_count, response.skipped_file_count
                );
            }
        }
        Command::Remove { node_address } => {
            let response = client.remove_node(&node_address).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!(
                    "Removed {}: migrated {} file(s), skipped {}",
                    node_address, response.migrated_file_count, response.skipped_file_count
                );
            }
        }
    }

    Ok(())
}
