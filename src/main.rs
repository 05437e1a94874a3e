//! Content coordinator: routes content to storage nodes and serves the admin API.

use clap::Parser;
use content_cluster::config::{ConnectionString, CoordinatorConfig};
use content_cluster::coordinator::Coordinator;
use content_cluster::coordinator::server::start_admin_server;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "content-coordinator", version, about)]
struct Args {
    /// `adminAddress,node1,node2,...`, e.g. `localhost:8081,localhost:8090,localhost:8091`
    connection: ConnectionString,

    /// Deadline for each call to a storage node, in seconds.
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,

    /// Object moves allowed in flight while rebalancing.
    #[arg(long, default_value_t = content_cluster::config::DEFAULT_MIGRATION_CONCURRENCY)]
    migration_concurrency: usize,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = CoordinatorConfig {
        request_timeout: Duration::from_secs(args.timeout_secs),
        migration_concurrency: args.migration_concurrency,
    };

    tracing::info!(
        "Starting coordinator with {} storage node(s): {}",
        args.connection.storage_nodes.len(),
        args.connection.storage_nodes.join(", ")
    );

    let coordinator = Arc::new(Coordinator::from_connection_string(&args.connection, config));

    tracing::info!("Ring order: {:?}", coordinator.list_nodes().await);
    tracing::info!("Press Ctrl+C to shutdown");

    start_admin_server(&args.connection.admin_addr, coordinator).await
}
