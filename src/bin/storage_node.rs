//! Storage node: serves one directory of video objects to the coordinator.

use clap::Parser;
use content_cluster::storage::server::start_storage_node;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "storage-node", version, about)]
struct Args {
    /// Directory holding `videoId/filename` objects. Created if missing.
    base_dir: PathBuf,

    #[arg(long, default_value = "localhost")]
    host: String,

    #[arg(long, default_value_t = 8090)]
    port: u16,

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

    let addr = format!("{}:{}", args.host, args.port);
    start_storage_node(&addr, args.base_dir).await
}
