use super::handlers::{handle_delete, handle_health, handle_list_files, handle_read, handle_write};
use super::protocol::{
    ENDPOINT_DELETE, ENDPOINT_HEALTH, ENDPOINT_LIST_FILES, ENDPOINT_READ, ENDPOINT_WRITE,
};
use super::store::LocalStore;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Upper bound for a single request body. Base64 adds a third to each segment.
pub const MAX_REQUEST_BODY_BYTES: usize = 256 * 1024 * 1024;

pub fn router(store: Arc<LocalStore>) -> Router {
    Router::new()
        .route(ENDPOINT_WRITE, post(handle_write))
        .route(ENDPOINT_READ, post(handle_read))
        .route(ENDPOINT_LIST_FILES, get(handle_list_files))
        .route(ENDPOINT_DELETE, post(handle_delete))
        .route(ENDPOINT_HEALTH, get(handle_health))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(Extension(store))
}

/// Serves the node protocol on an already bound listener until the server stops.
pub async fn serve(listener: TcpListener, store: Arc<LocalStore>) -> Result<()> {
    axum::serve(listener, router(store)).await?;
    Ok(())
}

/// Binds `addr` (`host:port`, resolved if needed) and serves `base_dir`.
pub async fn start_storage_node(addr: &str, base_dir: PathBuf) -> Result<()> {
    let store = Arc::new(LocalStore::open(&base_dir).await?);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        "Storage node listening on {} (base directory {})",
        listener.local_addr()?,
        base_dir.display()
    );

    serve(listener, store).await
}
