use super::handlers::{handle_add_node, handle_list_nodes, handle_remove_node};
use super::protocol::{ENDPOINT_ADD_NODE, ENDPOINT_LIST_NODES, ENDPOINT_REMOVE_NODE};
use super::service::Coordinator;

use anyhow::Result;
use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

pub fn admin_router(coordinator: Arc<Coordinator>) -> Router {
    Router::new()
        .route(ENDPOINT_LIST_NODES, get(handle_list_nodes))
        .route(ENDPOINT_ADD_NODE, post(handle_add_node))
        .route(ENDPOINT_REMOVE_NODE, post(handle_remove_node))
        .layer(Extension(coordinator))
}

pub async fn serve_admin(listener: TcpListener, coordinator: Arc<Coordinator>) -> Result<()> {
    tracing::info!("Admin API listening on {}", listener.local_addr()?);
    axum::serve(listener, admin_router(coordinator)).await?;
    Ok(())
}

/// Binds the admin address from the connection string and serves until stopped.
pub async fn start_admin_server(addr: &str, coordinator: Arc<Coordinator>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_admin(listener, coordinator).await
}
