use super::migration::MigrationReport;
use super::protocol::{AddNodeRequest, ListNodesResponse, MembershipChangeResponse, RemoveNodeRequest};
use super::service::Coordinator;
use crate::error::{ClusterError, Result};

use axum::{Extension, Json, http::StatusCode};
use std::sync::Arc;

fn respond(result: Result<MigrationReport>) -> (StatusCode, Json<MembershipChangeResponse>) {
    match result {
        Ok(report) => (
            StatusCode::OK,
            Json(MembershipChangeResponse {
                migrated_file_count: report.migrated_count(),
                skipped_file_count: report.skipped_count(),
                error: None,
            }),
        ),
        Err(e) => {
            let status = match e {
                ClusterError::Config(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, Json(MembershipChangeResponse::refused(e)))
        }
    }
}

pub async fn handle_list_nodes(
    Extension(coordinator): Extension<Arc<Coordinator>>,
) -> (StatusCode, Json<ListNodesResponse>) {
    let nodes = coordinator.list_nodes().await;
    (StatusCode::OK, Json(ListNodesResponse { nodes }))
}

pub async fn handle_add_node(
    Extension(coordinator): Extension<Arc<Coordinator>>,
    Json(req): Json<AddNodeRequest>,
) -> (StatusCode, Json<MembershipChangeResponse>) {
    tracing::info!("Admin: add node {}", req.node_address);
    let result = coordinator.add_node(&req.node_address).await;
    if let Err(e) = &result {
        tracing::error!("Failed to add node {}: {}", req.node_address, e);
    }
    respond(result)
}

pub async fn handle_remove_node(
    Extension(coordinator): Extension<Arc<Coordinator>>,
    Json(req): Json<RemoveNodeRequest>,
) -> (StatusCode, Json<MembershipChangeResponse>) {
    tracing::info!("Admin: remove node {}", req.node_address);
    let result = coordinator.remove_node(&req.node_address).await;
    if let Err(e) = &result {
        tracing::error!("Failed to remove node {}: {}", req.node_address, e);
    }
    respond(result)
}
