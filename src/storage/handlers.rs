use super::protocol::{
    DeleteRequest, DeleteResponse, HealthResponse, ListFilesResponse, ReadRequest, ReadResponse,
    WriteRequest, WriteResponse,
};
use super::store::LocalStore;
use super::types::ObjectKey;
use crate::error::ClusterError;

use axum::{Extension, Json, http::StatusCode};
use std::sync::Arc;

fn status_for(err: &ClusterError) -> StatusCode {
    match err {
        ClusterError::NotFound { .. } => StatusCode::NOT_FOUND,
        ClusterError::InvalidKey(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn handle_write(
    Extension(store): Extension<Arc<LocalStore>>,
    Json(req): Json<WriteRequest>,
) -> (StatusCode, Json<WriteResponse>) {
    let key = match ObjectKey::new(req.video_id, req.filename) {
        Ok(key) => key,
        Err(e) => {
            tracing::warn!("Rejected write: {}", e);
            return (StatusCode::BAD_REQUEST, Json(WriteResponse::failed(e)));
        }
    };

    match store.write(&key, &req.data).await {
        Ok(()) => (StatusCode::OK, Json(WriteResponse::ok())),
        Err(e) => {
            tracing::error!("Failed to write {}: {}", key, e);
            (status_for(&e), Json(WriteResponse::failed(e)))
        }
    }
}

pub async fn handle_read(
    Extension(store): Extension<Arc<LocalStore>>,
    Json(req): Json<ReadRequest>,
) -> (StatusCode, Json<ReadResponse>) {
    let key = match ObjectKey::new(req.video_id, req.filename) {
        Ok(key) => key,
        Err(e) => {
            tracing::warn!("Rejected read: {}", e);
            return (StatusCode::BAD_REQUEST, Json(ReadResponse::failed(e)));
        }
    };

    match store.read(&key).await {
        Ok(data) => (StatusCode::OK, Json(ReadResponse { data, error: None })),
        Err(e) => {
            if e.is_not_found() {
                tracing::debug!("Read miss for {}", key);
            } else {
                tracing::error!("Failed to read {}: {}", key, e);
            }
            (status_for(&e), Json(ReadResponse::failed(e)))
        }
    }
}

pub async fn handle_list_files(
    Extension(store): Extension<Arc<LocalStore>>,
) -> (StatusCode, Json<ListFilesResponse>) {
    match store.list_files().await {
        Ok(keys) => {
            tracing::debug!("Listing {} objects", keys.len());
            (
                StatusCode::OK,
                Json(ListFilesResponse {
                    keys: keys.iter().map(ToString::to_string).collect(),
                    error: None,
                }),
            )
        }
        Err(e) => {
            tracing::error!("Failed to list objects: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ListFilesResponse {
                    keys: Vec::new(),
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

pub async fn handle_delete(
    Extension(store): Extension<Arc<LocalStore>>,
    Json(req): Json<DeleteRequest>,
) -> (StatusCode, Json<DeleteResponse>) {
    let key = match ObjectKey::new(req.video_id, req.filename) {
        Ok(key) => key,
        Err(e) => {
            tracing::warn!("Rejected delete: {}", e);
            return (StatusCode::BAD_REQUEST, Json(DeleteResponse::failed(e)));
        }
    };

    match store.delete(&key).await {
        Ok(()) => (StatusCode::OK, Json(DeleteResponse::ok())),
        Err(e) => {
            tracing::warn!("Failed to delete {}: {}", key, e);
            (status_for(&e), Json(DeleteResponse::failed(e)))
        }
    }
}

pub async fn handle_health(
    Extension(store): Extension<Arc<LocalStore>>,
) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            base_dir: store.base_dir().display().to_string(),
        }),
    )
}
