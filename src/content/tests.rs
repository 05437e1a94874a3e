//! Content Service Tests
//!
//! Both implementations are driven through `Arc<dyn ContentService>` so callers can
//! switch between a local directory and the cluster without code changes.

#[cfg(test)]
mod tests {
    use crate::config::{ConnectionString, CoordinatorConfig};
    use crate::content::{ContentService, FsContentService};
    use crate::coordinator::Coordinator;
    use crate::storage::server::serve;
    use crate::storage::store::LocalStore;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::net::TcpListener;

    async fn exercise(service: Arc<dyn ContentService>) {
        service
            .write("v1", "manifest.mpd", b"<MPD/>".to_vec())
            .await
            .unwrap();
        service.write("v1", "seg_0.m4s", Vec::new()).await.unwrap();
        service
            .write("v1", "manifest.mpd", b"<MPD v2/>".to_vec())
            .await
            .unwrap();

        assert_eq!(
            service.read("v1", "manifest.mpd").await.unwrap(),
            b"<MPD v2/>"
        );
        assert!(service.read("v1", "seg_0.m4s").await.unwrap().is_empty());
        assert!(service.read("v1", "missing.m4s").await.unwrap_err().is_not_found());
        assert!(service.write("v1", "a/b", vec![1]).await.is_err());
    }

    #[tokio::test]
    async fn test_filesystem_content_service() {
        let dir = TempDir::new().unwrap();
        let service = FsContentService::new(dir.path());

        exercise(Arc::new(service)).await;
        assert!(dir.path().join("v1").join("manifest.mpd").is_file());
    }

    #[tokio::test]
    async fn test_coordinator_content_service() {
        let mut dirs = Vec::new();
        let mut nodes = Vec::new();
        for _ in 0..2 {
            let dir = TempDir::new().unwrap();
            let store = Arc::new(LocalStore::open(dir.path()).await.unwrap());
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            nodes.push(listener.local_addr().unwrap().to_string());
            tokio::spawn(async move {
                let _ = serve(listener, store).await;
            });
            dirs.push(dir);
        }

        let conn = ConnectionString::parse(&format!("127.0.0.1:0,{}", nodes.join(","))).unwrap();
        let coordinator = Coordinator::from_connection_string(&conn, CoordinatorConfig::default());

        exercise(Arc::new(coordinator)).await;
    }
}
