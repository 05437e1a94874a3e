use super::ContentService;
use crate::error::Result;
use crate::storage::store::LocalStore;
use crate::storage::types::ObjectKey;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Single-machine content service over a base directory.
///
/// Uses the same on-disk layout as a storage node, so a directory written here can
/// later be served by `storage-node` unchanged.
pub struct FsContentService {
    store: LocalStore,
}

impl FsContentService {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            store: LocalStore::new(base_dir),
        }
    }

    pub fn base_dir(&self) -> &Path {
        self.store.base_dir()
    }
}

#[async_trait]
impl ContentService for FsContentService {
    async fn write(&self, video_id: &str, filename: &str, data: Vec<u8>) -> Result<()> {
        let key = ObjectKey::new(video_id, filename)?;
        self.store.write(&key, &data).await
    }

    async fn read(&self, video_id: &str, filename: &str) -> Result<Vec<u8>> {
        let key = ObjectKey::new(video_id, filename)?;
        self.store.read(&key).await
    }
}
