//! Local Object Store
//!
//! The on-disk half of a storage node. Objects live at `<base_dir>/<videoId>/<filename>`.
//!
//! Writes go to a hidden temporary file in the target directory and are renamed into
//! place, so a concurrent reader sees either the previous bytes or the new ones.

use super::types::ObjectKey;
use crate::error::{ClusterError, Result};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;

const STAGING_ATTEMPTS: u32 = 5;

pub struct LocalStore {
    base_dir: PathBuf,
}

impl LocalStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Creates the base directory if needed and returns a store rooted at it.
    pub async fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(base_dir);
        tokio::fs::create_dir_all(&store.base_dir).await?;
        Ok(store)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn object_path(&self, key: &ObjectKey) -> PathBuf {
        self.base_dir.join(key.video_id()).join(key.filename())
    }

    fn not_found(&self, key: &ObjectKey) -> ClusterError {
        ClusterError::NotFound {
            node: self.base_dir.display().to_string(),
            key: key.to_string(),
        }
    }

    pub async fn write(&self, key: &ObjectKey, data: &[u8]) -> Result<()> {
        let dir = self.base_dir.join(key.video_id());
        let staging = dir.join(format!(".{}.tmp", Uuid::new_v4()));

        if let Err(e) = self.stage_and_commit(key, &dir, &staging, data).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }

        tracing::debug!("Stored {} ({} bytes)", key, data.len());
        Ok(())
    }

    async fn stage_and_commit(
        &self,
        key: &ObjectKey,
        dir: &Path,
        staging: &Path,
        data: &[u8],
    ) -> std::io::Result<()> {
        // A concurrent delete of the video's last object removes the directory.
        let mut attempt = 1;
        loop {
            tokio::fs::create_dir_all(dir).await?;
            match tokio::fs::write(staging, data).await {
                Ok(()) => break,
                Err(e) if e.kind() == ErrorKind::NotFound && attempt < STAGING_ATTEMPTS => {
                    tracing::debug!("Directory for {} vanished, retrying", key);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tokio::fs::rename(staging, self.object_path(key)).await
    }

    pub async fn read(&self, key: &ObjectKey) -> Result<Vec<u8>> {
        match tokio::fs::read(self.object_path(key)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(self.not_found(key)),
            Err(e) => Err(e.into()),
        }
    }

    /// Every object under the base directory, sorted by key.
    pub async fn list_files(&self) -> Result<Vec<ObjectKey>> {
        let base_dir = self.base_dir.clone();
        tokio::task::spawn_blocking(move || scan_objects(&base_dir))
            .await
            .map_err(|e| ClusterError::Io(std::io::Error::other(e)))
    }

    pub async fn delete(&self, key: &ObjectKey) -> Result<()> {
        match tokio::fs::remove_file(self.object_path(key)).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(self.not_found(key)),
            Err(e) => return Err(e.into()),
        }

        // Only succeeds once the video directory is empty.
        let _ = tokio::fs::remove_dir(self.base_dir.join(key.video_id())).await;

        tracing::debug!("Deleted {}", key);
        Ok(())
    }
}

fn scan_objects(base_dir: &Path) -> Vec<ObjectKey> {
    let mut keys = Vec::new();

    for entry in WalkDir::new(base_dir)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", base_dir.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let filename = entry.file_name().to_str();
        let video_id = entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str());

        if let (Some(video_id), Some(filename)) = (video_id, filename)
            && let Ok(key) = ObjectKey::new(video_id, filename)
        {
            keys.push(key);
        }
    }

    keys
}
