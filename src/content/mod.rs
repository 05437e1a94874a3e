//! Video Content Service
//!
//! The contract the upload/playback front end depends on: store and fetch the
//! bytes of one file of one video. Two implementations exist: [`FsContentService`]
//! keeps everything in one local directory, and the [`Coordinator`] spreads objects
//! across the storage cluster. Callers hold an `Arc<dyn ContentService>` and do not
//! care which one they got.
//!
//! [`Coordinator`]: crate::coordinator::Coordinator

pub mod fs;

pub use fs::FsContentService;

use crate::coordinator::Coordinator;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ContentService: Send + Sync {
    /// Stores `data` under `video_id/filename`, replacing any previous content.
    async fn write(&self, video_id: &str, filename: &str, data: Vec<u8>) -> Result<()>;

    async fn read(&self, video_id: &str, filename: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl ContentService for Coordinator {
    async fn write(&self, video_id: &str, filename: &str, data: Vec<u8>) -> Result<()> {
        Coordinator::write(self, video_id, filename, data).await
    }

    async fn read(&self, video_id: &str, filename: &str) -> Result<Vec<u8>> {
        Coordinator::read(self, video_id, filename).await
    }
}

#[cfg(test)]
mod tests;
