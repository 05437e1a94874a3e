use crate::error::{ClusterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Address of a stored object: `videoId/filename`.
///
/// Both parts are single path components, so a key always maps to exactly one
/// file two levels below a node's base directory. Components may not start with
/// `.`, which also keeps in-flight temporary files out of listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectKey {
    video_id: String,
    filename: String,
}

impl ObjectKey {
    pub fn new(video_id: impl Into<String>, filename: impl Into<String>) -> Result<Self> {
        let video_id = video_id.into();
        let filename = filename.into();
        validate_component("video id", &video_id)?;
        validate_component("filename", &filename)?;
        Ok(Self { video_id, filename })
    }

    /// Splits a composite `videoId/filename` key at its first `/`.
    pub fn parse(composite: &str) -> Result<Self> {
        let (video_id, filename) = composite
            .split_once('/')
            .ok_or_else(|| ClusterError::InvalidKey(format!("missing '/' in {:?}", composite)))?;
        Self::new(video_id, filename)
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.video_id, self.filename)
    }
}

impl FromStr for ObjectKey {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn validate_component(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ClusterError::InvalidKey(format!("empty {}", kind)));
    }
    if value.starts_with('.') {
        return Err(ClusterError::InvalidKey(format!(
            "{} {:?} may not start with '.'",
            kind, value
        )));
    }
    if value.contains(['/', '\\', '\0']) {
        return Err(ClusterError::InvalidKey(format!(
            "{} {:?} contains a path separator",
            kind, value
        )));
    }
    Ok(())
}
