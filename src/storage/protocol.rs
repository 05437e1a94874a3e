//! Storage Node Protocol
//!
//! Endpoints and Data Transfer Objects for coordinator → storage node calls.
//!
//! Every response carries an inline `error` field. A node never drops the connection
//! because one object failed; the HTTP status only tells the caller what class of
//! failure the error string describes (404 missing, 400 bad key, 500 I/O).
//!
//! Object bytes travel as standard base64 strings rather than JSON integer arrays.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Store an object, overwriting any previous bytes.
pub const ENDPOINT_WRITE: &str = "/storage/write";
/// Fetch an object's bytes.
pub const ENDPOINT_READ: &str = "/storage/read";
/// Enumerate every object held by the node. Used by rebalancing only.
pub const ENDPOINT_LIST_FILES: &str = "/storage/files";
/// Remove an object after it has been copied to its new owner.
pub const ENDPOINT_DELETE: &str = "/storage/delete";
/// Liveness probe used when a node joins.
pub const ENDPOINT_HEALTH: &str = "/storage/health";

// --- Data Transfer Objects ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteRequest {
    pub video_id: String,
    pub filename: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WriteResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadRequest {
    pub video_id: String,
    pub filename: String,
}

/// `data` is only meaningful when `error` is `None`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadResponse {
    #[serde(default, with = "base64_bytes")]
    pub data: Vec<u8>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Keys are composite `videoId/filename` strings.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListFilesResponse {
    pub keys: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub video_id: String,
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub base_dir: String,
}

impl WriteResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
        }
    }
}

impl DeleteResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
        }
    }
}

impl ReadResponse {
    pub fn failed(error: impl ToString) -> Self {
        Self {
            data: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(D::Error::custom)
    }
}
