//! Error Taxonomy
//!
//! Every fallible operation in the library returns [`ClusterError`]. The variants
//! keep the distinctions a caller of the content service cares about: a missing
//! object is not the same failure as an unreachable node or an expired deadline.
//!
//! ## Classes
//! - **Routing**: `EmptyRing`, `UnknownNode` (ring and client map disagree).
//! - **Remote**: `NotFound`, `Timeout`, `Unreachable`, `NodeFailure`.
//! - **Local**: `InvalidKey`, `Io`, `Config`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClusterError>;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("No storage node available: the ring is empty")]
    EmptyRing,

    #[error("No client registered for node {0}")]
    UnknownNode(String),

    #[error("Object {key} not found on {node}")]
    NotFound { node: String, key: String },

    #[error("Request to {node} timed out")]
    Timeout { node: String },

    #[error("Node {node} unreachable: {reason}")]
    Unreachable { node: String, reason: String },

    #[error("Node {node} reported failure: {reason}")]
    NodeFailure { node: String, reason: String },

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClusterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClusterError::NotFound { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClusterError::Timeout { .. })
    }

    /// Classifies a transport-level reqwest failure for `node`.
    pub(crate) fn from_transport(node: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClusterError::Timeout {
                node: node.to_string(),
            }
        } else if err.is_decode() {
            ClusterError::NodeFailure {
                node: node.to_string(),
                reason: format!("malformed response: {}", err),
            }
        } else {
            ClusterError::Unreachable {
                node: node.to_string(),
                reason: err.to_string(),
            }
        }
    }
}
