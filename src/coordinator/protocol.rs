//! Admin Protocol
//!
//! Endpoints and DTOs served by the coordinator on its admin address. Membership
//! calls always answer with a migrated-object count, even when some objects could not
//! be moved; `error` is only set when the change itself was refused.

use serde::{Deserialize, Serialize};

pub const ENDPOINT_LIST_NODES: &str = "/admin/nodes";
pub const ENDPOINT_ADD_NODE: &str = "/admin/nodes/add";
pub const ENDPOINT_REMOVE_NODE: &str = "/admin/nodes/remove";

#[derive(Debug, Serialize, Deserialize)]
pub struct ListNodesResponse {
    /// Member addresses in ring order.
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddNodeRequest {
    pub node_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveNodeRequest {
    pub node_address: String,
}

/// Shared by add and remove.
#[derive(Debug, Serialize, Deserialize)]
pub struct MembershipChangeResponse {
    pub migrated_file_count: usize,
    #[serde(default)]
    pub skipped_file_count: usize,
    #[serde(default)]
    pub error: Option<String>,
}

impl MembershipChangeResponse {
    pub fn refused(error: impl ToString) -> Self {
        Self {
            migrated_file_count: 0,
            skipped_file_count: 0,
            error: Some(error.to_string()),
        }
    }
}
