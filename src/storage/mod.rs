//! Storage Node Service
//!
//! One instance runs per storage node and owns a directory of video objects.
//!
//! ## Core Concepts
//! - **Object keys**: `videoId/filename`, validated so a key can never escape the base directory.
//! - **Local store**: filesystem-backed write/read/list/delete (`LocalStore`).
//! - **Protocol**: JSON over HTTP with inline error fields (`protocol`, `handlers`, `server`).
//! - **Client**: the coordinator-side `NodeClient` used for routing and rebalancing.

pub mod client;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod store;
pub mod types;

pub use client::{HttpConnector, HttpNodeClient, NodeClient, NodeConnector};
pub use store::LocalStore;
pub use types::ObjectKey;
