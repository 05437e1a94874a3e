//! Distributed Video Content Storage
//!
//! Stores the files that make up a video (manifests, init segments, media
//! segments) across a horizontally scalable set of storage nodes. Each object is
//! owned by exactly one node, chosen by a consistent hash ring, and nodes can join
//! or leave while the cluster keeps serving.
//!
//! ## Architecture Modules
//! - **`ring`**: the consistent hash ring. Pure data structure, no I/O.
//! - **`storage`**: the storage node: a filesystem object store, its HTTP protocol
//!   and the client the coordinator uses to talk to it.
//! - **`coordinator`**: routes content traffic to the owning node and rebalances
//!   objects when membership changes. Also serves the admin API.
//! - **`content`**: the `ContentService` contract seen by the front end, implemented
//!   both locally and by the coordinator.
//! - **`config`** / **`error`**: connection strings, tunables and the error taxonomy.

pub mod config;
pub mod content;
pub mod coordinator;
pub mod error;
pub mod ring;
pub mod storage;

pub use config::{ConnectionString, CoordinatorConfig};
pub use content::{ContentService, FsContentService};
pub use coordinator::{Coordinator, MigrationReport};
pub use error::{ClusterError, Result};
pub use ring::HashRing;
