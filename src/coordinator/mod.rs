//! Coordinator (Content Router)
//!
//! Holds the hash ring and one client per storage node, routes content reads and
//! writes to the owning node, and exposes cluster administration.
//!
//! ## Concurrency
//! The ring and the client map sit behind a single `RwLock`. Routing takes the read
//! side just long enough to resolve `(owner, client)`; the remote call runs after the
//! guard is released. Membership changes take the write side only for the ring/map
//! updates, never for the migration work in between.
//!
//! ## Submodules
//! - **`service`**: the `Coordinator` and content routing.
//! - **`migration`**: join/leave protocol and per-object move outcomes.
//! - **`protocol`** / **`handlers`** / **`server`**: the admin HTTP API.
//! - **`admin_client`**: client side of the admin API.

pub mod admin_client;
pub mod handlers;
pub mod migration;
pub mod protocol;
pub mod server;
pub mod service;

pub use migration::{MigrationOutcome, MigrationReport, SkipReason};
pub use service::Coordinator;
