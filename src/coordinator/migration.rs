//! Membership Changes & Object Migration
//!
//! When a node joins or leaves, some keys change owner. This module moves the
//! affected objects so they become reachable at the node the ring now names.
//!
//! ## Protocol
//! - **Join**: dial the node first (failure leaves the ring untouched), put it on the ring,
//!   then list every member and move each object whose owner changed.
//! - **Leave**: list the departing node *before* taking it off the ring, remove it, move its
//!   objects to their new owners, and only then drop its client.
//!
//! ## Per-object guarantees
//! Each move is `read(old) -> write(new) -> delete(old)` and the delete is only issued
//! after the write was confirmed, so an object is always present on at least one node.
//! A failed step abandons that object alone; it stays where it was and shows up in the
//! report as skipped. There is no cross-object transaction and no automatic repair.
//!
//! The bulk work runs against a snapshot of the ring and without holding the state
//! lock; routing is only blocked for the ring/map updates themselves. Until the
//! moves are done the pre-change ring is kept so reads can fall back to the
//! previous owner of an object that has not arrived yet.

use super::service::{Coordinator, bounded};
use crate::error::{ClusterError, Result};
use crate::storage::client::NodeClient;
use crate::storage::types::ObjectKey;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Why an object was left where it was.
#[derive(Debug)]
pub enum SkipReason {
    /// The ring has no node left to own the key.
    NoOwner,
    /// The new owner is on the ring but has no registered client.
    NoClient(String),
    Read(ClusterError),
    Write(ClusterError),
    /// The copy on the new owner exists; the old copy could not be removed.
    Delete(ClusterError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoOwner => write!(f, "no owner left on the ring"),
            SkipReason::NoClient(node) => write!(f, "no client for new owner {}", node),
            SkipReason::Read(e) => write!(f, "read failed: {}", e),
            SkipReason::Write(e) => write!(f, "write failed: {}", e),
            SkipReason::Delete(e) => write!(f, "delete failed: {}", e),
        }
    }
}

#[derive(Debug)]
pub enum MigrationOutcome {
    Moved,
    Skipped(SkipReason),
}

#[derive(Debug)]
pub struct SkippedObject {
    pub key: ObjectKey,
    pub from: String,
    pub to: Option<String>,
    pub reason: SkipReason,
}

/// Result of one membership change.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub moved: Vec<ObjectKey>,
    pub skipped: Vec<SkippedObject>,
    /// Members whose listing failed during a join; their objects were not examined.
    pub unlisted_nodes: Vec<String>,
}

impl MigrationReport {
    pub fn migrated_count(&self) -> usize {
        self.moved.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    fn record(&mut self, planned: PlannedMove, outcome: MigrationOutcome) {
        match outcome {
            MigrationOutcome::Moved => self.moved.push(planned.key),
            MigrationOutcome::Skipped(reason) => {
                tracing::warn!(
                    "Left {} on {}: {}",
                    planned.key,
                    planned.from.address(),
                    reason
                );
                self.skipped.push(SkippedObject {
                    key: planned.key,
                    from: planned.from.address().to_string(),
                    to: planned.to_address,
                    reason,
                });
            }
        }
    }
}

struct PlannedMove {
    key: ObjectKey,
    from: Arc<dyn NodeClient>,
    to: Option<Arc<dyn NodeClient>>,
    to_address: Option<String>,
}

/// Copies `key` from `from` to `to`, then deletes it from `from`.
pub async fn move_object(
    key: &ObjectKey,
    from: &dyn NodeClient,
    to: &dyn NodeClient,
    timeout: Duration,
) -> MigrationOutcome {
    let data = match bounded(timeout, from.address(), from.read(key)).await {
        Ok(data) => data,
        Err(e) => return MigrationOutcome::Skipped(SkipReason::Read(e)),
    };

    if let Err(e) = bounded(timeout, to.address(), to.write(key, data)).await {
        return MigrationOutcome::Skipped(SkipReason::Write(e));
    }

    if let Err(e) = bounded(timeout, from.address(), from.delete(key)).await {
        return MigrationOutcome::Skipped(SkipReason::Delete(e));
    }

    tracing::debug!("Moved {} from {} to {}", key, from.address(), to.address());
    MigrationOutcome::Moved
}

impl Coordinator {
    /// Adds a storage node and pulls over the objects it now owns.
    ///
    /// Returns an empty report if the node is already a member. Fails without
    /// touching the ring if the node cannot be reached.
    pub async fn add_node(&self, address: &str) -> Result<MigrationReport> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ClusterError::Config("empty node address".to_string()));
        }

        let _serialised = self.membership_changes.lock().await;

        if self.state.read().await.clients.contains_key(address) {
            tracing::info!("AddNode {}: already a member", address);
            return Ok(MigrationReport::default());
        }

        let timeout = self.config.request_timeout;
        let client = bounded(timeout, address, self.connector.dial(address)).await?;

        {
            let mut state = self.state.write().await;
            let previous = state.ring.clone();
            if !state.ring.add_node(address) {
                return Err(ClusterError::Config(format!(
                    "ring position of {} is already taken by another node",
                    address
                )));
            }
            state.previous_ring = Some(previous);
            state.clients.insert(address.to_string(), client);
        }
        tracing::info!("AddNode {}: joined the ring, rebalancing", address);

        let (ring, clients) = self.snapshot().await;
        let mut members: Vec<(&String, &Arc<dyn NodeClient>)> = clients.iter().collect();
        members.sort_by(|a, b| a.0.cmp(b.0));

        let mut report = MigrationReport::default();
        let mut plan = Vec::new();

        for (holder, holder_client) in members {
            let keys = match bounded(timeout, holder, holder_client.list_files()).await {
                Ok(keys) => keys,
                Err(e) => {
                    tracing::warn!("AddNode {}: could not list {}: {}", address, holder, e);
                    report.unlisted_nodes.push(holder.clone());
                    continue;
                }
            };

            for key in keys {
                let Some(owner) = ring.get_node(&key.to_string()) else {
                    continue;
                };
                if owner == holder.as_str() {
                    continue;
                }
                plan.push(PlannedMove {
                    key,
                    from: holder_client.clone(),
                    to: clients.get(owner).cloned(),
                    to_address: Some(owner.to_string()),
                });
            }
        }

        self.execute(plan, &mut report).await;
        self.state.write().await.previous_ring = None;

        tracing::info!(
            "AddNode {}: moved {} object(s), skipped {}",
            address,
            report.migrated_count(),
            report.skipped_count()
        );
        Ok(report)
    }

    /// Removes a storage node after moving its objects to their new owners.
    ///
    /// Unknown addresses are a no-op. If the node cannot be listed it stays a
    /// member and an error is returned. Objects that fail to move are orphaned
    /// once the node's client is dropped.
    pub async fn remove_node(&self, address: &str) -> Result<MigrationReport> {
        let address = address.trim();
        let _serialised = self.membership_changes.lock().await;

        let departing = self.state.read().await.clients.get(address).cloned();
        let Some(departing) = departing else {
            tracing::info!("RemoveNode {}: not a member", address);
            return Ok(MigrationReport::default());
        };

        let timeout = self.config.request_timeout;
        let keys = bounded(timeout, address, departing.list_files()).await?;

        {
            let mut state = self.state.write().await;
            state.previous_ring = Some(state.ring.clone());
            state.ring.remove_node(address);
        }
        tracing::info!(
            "RemoveNode {}: left the ring, moving {} object(s)",
            address,
            keys.len()
        );

        let (ring, clients) = self.snapshot().await;
        let mut plan = Vec::with_capacity(keys.len());

        for key in keys {
            let owner = ring.get_node(&key.to_string());
            if owner == Some(address) {
                continue;
            }
            plan.push(PlannedMove {
                key,
                from: departing.clone(),
                to: owner.and_then(|o| clients.get(o).cloned()),
                to_address: owner.map(str::to_string),
            });
        }

        let mut report = MigrationReport::default();
        self.execute(plan, &mut report).await;

        {
            let mut state = self.state.write().await;
            state.clients.remove(address);
            state.previous_ring = None;
        }

        tracing::info!(
            "RemoveNode {}: moved {} object(s), skipped {}",
            address,
            report.migrated_count(),
            report.skipped_count()
        );
        Ok(report)
    }

    /// Runs the planned moves with bounded concurrency and folds the outcomes in.
    async fn execute(&self, plan: Vec<PlannedMove>, report: &mut MigrationReport) {
        let timeout = self.config.request_timeout;
        let permits = Arc::new(Semaphore::new(self.config.migration_concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for planned in plan {
            let permits = permits.clone();
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                let outcome = match (&planned.to, &planned.to_address) {
                    (Some(to), _) => {
                        move_object(&planned.key, planned.from.as_ref(), to.as_ref(), timeout)
                            .await
                    }
                    (None, Some(owner)) => {
                        MigrationOutcome::Skipped(SkipReason::NoClient(owner.clone()))
                    }
                    (None, None) => MigrationOutcome::Skipped(SkipReason::NoOwner),
                };
                (planned, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((planned, outcome)) => report.record(planned, outcome),
                Err(e) => tracing::error!("Migration task aborted: {}", e),
            }
        }
    }
}
