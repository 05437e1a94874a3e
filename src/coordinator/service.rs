use crate::config::{ConnectionString, CoordinatorConfig};
use crate::error::{ClusterError, Result};
use crate::ring::HashRing;
use crate::storage::client::{HttpConnector, NodeClient, NodeConnector};
use crate::storage::types::ObjectKey;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Ring and client map. Always read and written together under one lock, so a
/// routing decision never pairs a ring with a client map from a different moment.
#[derive(Default)]
pub(crate) struct ClusterState {
    pub(crate) ring: HashRing,
    pub(crate) clients: HashMap<String, Arc<dyn NodeClient>>,
    /// Ring as it was before the membership change in progress, if any. Reads that
    /// miss on the new owner fall back to the previous owner while it is set.
    pub(crate) previous_ring: Option<HashRing>,
}

/// Routes content traffic to the owning storage node and drives membership changes.
pub struct Coordinator {
    pub(crate) state: RwLock<ClusterState>,
    /// Serialises add/remove operations against each other. Routing never takes it.
    pub(crate) membership_changes: Mutex<()>,
    pub(crate) connector: Arc<dyn NodeConnector>,
    pub(crate) config: CoordinatorConfig,
}

impl Coordinator {
    pub fn new(connector: Arc<dyn NodeConnector>, config: CoordinatorConfig) -> Self {
        Self {
            state: RwLock::new(ClusterState::default()),
            membership_changes: Mutex::new(()),
            connector,
            config,
        }
    }

    /// Starts with `addresses` already on the ring. Clients are opened lazily, so
    /// nodes that are not up yet do not prevent the coordinator from starting.
    pub fn with_nodes<I, S>(
        addresses: I,
        connector: Arc<dyn NodeConnector>,
        config: CoordinatorConfig,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = ClusterState::default();
        for address in addresses {
            let address = address.as_ref();
            if state.clients.contains_key(address) {
                continue;
            }
            if !state.ring.add_node(address) {
                tracing::warn!("Skipping {}: its ring position is already taken", address);
                continue;
            }
            state
                .clients
                .insert(address.to_string(), connector.open(address));
        }

        tracing::info!("Coordinator initialised with {} storage node(s)", state.ring.len());

        Self {
            state: RwLock::new(state),
            membership_changes: Mutex::new(()),
            connector,
            config,
        }
    }

    /// Coordinator over HTTP storage nodes named by a connection string.
    pub fn from_connection_string(conn: &ConnectionString, config: CoordinatorConfig) -> Self {
        let connector = Arc::new(HttpConnector::new(config.request_timeout));
        Self::with_nodes(&conn.storage_nodes, connector, config)
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Resolves the owner of `key` and its client in one read-lock acquisition.
    async fn route(&self, key: &ObjectKey) -> Result<Arc<dyn NodeClient>> {
        let state = self.state.read().await;
        resolve(&state, &state.ring, key)
    }

    /// Like [`route`](Self::route), plus the previous owner while a membership
    /// change is moving objects.
    async fn route_read(
        &self,
        key: &ObjectKey,
    ) -> Result<(Arc<dyn NodeClient>, Option<Arc<dyn NodeClient>>)> {
        let state = self.state.read().await;
        let owner = resolve(&state, &state.ring, key)?;
        let previous = state
            .previous_ring
            .as_ref()
            .and_then(|ring| resolve(&state, ring, key).ok())
            .filter(|previous| previous.address() != owner.address());
        Ok((owner, previous))
    }

    pub async fn write(&self, video_id: &str, filename: &str, data: Vec<u8>) -> Result<()> {
        let key = ObjectKey::new(video_id, filename)?;
        let client = self.route(&key).await?;

        tracing::debug!("WRITE {} -> {} ({} bytes)", key, client.address(), data.len());
        bounded(
            self.config.request_timeout,
            client.address(),
            client.write(&key, data),
        )
        .await
    }

    /// Reads from the owner. During a membership change a miss on the owner is
    /// retried on the previous owner, then once more on the owner: a move either
    /// has not deleted the old copy yet or has already confirmed the new one.
    pub async fn read(&self, video_id: &str, filename: &str) -> Result<Vec<u8>> {
        let key = ObjectKey::new(video_id, filename)?;
        let (client, previous) = self.route_read(&key).await?;
        let timeout = self.config.request_timeout;

        tracing::debug!("READ {} -> {}", key, client.address());
        let first = bounded(timeout, client.address(), client.read(&key)).await;
        let Some(previous) = previous else {
            return first;
        };
        match first {
            Err(e) if e.is_not_found() => {}
            other => return other,
        }

        tracing::debug!("READ {} missed, trying previous owner {}", key, previous.address());
        match bounded(timeout, previous.address(), previous.read(&key)).await {
            Ok(data) => return Ok(data),
            Err(e) if e.is_not_found() => {}
            Err(e) => tracing::debug!("Previous owner {} failed: {}", previous.address(), e),
        }

        bounded(timeout, client.address(), client.read(&key)).await
    }

    /// Current members in ring order.
    pub async fn list_nodes(&self) -> Vec<String> {
        self.state.read().await.ring.nodes()
    }

    /// Node the ring currently assigns `videoId/filename` to.
    pub async fn owner_of(&self, video_id: &str, filename: &str) -> Result<String> {
        let key = ObjectKey::new(video_id, filename)?;
        let state = self.state.read().await;
        state
            .ring
            .get_node(&key.to_string())
            .map(str::to_string)
            .ok_or(ClusterError::EmptyRing)
    }

    pub(crate) async fn snapshot(&self) -> (HashRing, HashMap<String, Arc<dyn NodeClient>>) {
        let state = self.state.read().await;
        (state.ring.clone(), state.clients.clone())
    }
}

fn resolve(state: &ClusterState, ring: &HashRing, key: &ObjectKey) -> Result<Arc<dyn NodeClient>> {
    let owner = ring
        .get_node(&key.to_string())
        .ok_or(ClusterError::EmptyRing)?;

    state
        .clients
        .get(owner)
        .cloned()
        .ok_or_else(|| ClusterError::UnknownNode(owner.to_string()))
}

/// Runs a remote call under the coordinator's deadline, whatever the client type.
pub(crate) async fn bounded<T, F>(timeout: Duration, node: &str, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(ClusterError::Timeout {
            node: node.to_string(),
        }),
    }
}
