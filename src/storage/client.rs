//! Storage Node Client
//!
//! [`NodeClient`] is the coordinator's view of one storage node. [`HttpNodeClient`]
//! speaks the JSON protocol from [`super::protocol`]; tests substitute in-memory
//! implementations.
//!
//! A [`NodeConnector`] creates clients. `open` is lazy (no traffic until the first
//! call), `dial` additionally proves the node answers, which is what a joining node
//! must do before it is put on the ring.

use super::protocol::*;
use super::types::ObjectKey;
use crate::error::{ClusterError, Result};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Address the client was opened for, as it appears on the ring.
    fn address(&self) -> &str;

    async fn ping(&self) -> Result<()>;

    async fn write(&self, key: &ObjectKey, data: Vec<u8>) -> Result<()>;

    async fn read(&self, key: &ObjectKey) -> Result<Vec<u8>>;

    async fn list_files(&self) -> Result<Vec<ObjectKey>>;

    async fn delete(&self, key: &ObjectKey) -> Result<()>;
}

#[async_trait]
pub trait NodeConnector: Send + Sync {
    fn open(&self, address: &str) -> Arc<dyn NodeClient>;

    async fn dial(&self, address: &str) -> Result<Arc<dyn NodeClient>> {
        let client = self.open(address);
        client.ping().await?;
        Ok(client)
    }
}

#[derive(Clone)]
pub struct HttpNodeClient {
    address: String,
    base_url: String,
    http_client: reqwest::Client,
    timeout: Duration,
}

impl HttpNodeClient {
    pub fn new(address: impl Into<String>, http_client: reqwest::Client, timeout: Duration) -> Self {
        let address = address.into();
        let base_url = if address.starts_with("http://") || address.starts_with("https://") {
            address.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", address)
        };

        Self {
            address,
            base_url,
            http_client,
            timeout,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn post_json<Req, Resp>(&self, endpoint: &str, payload: &Req) -> Result<(StatusCode, Resp)>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(self.url(endpoint))
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClusterError::from_transport(&self.address, e))?;

        self.decode(response).await
    }

    async fn get_json<Resp>(&self, endpoint: &str) -> Result<(StatusCode, Resp)>
    where
        Resp: DeserializeOwned,
    {
        let response = self
            .http_client
            .get(self.url(endpoint))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClusterError::from_transport(&self.address, e))?;

        self.decode(response).await
    }

    async fn decode<Resp>(&self, response: reqwest::Response) -> Result<(StatusCode, Resp)>
    where
        Resp: DeserializeOwned,
    {
        let status = response.status();
        match response.json::<Resp>().await {
            Ok(body) => Ok((status, body)),
            Err(_) if !status.is_success() => Err(ClusterError::NodeFailure {
                node: self.address.clone(),
                reason: format!("HTTP {}", status),
            }),
            Err(e) => Err(ClusterError::from_transport(&self.address, e)),
        }
    }

    fn failure(&self, key: &ObjectKey, status: StatusCode, error: Option<String>) -> ClusterError {
        if status == StatusCode::NOT_FOUND {
            return ClusterError::NotFound {
                node: self.address.clone(),
                key: key.to_string(),
            };
        }
        ClusterError::NodeFailure {
            node: self.address.clone(),
            reason: error.unwrap_or_else(|| format!("HTTP {}", status)),
        }
    }
}

#[async_trait]
impl NodeClient for HttpNodeClient {
    fn address(&self) -> &str {
        &self.address
    }

    async fn ping(&self) -> Result<()> {
        let (status, _health): (_, HealthResponse) = self.get_json(ENDPOINT_HEALTH).await?;
        if !status.is_success() {
            return Err(ClusterError::NodeFailure {
                node: self.address.clone(),
                reason: format!("health check returned HTTP {}", status),
            });
        }
        Ok(())
    }

    async fn write(&self, key: &ObjectKey, data: Vec<u8>) -> Result<()> {
        let payload = WriteRequest {
            video_id: key.video_id().to_string(),
            filename: key.filename().to_string(),
            data,
        };
        let (status, body): (_, WriteResponse) = self.post_json(ENDPOINT_WRITE, &payload).await?;

        if !status.is_success() || !body.success {
            return Err(self.failure(key, status, body.error));
        }
        Ok(())
    }

    async fn read(&self, key: &ObjectKey) -> Result<Vec<u8>> {
        let payload = ReadRequest {
            video_id: key.video_id().to_string(),
            filename: key.filename().to_string(),
        };
        let (status, body): (_, ReadResponse) = self.post_json(ENDPOINT_READ, &payload).await?;

        if !status.is_success() || body.error.is_some() {
            return Err(self.failure(key, status, body.error));
        }
        Ok(body.data)
    }

    async fn list_files(&self) -> Result<Vec<ObjectKey>> {
        let (status, body): (_, ListFilesResponse) = self.get_json(ENDPOINT_LIST_FILES).await?;

        if !status.is_success() || body.error.is_some() {
            return Err(ClusterError::NodeFailure {
                node: self.address.clone(),
                reason: body.error.unwrap_or_else(|| format!("HTTP {}", status)),
            });
        }

        let mut keys = Vec::with_capacity(body.keys.len());
        for raw in body.keys {
            match ObjectKey::parse(&raw) {
                Ok(key) => keys.push(key),
                Err(e) => tracing::warn!("Ignoring malformed key from {}: {}", self.address, e),
            }
        }
        Ok(keys)
    }

    async fn delete(&self, key: &ObjectKey) -> Result<()> {
        let payload = DeleteRequest {
            video_id: key.video_id().to_string(),
            filename: key.filename().to_string(),
        };
        let (status, body): (_, DeleteResponse) = self.post_json(ENDPOINT_DELETE, &payload).await?;

        if !status.is_success() || !body.success {
            return Err(self.failure(key, status, body.error));
        }
        Ok(())
    }
}

/// Opens [`HttpNodeClient`]s sharing one connection pool.
#[derive(Clone)]
pub struct HttpConnector {
    http_client: reqwest::Client,
    timeout: Duration,
}

impl HttpConnector {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl NodeConnector for HttpConnector {
    fn open(&self, address: &str) -> Arc<dyn NodeClient> {
        Arc::new(HttpNodeClient::new(
            address,
            self.http_client.clone(),
            self.timeout,
        ))
    }
}
