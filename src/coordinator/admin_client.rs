//! Client for the coordinator's admin API, used by the `cluster-admin` tool.

use super::protocol::*;

use anyhow::Result;
use std::time::Duration;

pub struct AdminClient {
    base_url: String,
    http_client: reqwest::Client,
    timeout: Option<Duration>,
}

impl AdminClient {
    /// No deadline by default: a membership change lasts as long as its migration.
    pub fn new(admin_addr: &str) -> Self {
        let base_url = if admin_addr.starts_with("http://") || admin_addr.starts_with("https://") {
            admin_addr.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", admin_addr)
        };

        Self {
            base_url,
            http_client: reqwest::Client::new(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn post(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let builder = self.http_client.post(format!("{}{}", self.base_url, endpoint));
        match self.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    pub async fn list_nodes(&self) -> Result<Vec<String>> {
        let mut builder = self
            .http_client
            .get(format!("{}{}", self.base_url, ENDPOINT_LIST_NODES));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(anyhow::anyhow!("ListNodes failed: {}", response.status()));
        }
        let body: ListNodesResponse = response.json().await?;
        Ok(body.nodes)
    }

    pub async fn add_node(&self, node_address: &str) -> Result<MembershipChangeResponse> {
        let payload = AddNodeRequest {
            node_address: node_address.to_string(),
        };
        let response = self.post(ENDPOINT_ADD_NODE).json(&payload).send().await?;
        Self::membership_result("AddNode", response).await
    }

    pub async fn remove_node(&self, node_address: &str) -> Result<MembershipChangeResponse> {
        let payload = RemoveNodeRequest {
            node_address: node_address.to_string(),
        };
        let response = self.post(ENDPOINT_REMOVE_NODE).json(&payload).send().await?;
        Self::membership_result("RemoveNode", response).await
    }

    async fn membership_result(
        operation: &str,
        response: reqwest::Response,
    ) -> Result<MembershipChangeResponse> {
        let status = response.status();
        let body: MembershipChangeResponse = response.json().await?;

        if let Some(error) = &body.error {
            return Err(anyhow::anyhow!("{} failed ({}): {}", operation, status, error));
        }
        if !status.is_success() {
            return Err(anyhow::anyhow!("{} failed: {}", operation, status));
        }
        Ok(body)
    }
}
