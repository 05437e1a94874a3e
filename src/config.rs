//! Cluster Configuration
//!
//! The coordinator is configured with a single connection string,
//! `adminAddress,node1,node2,...`: the first entry is where the admin API listens,
//! the rest are the initial storage nodes.

use crate::error::{ClusterError, Result};
use std::str::FromStr;
use std::time::Duration;

/// Deadline for every remote call (write, read, list, delete, dial).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Object moves allowed in flight during one membership change.
pub const DEFAULT_MIGRATION_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub request_timeout: Duration,
    pub migration_concurrency: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            migration_concurrency: DEFAULT_MIGRATION_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub admin_addr: String,
    pub storage_nodes: Vec<String>,
}

impl ConnectionString {
    pub fn parse(option: &str) -> Result<Self> {
        let parts: Vec<&str> = option.split(',').map(str::trim).collect();

        if parts.iter().any(|part| part.is_empty()) {
            return Err(ClusterError::Config(format!(
                "empty address in connection string {:?}",
                option
            )));
        }
        if parts.len() < 2 {
            return Err(ClusterError::Config(
                "expected an admin address followed by at least one storage node".to_string(),
            ));
        }

        Ok(Self {
            admin_addr: parts[0].to_string(),
            storage_nodes: parts[1..].iter().map(|part| part.to_string()).collect(),
        })
    }
}

impl FromStr for ConnectionString {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connection_string() {
        let conn = ConnectionString::parse("localhost:8081,localhost:8090,localhost:8091").unwrap();

        assert_eq!(conn.admin_addr, "localhost:8081");
        assert_eq!(conn.storage_nodes, vec!["localhost:8090", "localhost:8091"]);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let conn: ConnectionString = " admin:1 , node:2 ".parse().unwrap();

        assert_eq!(conn.admin_addr, "admin:1");
        assert_eq!(conn.storage_nodes, vec!["node:2"]);
    }

    #[test]
    fn test_parse_requires_a_storage_node() {
        assert!(ConnectionString::parse("localhost:8081").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_entries() {
        assert!(ConnectionString::parse("admin:1,,node:2").is_err());
        assert!(ConnectionString::parse("").is_err());
    }

    #[test]
    fn test_default_config_matches_reference_timeout() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.migration_concurrency > 0);
    }
}
