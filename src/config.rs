// Copyright (c) 2025 - Cowboy AI, Inc.
//! Backend configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{RegistryError, RegistryResult};

/// Configuration for a NATS JetStream key-value backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NatsKvConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Client name reported to the server
    pub name: String,
    /// Key-value bucket holding the registry tree
    pub bucket: String,
    /// Revisions kept per key when the bucket is created
    pub history: i64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for NatsKvConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            name: "cluster-registry".to_string(),
            bucket: "registry".to_string(),
            history: 1,
            connect_timeout_secs: 10,
            request_timeout_secs: 5,
        }
    }
}

impl NatsKvConfig {
    /// Load configuration from environment variables
    ///
    /// `NATS_URL` may hold a comma-separated server list. `REGISTRY_BUCKET`
    /// and `REGISTRY_CLIENT_NAME` override the bucket and client name.
    pub fn from_env() -> RegistryResult<Self> {
        let defaults = Self::default();

        let servers = match std::env::var("NATS_URL") {
            Ok(urls) => parse_servers(&urls)?,
            Err(_) => defaults.servers,
        };

        let bucket = std::env::var("REGISTRY_BUCKET").unwrap_or(defaults.bucket);
        let name = std::env::var("REGISTRY_CLIENT_NAME").unwrap_or(defaults.name);

        Ok(Self {
            servers,
            name,
            bucket,
            ..Self::default()
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_servers(urls: &str) -> RegistryResult<Vec<String>> {
    let servers: Vec<String> = urls
        .split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect();

    if servers.is_empty() {
        return Err(RegistryError::Configuration(
            "NATS_URL is set but lists no servers".to_string(),
        ));
    }
    Ok(servers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NatsKvConfig::default();
        assert_eq!(config.bucket, "registry");
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_servers() {
        let servers = parse_servers("nats://a:4222, nats://b:4222,").unwrap();
        assert_eq!(servers, vec!["nats://a:4222", "nats://b:4222"]);
        assert!(parse_servers(" , ").is_err());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: NatsKvConfig =
            serde_json::from_str(r#"{"bucket": "clusters", "history": 5}"#).unwrap();
        assert_eq!(config.bucket, "clusters");
        assert_eq!(config.history, 5);
        assert_eq!(config.servers, NatsKvConfig::default().servers);
    }
}
