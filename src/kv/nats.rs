// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS JetStream key-value backend
//!
//! Stores every registry key in a JetStream KV bucket, keyed by its
//! normalized DN. The bucket is flat, so subtree listings are derived by
//! scanning bucket keys for the DN prefix.
//!
//! Each call drives its request to completion on a runtime owned by the
//! store. Do not call into a `NatsKvStore` from inside another async runtime.
//!
//! # Example
//!
//! ```rust,no_run
//! use cluster_registry::config::NatsKvConfig;
//! use cluster_registry::kv::NatsKvStore;
//!
//! let store = NatsKvStore::connect(&NatsKvConfig::from_env()?)?;
//! # Ok::<(), cluster_registry::RegistryError>(())
//! ```

use async_nats::jetstream::{self, kv};
use async_nats::ConnectOptions;
use futures::StreamExt;
use std::collections::BTreeSet;
use tokio::runtime::Runtime;
use tracing::{debug, info, trace};

use crate::config::NatsKvConfig;
use crate::dn::Dn;
use crate::errors::{RegistryError, RegistryResult};
use crate::kv::KvStore;

/// Blocking [`KvStore`] over a JetStream key-value bucket
pub struct NatsKvStore {
    runtime: Runtime,
    bucket: kv::Store,
}

impl NatsKvStore {
    /// Connect to NATS and open (or create) the configured bucket
    pub fn connect(config: &NatsKvConfig) -> RegistryResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RegistryError::Backend(e.to_string()))?;

        let bucket = runtime.block_on(open_bucket(config))?;
        info!(
            "Opened registry bucket '{}' at {:?}",
            config.bucket, config.servers
        );

        Ok(Self { runtime, bucket })
    }

    async fn all_keys(&self) -> RegistryResult<Vec<String>> {
        let mut keys = self
            .bucket
            .keys()
            .await
            .map_err(|e| RegistryError::Backend(e.to_string()))?;

        let mut collected = Vec::new();
        while let Some(key) = keys.next().await {
            collected.push(key.map_err(|e| RegistryError::Backend(e.to_string()))?);
        }
        Ok(collected)
    }

    /// Bucket keys at or below `key`
    fn subtree(&self, key: &Dn) -> RegistryResult<Vec<Dn>> {
        let keys = self.runtime.block_on(self.all_keys())?;
        let mut subtree = Vec::new();
        for raw in keys {
            let candidate = Dn::parse(&raw)?;
            if candidate.starts_with(key) {
                subtree.push(candidate);
            }
        }
        Ok(subtree)
    }
}

async fn open_bucket(config: &NatsKvConfig) -> RegistryResult<kv::Store> {
    let options = ConnectOptions::new()
        .name(&config.name)
        .connection_timeout(config.connect_timeout())
        .request_timeout(Some(config.request_timeout()));

    let client = async_nats::connect_with_options(config.servers.join(","), options)
        .await
        .map_err(|e| RegistryError::Backend(e.to_string()))?;

    let context = jetstream::new(client);
    match context.get_key_value(config.bucket.clone()).await {
        Ok(bucket) => Ok(bucket),
        Err(lookup) => {
            debug!("Bucket '{}' unavailable ({}), creating it", config.bucket, lookup);
            context
                .create_key_value(kv::Config {
                    bucket: config.bucket.clone(),
                    history: config.history,
                    ..Default::default()
                })
                .await
                .map_err(|e| RegistryError::Backend(e.to_string()))
        }
    }
}

impl KvStore for NatsKvStore {
    fn get(&self, key: &Dn) -> RegistryResult<String> {
        trace!("get {}", key);
        let value = self
            .runtime
            .block_on(self.bucket.get(key.as_str()))
            .map_err(|e| RegistryError::Backend(e.to_string()))?
            .ok_or_else(|| RegistryError::KeyNotFound(key.to_string()))?;

        String::from_utf8(value.to_vec())
            .map_err(|e| RegistryError::Serialization(format!("{}: {}", key, e)))
    }

    fn set(&self, key: &Dn, value: &str) -> RegistryResult<()> {
        trace!("set {} = {}", key, value);
        self.runtime
            .block_on(self.bucket.put(key.as_str(), value.as_bytes().to_vec().into()))
            .map_err(|e| RegistryError::Backend(e.to_string()))?;
        Ok(())
    }

    fn recurse(&self, key: &Dn) -> RegistryResult<BTreeSet<Dn>> {
        trace!("recurse {}", key);
        let subtree = self.subtree(key)?;
        if subtree.is_empty() {
            return Err(RegistryError::KeyNotFound(key.to_string()));
        }

        Ok(subtree
            .iter()
            .filter_map(|descendant| descendant.strip_prefix(key))
            .filter_map(|rest| rest.split('/').next())
            .map(|child| key.join(child))
            .collect())
    }

    fn delete(&self, key: &Dn, recursive: bool) -> RegistryResult<()> {
        let subtree = self.subtree(key)?;
        if subtree.is_empty() {
            return Err(RegistryError::KeyNotFound(key.to_string()));
        }
        if !recursive && subtree.iter().any(|candidate| candidate != key) {
            return Err(RegistryError::UnsupportedOperation(format!(
                "non-recursive delete of '{}' which has keys below it",
                key
            )));
        }

        for candidate in &subtree {
            self.runtime
                .block_on(self.bucket.delete(candidate.as_str()))
                .map_err(|e| RegistryError::Backend(e.to_string()))?;
        }
        debug!("Deleted {} ({} keys)", key, subtree.len());
        Ok(())
    }
}
