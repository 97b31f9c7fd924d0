// Copyright (c) 2025 - Cowboy AI, Inc.
//! Key-Value Backend Abstraction
//!
//! Entities never own data; they translate field access into calls on a
//! [`KvStore`]. Any hierarchical store offering linearizable single-key
//! get/set and a subtree listing can back the registry.
//!
//! # Contract
//!
//! 1. **get**: fails with `KeyNotFound` if the key holds no value
//! 2. **set**: creates intermediate structure and overwrites existing values
//! 3. **recurse**: lists the immediate children of a key as full DNs, failing
//!    with `KeyNotFound` if nothing exists at or below the key
//! 4. **delete**: removes a key; non-recursive delete of a key with children
//!    fails with `UnsupportedOperation`
//!
//! Backends do not retry. Every failure is surfaced to the caller.
//!
//! # Example
//!
//! ```rust
//! use cluster_registry::dn::Dn;
//! use cluster_registry::kv::{KvStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let key = Dn::parse("clusters/user/cdh/5.7.0/cluster1/status").unwrap();
//! store.set(&key, "running").unwrap();
//! assert_eq!(store.get(&key).unwrap(), "running");
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::dn::Dn;
use crate::errors::RegistryResult;

pub mod memory;
#[cfg(feature = "nats")]
pub mod nats;

pub use memory::MemoryStore;
#[cfg(feature = "nats")]
pub use nats::NatsKvStore;

/// Backend handle shared by every entity constructed against it
pub type SharedStore = Arc<dyn KvStore>;

/// Hierarchical key-value backend consumed by the registry
pub trait KvStore: Send + Sync {
    /// Read the value stored at `key`
    fn get(&self, key: &Dn) -> RegistryResult<String>;

    /// Write `value` at `key`, replacing any previous value
    fn set(&self, key: &Dn, value: &str) -> RegistryResult<()>;

    /// List the immediate children of `key`
    fn recurse(&self, key: &Dn) -> RegistryResult<BTreeSet<Dn>>;

    /// Remove `key`, and everything below it when `recursive` is set
    fn delete(&self, key: &Dn, recursive: bool) -> RegistryResult<()>;
}
