// Copyright (c) 2025 - Cowboy AI, Inc.
//! Typed access to cluster resource allocation stored in a key-value tree
//!
//! Clusters contain nodes and services; nodes reference services and own
//! disks; services reference nodes. All state lives in a hierarchical
//! key-value backend as flat values addressed by distinguished names (DNs).
//! This crate maps field access on [`Cluster`], [`Node`], [`Service`] and
//! [`Disk`] handles onto that backend and resolves the relationships
//! between them.
//!
//! - [`dn`] - DN normalization, the flat-id codec and DN parsers
//! - [`kv`] - the backend contract plus in-memory and NATS implementations
//! - [`domain`] - entity handles
//! - [`registry`] - route, id and prefix based lookup
//!
//! # Example
//!
//! ```rust
//! use cluster_registry::{Entity, MemoryStore, Registry};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let store = MemoryStore::from_json(&json!({
//!     "clusters": { "user": { "cdh": { "5.7.0": { "cluster1": {
//!         "nodes": { "master0": { "services": ["service0"] } },
//!         "services": { "service0": { "status": "pending" } }
//!     }}}}}
//! }))
//! .unwrap();
//! let registry = Registry::new(Arc::new(store), "clusters/user/cdh/5.7.0").unwrap();
//!
//! let node = registry.node("clusters/user/cdh/5.7.0/cluster1/nodes/master0").unwrap();
//! let services = node.services().unwrap();
//! let service = services.iter().next().unwrap();
//! assert_eq!(service.status().unwrap(), "pending");
//! assert_eq!(node.cluster().unwrap().name(), "cluster1");
//! ```

pub mod config;
pub mod dn;
pub mod domain;
pub mod errors;
pub mod kv;
pub mod registry;

// Re-export commonly used types
pub use dn::{dn_from, id_from, parse_name, Dn, DnShape};
pub use domain::{Cluster, Disk, Entity, Node, Service};
pub use errors::{RegistryError, RegistryResult};
pub use kv::{KvStore, MemoryStore, SharedStore};
pub use registry::Registry;
