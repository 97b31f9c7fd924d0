// Copyright (c) 2025 - Cowboy AI, Inc.
//! Registration and lookup under a product prefix
//!
//! Provisioning collaborators receive routes such as
//! `instances/jlopez/cdh/5.7.0/99/nodes/master0/status` and need the
//! instance they concern. A [`Registry`] knows the product prefix
//! (`instances/jlopez/cdh/5.7.0`) and turns routes, ids and flat ids into
//! entity handles.
//!
//! ```rust
//! use cluster_registry::{Entity, MemoryStore, Registry};
//! use std::sync::Arc;
//!
//! let registry = Registry::new(Arc::new(MemoryStore::new()), "instances/jlopez/cdh/5.7.0").unwrap();
//! let cluster = registry
//!     .cluster_for_route("instances/jlopez/cdh/5.7.0/99/nodes/master0/status")
//!     .unwrap();
//! assert_eq!(cluster.dn().as_str(), "instances/jlopez/cdh/5.7.0/99");
//! ```

use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::dn::{self, Dn, DnShape};
use crate::domain::{Cluster, Disk, Entity, Node, Service};
use crate::errors::{RegistryError, RegistryResult};
use crate::kv::SharedStore;

/// Entry point binding a backend to a product prefix
#[derive(Clone)]
pub struct Registry {
    store: SharedStore,
    prefix: Dn,
}

impl Registry {
    pub fn new(store: SharedStore, prefix: &str) -> RegistryResult<Self> {
        Ok(Self {
            store,
            prefix: Dn::parse(prefix)?,
        })
    }

    /// Registry for `{shape}/{user}/{product}/{version}`
    pub fn for_product(
        store: SharedStore,
        shape: DnShape,
        user: &str,
        product: &str,
        version: &str,
    ) -> RegistryResult<Self> {
        Self::new(store, &format!("{}/{}/{}/{}", shape, user, product, version))
    }

    pub fn prefix(&self) -> &Dn {
        &self.prefix
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn cluster(&self, dn: &str) -> RegistryResult<Cluster> {
        Ok(Cluster::new(self.store.clone(), Dn::parse(dn)?))
    }

    pub fn node(&self, dn: &str) -> RegistryResult<Node> {
        Ok(Node::new(self.store.clone(), Dn::parse(dn)?))
    }

    pub fn service(&self, dn: &str) -> RegistryResult<Service> {
        Ok(Service::new(self.store.clone(), Dn::parse(dn)?))
    }

    pub fn disk(&self, dn: &str) -> RegistryResult<Disk> {
        Ok(Disk::new(self.store.clone(), Dn::parse(dn)?))
    }

    /// Numeric instance id carried by `route`
    pub fn instance_id(&self, route: &str) -> RegistryResult<u64> {
        dn::parse_instance_id(route, self.prefix.as_str())
    }

    /// DN of instance `id` under the prefix
    pub fn instance_dn(&self, id: u64) -> Dn {
        self.prefix.join(&id.to_string())
    }

    /// Cluster an inbound route refers to
    pub fn cluster_for_route(&self, route: &str) -> RegistryResult<Cluster> {
        let id = self.instance_id(route)?;
        debug!("Route {} resolves to instance {}", route, id);
        Ok(Cluster::new(self.store.clone(), self.instance_dn(id)))
    }

    /// Every cluster currently registered under the prefix
    pub fn instances(&self) -> RegistryResult<BTreeSet<Cluster>> {
        let children = match self.store.recurse(&self.prefix) {
            Ok(children) => children,
            Err(RegistryError::KeyNotFound(_)) => BTreeSet::new(),
            Err(e) => return Err(e),
        };
        Ok(children
            .into_iter()
            .map(|dn| Cluster::new(self.store.clone(), dn))
            .collect())
    }

    /// Smallest id above every numeric instance under the prefix
    pub fn next_instance_id(&self) -> RegistryResult<u64> {
        let highest = self
            .instances()?
            .iter()
            .filter_map(|cluster| cluster.name().parse::<u64>().ok())
            .max();
        match highest {
            None => Ok(1),
            Some(id) => id.checked_add(1).ok_or_else(|| {
                RegistryError::UnsupportedOperation(format!(
                    "instance id space under '{}' is exhausted",
                    self.prefix
                ))
            }),
        }
    }

    /// Cluster containing the entity encoded by a flat id
    pub fn lookup_id(&self, flat_id: &str) -> RegistryResult<Cluster> {
        let dn = dn::dn_from(flat_id)?;
        if !dn.starts_with(&self.prefix) {
            return Err(RegistryError::MalformedDn(format!(
                "'{}' is not below '{}'",
                dn, self.prefix
            )));
        }
        let root = dn::parse_cluster_dn(dn.as_str())?;
        Ok(Cluster::new(self.store.clone(), root))
    }

    /// Remove a cluster and everything below it
    pub fn deregister(&self, cluster: &Cluster) -> RegistryResult<()> {
        self.store.delete(cluster.dn(), true)?;
        info!("Deregistered cluster {}", cluster.dn());
        Ok(())
    }
}
