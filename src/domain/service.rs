// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service entity

use std::collections::BTreeSet;

use super::entity::{child_dn, Access, Entity, FieldSpec, Record};
use super::{Cluster, Node};
use crate::dn::{Dn, NODES, SERVICES};
use crate::errors::RegistryResult;
use crate::kv::SharedStore;

/// Handle over `{cluster}/services/{name}`
///
/// `workers` and `disks` are opaque sizing values owned by the provisioning
/// templates; this layer stores them as given.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Service {
    record: Record,
}

impl Entity for Service {
    const KIND: &'static str = "Service";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("status", Access::Stored),
        FieldSpec::new("heap", Access::Stored),
        FieldSpec::new("workers", Access::Stored),
        FieldSpec::new("disks", Access::Stored),
        FieldSpec::new("name", Access::Name),
        FieldSpec::new(NODES, Access::StoredList),
        FieldSpec::new("cluster", Access::Relation),
    ];

    fn new(store: SharedStore, dn: Dn) -> Self {
        Self {
            record: Record::new(store, dn),
        }
    }

    fn record(&self) -> &Record {
        &self.record
    }
}

impl Service {
    pub fn status(&self) -> RegistryResult<String> {
        self.get("status")
    }

    pub fn set_status(&self, status: &str) -> RegistryResult<()> {
        self.set("status", status)
    }

    pub fn heap(&self) -> RegistryResult<String> {
        self.get("heap")
    }

    pub fn set_heap(&self, heap: &str) -> RegistryResult<()> {
        self.set("heap", heap)
    }

    pub fn workers(&self) -> RegistryResult<String> {
        self.get("workers")
    }

    pub fn set_workers(&self, workers: &str) -> RegistryResult<()> {
        self.set("workers", workers)
    }

    pub fn disks(&self) -> RegistryResult<String> {
        self.get("disks")
    }

    pub fn set_disks(&self, disks: &str) -> RegistryResult<()> {
        self.set("disks", disks)
    }

    /// Owning cluster, found by dropping the trailing `services/{name}`
    pub fn cluster(&self) -> RegistryResult<Cluster> {
        let dn = self.record.ancestor(SERVICES)?;
        Ok(Cluster::new(self.record.store().clone(), dn))
    }

    /// Nodes running this service, resolved under the cluster's `nodes/`
    ///
    /// Names are matched exactly; a stored name with no node under that
    /// exact segment still resolves to a handle whose reads fail.
    pub fn nodes(&self) -> RegistryResult<BTreeSet<Node>> {
        let names = self.record.read_list(NODES)?;
        let root = self.cluster()?.dn().join(NODES);
        let store = self.record.store();

        names
            .iter()
            .map(|name| Ok(Node::new(store.clone(), child_dn(&root, name)?)))
            .collect()
    }

    /// Replace the stored list of node names
    pub fn set_nodes<S: AsRef<str>>(&self, names: &[S]) -> RegistryResult<()> {
        self.record.write_list(NODES, names)
    }
}
