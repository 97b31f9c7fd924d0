// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node entity
//!
//! A node lives at `{cluster}/nodes/{name}`. Its `services` field holds bare
//! service names that resolve against the owning cluster's `services/`
//! subtree; its disks are the children of `{node}/disks`.

use std::collections::BTreeSet;

use super::entity::{child_dn, Access, Entity, FieldSpec, Record};
use super::{Cluster, Disk, Service};
use crate::dn::{Dn, DISKS, NODES, SERVICES};
use crate::errors::RegistryResult;
use crate::kv::SharedStore;

/// Handle over `{cluster}/nodes/{name}`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Node {
    record: Record,
}

impl Entity for Node {
    const KIND: &'static str = "Node";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("status", Access::Stored),
        FieldSpec::new("mem", Access::Stored),
        FieldSpec::new("cpu", Access::Stored),
        FieldSpec::new("id", Access::Stored),
        FieldSpec::new("address", Access::Stored),
        FieldSpec::new("host", Access::Stored),
        FieldSpec::new("name", Access::Name),
        FieldSpec::new(SERVICES, Access::StoredList),
        FieldSpec::new(DISKS, Access::Relation),
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

impl Node {
    pub fn status(&self) -> RegistryResult<String> {
        self.get("status")
    }

    pub fn set_status(&self, status: &str) -> RegistryResult<()> {
        self.set("status", status)
    }

    pub fn mem(&self) -> RegistryResult<String> {
        self.get("mem")
    }

    pub fn set_mem(&self, mem: &str) -> RegistryResult<()> {
        self.set("mem", mem)
    }

    pub fn cpu(&self) -> RegistryResult<String> {
        self.get("cpu")
    }

    pub fn set_cpu(&self, cpu: &str) -> RegistryResult<()> {
        self.set("cpu", cpu)
    }

    /// Identifier assigned by the provisioner (empty until deployed)
    pub fn id(&self) -> RegistryResult<String> {
        self.get("id")
    }

    pub fn set_id(&self, id: &str) -> RegistryResult<()> {
        self.set("id", id)
    }

    pub fn address(&self) -> RegistryResult<String> {
        self.get("address")
    }

    pub fn set_address(&self, address: &str) -> RegistryResult<()> {
        self.set("address", address)
    }

    pub fn host(&self) -> RegistryResult<String> {
        self.get("host")
    }

    pub fn set_host(&self, host: &str) -> RegistryResult<()> {
        self.set("host", host)
    }

    /// Owning cluster, found by dropping the trailing `nodes/{name}`
    pub fn cluster(&self) -> RegistryResult<Cluster> {
        let dn = self.record.ancestor(NODES)?;
        Ok(Cluster::new(self.record.store().clone(), dn))
    }

    /// Services this node runs, resolved under the cluster's `services/`
    pub fn services(&self) -> RegistryResult<BTreeSet<Service>> {
        let names = self.record.read_list(SERVICES)?;
        let root = self.cluster()?.dn().join(SERVICES);
        let store = self.record.store();

        names
            .iter()
            .map(|name| Ok(Service::new(store.clone(), child_dn(&root, name)?)))
            .collect()
    }

    /// Replace the stored list of service names
    pub fn set_services<S: AsRef<str>>(&self, names: &[S]) -> RegistryResult<()> {
        self.record.write_list(SERVICES, names)
    }

    /// Disks listed under `{node}/disks`
    pub fn disks(&self) -> RegistryResult<BTreeSet<Disk>> {
        let store = self.record.store();
        Ok(self
            .record
            .children(DISKS)?
            .into_iter()
            .map(|dn| Disk::new(store.clone(), dn))
            .collect())
    }
}
