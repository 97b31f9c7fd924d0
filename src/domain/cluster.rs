// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cluster entity
//!
//! A cluster root owns two subtrees, `nodes/` and `services/`. Both
//! collections are listed from the backend on every call.

use std::collections::BTreeSet;

use super::entity::{child_dn, Access, Entity, FieldSpec, Record};
use super::{Node, Service};
use crate::dn::{Dn, NODES, SERVICES};
use crate::errors::RegistryResult;
use crate::kv::SharedStore;

/// Handle over `.../{cluster}`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cluster {
    record: Record,
}

impl Entity for Cluster {
    const KIND: &'static str = "Cluster";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("status", Access::Stored),
        FieldSpec::new("name", Access::Name),
        FieldSpec::new(NODES, Access::Relation),
        FieldSpec::new(SERVICES, Access::Relation),
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

impl Cluster {
    pub fn status(&self) -> RegistryResult<String> {
        self.get("status")
    }

    pub fn set_status(&self, status: &str) -> RegistryResult<()> {
        self.set("status", status)
    }

    /// Every node listed under `nodes/`
    pub fn nodes(&self) -> RegistryResult<BTreeSet<Node>> {
        let store = self.record.store();
        Ok(self
            .record
            .children(NODES)?
            .into_iter()
            .map(|dn| Node::new(store.clone(), dn))
            .collect())
    }

    /// Every service listed under `services/`
    pub fn services(&self) -> RegistryResult<BTreeSet<Service>> {
        let store = self.record.store();
        Ok(self
            .record
            .children(SERVICES)?
            .into_iter()
            .map(|dn| Service::new(store.clone(), dn))
            .collect())
    }

    /// Handle for the node called `name`, whether or not it exists yet
    pub fn node(&self, name: &str) -> RegistryResult<Node> {
        let dn = child_dn(&self.dn().join(NODES), name)?;
        Ok(Node::new(self.record.store().clone(), dn))
    }

    /// Handle for the service called `name`, whether or not it exists yet
    pub fn service(&self, name: &str) -> RegistryResult<Service> {
        let dn = child_dn(&self.dn().join(SERVICES), name)?;
        Ok(Service::new(self.record.store().clone(), dn))
    }
}
