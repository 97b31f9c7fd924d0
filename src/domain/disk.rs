// Copyright (c) 2025 - Cowboy AI, Inc.
//! Disk entity

use super::entity::{Access, Entity, FieldSpec, Record};
use super::Node;
use crate::dn::{Dn, DISKS};
use crate::errors::RegistryResult;
use crate::kv::SharedStore;

/// Handle over `{node}/disks/{name}`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Disk {
    record: Record,
}

impl Entity for Disk {
    const KIND: &'static str = "Disk";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("origin", Access::Stored),
        FieldSpec::new("destination", Access::Stored),
        FieldSpec::new("mode", Access::Stored),
        FieldSpec::new("name", Access::Name),
        FieldSpec::new("node", Access::Relation),
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

impl Disk {
    /// Host path backing the disk
    pub fn origin(&self) -> RegistryResult<String> {
        self.get("origin")
    }

    pub fn set_origin(&self, origin: &str) -> RegistryResult<()> {
        self.set("origin", origin)
    }

    /// Mount point inside the node
    pub fn destination(&self) -> RegistryResult<String> {
        self.get("destination")
    }

    pub fn set_destination(&self, destination: &str) -> RegistryResult<()> {
        self.set("destination", destination)
    }

    /// Mount mode, e.g. `rw`
    pub fn mode(&self) -> RegistryResult<String> {
        self.get("mode")
    }

    pub fn set_mode(&self, mode: &str) -> RegistryResult<()> {
        self.set("mode", mode)
    }

    /// Owning node, found by dropping the trailing `disks/{name}`
    pub fn node(&self) -> RegistryResult<Node> {
        let dn = self.record.ancestor(DISKS)?;
        Ok(Node::new(self.record.store().clone(), dn))
    }
}
