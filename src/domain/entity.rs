// Copyright (c) 2025 - Cowboy AI, Inc.
//! Entity base: a DN bound to a backend, with table-driven field access
//!
//! Each entity kind declares a static field table. Generic [`Entity::get`]
//! and [`Entity::set`] consult the table before touching the backend, so a
//! write to a read-only field fails without issuing any backend call.
//!
//! Entities are value handles. Equality, ordering and hashing use the DN
//! only; two handles over different backends with the same DN compare equal.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::{debug, trace};

use crate::dn::{self, Dn, SEPARATOR};
use crate::errors::{RegistryError, RegistryResult};
use crate::kv::SharedStore;

/// How a field is backed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Scalar stored at `<dn>/<field>`
    Stored,
    /// JSON string array stored at `<dn>/<field>`
    StoredList,
    /// Last DN segment; never written
    Name,
    /// Computed from other keys (listings, ancestors); never written
    Relation,
}

impl Access {
    pub fn is_writable(self) -> bool {
        matches!(self, Access::Stored | Access::StoredList)
    }
}

/// Entry in an entity kind's field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub access: Access,
}

impl FieldSpec {
    pub const fn new(name: &'static str, access: Access) -> Self {
        Self { name, access }
    }
}

/// DN plus the backend it is resolved against
#[derive(Clone)]
pub struct Record {
    dn: Dn,
    store: SharedStore,
}

impl Record {
    pub fn new(store: SharedStore, dn: Dn) -> Self {
        Self { dn, store }
    }

    pub fn dn(&self) -> &Dn {
        &self.dn
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Read the scalar at `<dn>/<field>`
    pub fn read(&self, field: &str) -> RegistryResult<String> {
        let field = field_segment(field)?;
        trace!("read {}/{}", self.dn, field);
        self.store.get(&self.dn.join(field))
    }

    /// Write the scalar at `<dn>/<field>`
    pub fn write(&self, field: &str, value: &str) -> RegistryResult<()> {
        let field = field_segment(field)?;
        debug!("write {}/{} = {}", self.dn, field, value);
        self.store.set(&self.dn.join(field), value)
    }

    /// Read a list of names stored as a JSON array
    pub fn read_list(&self, field: &str) -> RegistryResult<Vec<String>> {
        let raw = self.read(field)?;
        serde_json::from_str(&raw).map_err(|e| {
            RegistryError::Serialization(format!("{}/{} is not a list of names: {}", self.dn, field, e))
        })
    }

    pub fn write_list<S: AsRef<str>>(&self, field: &str, names: &[S]) -> RegistryResult<()> {
        let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        self.write(field, &serde_json::to_string(&names)?)
    }

    /// Immediate children of `<dn>/<subtree>`; an absent subtree is empty
    pub fn children(&self, subtree: &str) -> RegistryResult<BTreeSet<Dn>> {
        match self.store.recurse(&self.dn.join(subtree)) {
            Ok(children) => Ok(children),
            Err(RegistryError::KeyNotFound(key)) => {
                trace!("no subtree at {}", key);
                Ok(BTreeSet::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Strip a trailing `<landmark>/<name>` pair from the DN
    pub fn ancestor(&self, landmark: &str) -> RegistryResult<Dn> {
        let depth = self.dn.depth();
        let parent = self.dn.parent();
        match parent {
            Some(parent) if depth >= 3 && parent.name() == landmark => parent
                .parent()
                .ok_or_else(|| RegistryError::MalformedDn(self.dn.to_string())),
            _ => Err(RegistryError::MalformedDn(format!(
                "'{}' does not end in {}/<name>",
                self.dn, landmark
            ))),
        }
    }
}

/// A field name must be exactly one DN segment
fn field_segment(field: &str) -> RegistryResult<&str> {
    if field.is_empty() || field.contains(SEPARATOR) {
        return Err(RegistryError::MalformedDn(format!(
            "field '{}' is not a single path segment",
            field
        )));
    }
    Ok(field)
}

/// `<root>/<name>` for a bare entity name read from the backend
pub(crate) fn child_dn(root: &Dn, name: &str) -> RegistryResult<Dn> {
    if name.is_empty() || name.contains(SEPARATOR) {
        return Err(RegistryError::MalformedDn(format!(
            "'{}' is not a single path segment under {}",
            name, root
        )));
    }
    Ok(root.join(name))
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Record").field(&self.dn.as_str()).finish()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.dn == other.dn
    }
}

impl Eq for Record {}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dn.cmp(&other.dn)
    }
}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dn.hash(state);
    }
}

/// Behaviour shared by Cluster, Node, Service and Disk
pub trait Entity: Sized {
    /// Kind name used in error messages
    const KIND: &'static str;

    /// Declared fields; undeclared fields are treated as [`Access::Stored`]
    const FIELDS: &'static [FieldSpec];

    /// Bind a DN to a backend; no backend call is made
    fn new(store: SharedStore, dn: Dn) -> Self;

    fn record(&self) -> &Record;

    fn dn(&self) -> &Dn {
        self.record().dn()
    }

    /// Entity name, the last DN segment
    fn name(&self) -> &str {
        self.dn().name()
    }

    /// Flat id of the entity DN
    fn flat_id(&self) -> RegistryResult<String> {
        dn::id_from(self.dn())
    }

    fn access(field: &str) -> Access {
        Self::FIELDS
            .iter()
            .find(|spec| spec.name == field)
            .map(|spec| spec.access)
            .unwrap_or(Access::Stored)
    }

    /// Read a field as its stored text
    fn get(&self, field: &str) -> RegistryResult<String> {
        let field = field_segment(field)?;
        match Self::access(field) {
            Access::Stored | Access::StoredList => self.record().read(field),
            Access::Name => Ok(self.name().to_string()),
            Access::Relation => Err(RegistryError::UnsupportedOperation(format!(
                "{}.{} is a relation, not a stored value",
                Self::KIND,
                field
            ))),
        }
    }

    /// Write a field, refusing read-only fields before reaching the backend
    fn set(&self, field: &str, value: &str) -> RegistryResult<()> {
        let field = field_segment(field)?;
        if !Self::access(field).is_writable() {
            return Err(RegistryError::ReadOnlyAttribute {
                kind: Self::KIND,
                field: field.to_string(),
            });
        }
        self.record().write(field, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Node;
    use crate::kv::{KvStore, MemoryStore};
    use std::sync::Arc;
    use test_case::test_case;

    fn node() -> (Arc<MemoryStore>, Node) {
        let store = Arc::new(MemoryStore::new());
        let node = Node::new(store.clone(), Dn::parse("clusters/c1/nodes/n0").unwrap());
        (store, node)
    }

    #[test_case("name/" ; "trailing slash")]
    #[test_case("/name" ; "leading slash")]
    #[test_case("disks/" ; "relation with trailing slash")]
    #[test_case("status/extra" ; "nested path")]
    #[test_case("" ; "empty")]
    fn test_set_rejects_non_segment_fields(field: &str) {
        let (store, node) = node();
        assert!(node.set(field, "hijacked").is_err());
        assert!(node.record().write(field, "hijacked").is_err());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_get_rejects_non_segment_fields() {
        let (store, node) = node();
        store
            .set(&Dn::parse("clusters/c1/nodes/n0/name").unwrap(), "stored")
            .unwrap();
        assert_eq!(node.get("name").unwrap(), "n0");
        assert!(matches!(node.get("/name"), Err(RegistryError::MalformedDn(_))));
    }

    #[test]
    fn test_undeclared_field_is_stored() {
        let (store, node) = node();
        assert_eq!(Node::access("rack"), Access::Stored);
        node.set("rack", "r7").unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(node.get("rack").unwrap(), "r7");
    }
}
