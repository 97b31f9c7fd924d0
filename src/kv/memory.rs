// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-process key-value backend
//!
//! Keys form a flat keyspace of normalized DNs, like etcd or a NATS KV
//! bucket: a subtree exists as long as at least one key lives at or below
//! it. Used by tests and by tooling that assembles a cluster layout before
//! pushing it to a remote store.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};

use crate::dn::Dn;
use crate::errors::{RegistryError, RegistryResult};
use crate::kv::KvStore;

/// Thread-safe in-memory [`KvStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<Dn, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a nested JSON document
    ///
    /// Objects become subtrees, strings become values, and arrays are stored
    /// as their JSON text (the encoding used for list fields). Numbers and
    /// booleans are stored in their display form; nulls are skipped.
    pub fn from_json(document: &Value) -> RegistryResult<Self> {
        let Value::Object(root) = document else {
            return Err(RegistryError::Serialization(
                "store document root must be an object".to_string(),
            ));
        };

        let mut entries = BTreeMap::new();
        for (key, value) in root {
            load_value(&mut entries, Dn::parse(key)?, value)?;
        }
        debug!("Loaded {} keys into memory store", entries.len());

        Ok(Self {
            entries: RwLock::new(entries),
        })
    }

    /// Every key currently holding a value, in DN order
    pub fn keys(&self) -> RegistryResult<Vec<Dn>> {
        Ok(self.read()?.keys().cloned().collect())
    }

    pub fn len(&self) -> RegistryResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> RegistryResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> RegistryResult<RwLockReadGuard<'_, BTreeMap<Dn, String>>> {
        self.entries
            .read()
            .map_err(|_| RegistryError::Backend("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> RegistryResult<RwLockWriteGuard<'_, BTreeMap<Dn, String>>> {
        self.entries
            .write()
            .map_err(|_| RegistryError::Backend("memory store lock poisoned".to_string()))
    }
}

fn load_value(entries: &mut BTreeMap<Dn, String>, key: Dn, value: &Value) -> RegistryResult<()> {
    match value {
        Value::Object(children) => {
            for (child, value) in children {
                load_value(entries, key.join(child), value)?;
            }
        }
        Value::String(text) => {
            entries.insert(key, text.clone());
        }
        Value::Array(_) => {
            entries.insert(key, serde_json::to_string(value)?);
        }
        Value::Number(number) => {
            entries.insert(key, number.to_string());
        }
        Value::Bool(flag) => {
            entries.insert(key, flag.to_string());
        }
        Value::Null => {}
    }
    Ok(())
}

/// Keys strictly below `key`, in DN order
fn descendants<'a>(
    entries: &'a BTreeMap<Dn, String>,
    key: &'a Dn,
) -> impl Iterator<Item = &'a Dn> + 'a {
    entries
        .range(key.clone()..)
        .map(|(candidate, _)| candidate)
        .take_while(move |candidate| candidate.as_str().starts_with(key.as_str()))
        .filter(move |candidate| *candidate != key && candidate.starts_with(key))
}

impl KvStore for MemoryStore {
    fn get(&self, key: &Dn) -> RegistryResult<String> {
        trace!("get {}", key);
        self.read()?
            .get(key)
            .cloned()
            .ok_or_else(|| RegistryError::KeyNotFound(key.to_string()))
    }

    fn set(&self, key: &Dn, value: &str) -> RegistryResult<()> {
        trace!("set {} = {}", key, value);
        self.write()?.insert(key.clone(), value.to_string());
        Ok(())
    }

    fn recurse(&self, key: &Dn) -> RegistryResult<BTreeSet<Dn>> {
        trace!("recurse {}", key);
        let entries = self.read()?;

        let children: BTreeSet<Dn> = descendants(&entries, key)
            .filter_map(|descendant| descendant.strip_prefix(key))
            .filter_map(|rest| rest.split('/').next())
            .map(|child| key.join(child))
            .collect();

        if children.is_empty() && !entries.contains_key(key) {
            return Err(RegistryError::KeyNotFound(key.to_string()));
        }
        Ok(children)
    }

    fn delete(&self, key: &Dn, recursive: bool) -> RegistryResult<()> {
        let mut entries = self.write()?;
        let below: Vec<Dn> = descendants(&entries, key).cloned().collect();

        if !recursive && !below.is_empty() {
            return Err(RegistryError::UnsupportedOperation(format!(
                "non-recursive delete of '{}' which has {} keys below it",
                key,
                below.len()
            )));
        }

        let removed_self = entries.remove(key).is_some();
        if !removed_self && below.is_empty() {
            return Err(RegistryError::KeyNotFound(key.to_string()));
        }
        for descendant in &below {
            entries.remove(descendant);
        }

        debug!("Deleted {} ({} keys below)", key, below.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dn(s: &str) -> Dn {
        Dn::parse(s).unwrap()
    }

    fn sample() -> MemoryStore {
        MemoryStore::from_json(&json!({
            "clusters": {
                "c1": {
                    "status": "running",
                    "nodes": {
                        "n0": { "status": "pending", "services": ["s0", "s1"] },
                        "n1": { "status": "deployed", "cpu": 4 }
                    }
                },
                "c1x": { "status": "pending" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_from_json_layout() {
        let store = sample();
        assert_eq!(store.get(&dn("clusters/c1/status")).unwrap(), "running");
        assert_eq!(store.get(&dn("clusters/c1/nodes/n1/cpu")).unwrap(), "4");
        assert_eq!(
            store.get(&dn("clusters/c1/nodes/n0/services")).unwrap(),
            r#"["s0","s1"]"#
        );
        assert_eq!(store.len().unwrap(), 6);
    }

    #[test]
    fn test_from_json_rejects_scalar_root() {
        assert!(MemoryStore::from_json(&json!("flat")).is_err());
    }

    #[test]
    fn test_get_missing() {
        let store = sample();
        let err = store.get(&dn("clusters/c1/nodes/n0/mem")).unwrap_err();
        assert_eq!(err, RegistryError::KeyNotFound("clusters/c1/nodes/n0/mem".to_string()));
        // A subtree is not a value
        assert!(store.get(&dn("clusters/c1/nodes")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_overwrites_and_creates() {
        let store = sample();
        store.set(&dn("clusters/c1/status"), "stopped").unwrap();
        store.set(&dn("clusters/c2/nodes/n9/status"), "pending").unwrap();
        assert_eq!(store.get(&dn("clusters/c1/status")).unwrap(), "stopped");
        assert!(store.recurse(&dn("clusters/c2/nodes")).unwrap().contains(&dn("clusters/c2/nodes/n9")));
    }

    #[test]
    fn test_recurse_immediate_children() {
        let store = sample();
        let children = store.recurse(&dn("clusters/c1")).unwrap();
        let expected: BTreeSet<Dn> = [dn("clusters/c1/nodes"), dn("clusters/c1/status")]
            .into_iter()
            .collect();
        assert_eq!(children, expected);
    }

    #[test]
    fn test_recurse_does_not_leak_sibling_prefixes() {
        let store = sample();
        let children = store.recurse(&dn("clusters")).unwrap();
        assert_eq!(children.len(), 2);
        assert!(children.contains(&dn("clusters/c1x")));
    }

    #[test]
    fn test_recurse_missing_and_leaf() {
        let store = sample();
        assert!(store.recurse(&dn("clusters/c9")).unwrap_err().is_not_found());
        assert!(store.recurse(&dn("clusters/c1/status")).unwrap().is_empty());
    }

    #[test]
    fn test_delete_non_recursive() {
        let store = sample();
        let err = store.delete(&dn("clusters/c1/nodes"), false).unwrap_err();
        assert!(matches!(err, RegistryError::UnsupportedOperation(_)));
        assert_eq!(store.len().unwrap(), 6);

        store.delete(&dn("clusters/c1/nodes/n1/cpu"), false).unwrap();
        assert!(store.get(&dn("clusters/c1/nodes/n1/cpu")).is_err());
    }

    #[test]
    fn test_delete_recursive() {
        let store = sample();
        store.delete(&dn("clusters/c1"), true).unwrap();
        assert_eq!(store.keys().unwrap(), vec![dn("clusters/c1x/status")]);
        assert!(store.delete(&dn("clusters/c1"), true).unwrap_err().is_not_found());
    }
}
