// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cluster-registry
//!
//! A single cluster laid out the way provisioning tooling writes it: three
//! nodes, two services, disks on two of the nodes. Every test gets a fresh
//! store so mutations never leak between tests.

#![allow(dead_code)]

use cluster_registry::{MemoryStore, Registry, SharedStore};
use serde_json::{json, Value};
use std::sync::Arc;

pub const PREFIX: &str = "clusters";
pub const USER: &str = "user";
pub const PRODUCT: &str = "product";
pub const VERSION: &str = "1.0.0";

/// `clusters/user/product/1.0.0`
pub fn basedn() -> String {
    format!("{}/{}/{}/{}", PREFIX, USER, PRODUCT, VERSION)
}

/// `clusters/user/product/1.0.0/cluster1`
pub fn cluster1() -> String {
    format!("{}/cluster1", basedn())
}

fn disks() -> Value {
    json!({
        "disk1": {
            "origin": "/data/1/instance-jlopez-cdh-5.7.0-1",
            "destination": "/data/1",
            "mode": "rw"
        },
        "disk2": {
            "origin": "/data/2/instance-jlopez-cdh-5.7.0-1",
            "destination": "/data/2",
            "mode": "rw"
        }
    })
}

pub fn master0() -> Value {
    json!({
        "status": "pending",
        "mem": "2048",
        "cpu": "1",
        "name": "master0",
        "id": "",
        "address": "",
        "host": "",
        "services": ["service0", "service1"],
        "disks": disks()
    })
}

pub fn slave0() -> Value {
    json!({
        "status": "pending",
        "mem": "2048",
        "cpu": "1",
        "name": "slave0.local",
        "id": "",
        "address": "",
        "host": "",
        "services": ["service1"],
        "disks": disks()
    })
}

pub fn slave1() -> Value {
    json!({
        "status": "deployed",
        "mem": "2048",
        "cpu": "1",
        "name": "slave1.local",
        "id": "1a2b3c4e",
        "address": "10.112.200.101",
        "host": "c13-1.local",
        "services": ["service1"]
    })
}

pub fn service0() -> Value {
    json!({
        "status": "pending",
        "nodes": ["master0"],
        "heap": "2048",
        "workers": "11"
    })
}

pub fn service1() -> Value {
    json!({
        "status": "pending",
        "nodes": ["slave0", "slave1"],
        "heap": "2048",
        "disks": "11"
    })
}

/// Whole registry document rooted at `clusters/`
pub fn document() -> Value {
    json!({
        PREFIX: { USER: { PRODUCT: { VERSION: {
            "cluster1": {
                "nodes": {
                    "master0": master0(),
                    "slave0": slave0(),
                    "slave1": slave1()
                },
                "services": {
                    "service0": service0(),
                    "service1": service1()
                },
                "status": "running"
            }
        }}}}
    })
}

/// Fresh store seeded with [`document`]
pub fn store() -> SharedStore {
    Arc::new(MemoryStore::from_json(&document()).expect("Invalid registry fixture"))
}

/// Registry over a fresh store, scoped to [`basedn`]
pub fn registry() -> Registry {
    Registry::new(store(), &basedn()).expect("Invalid registry prefix")
}

/// Route tracing output to the test harness when `RUST_LOG` is set
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
