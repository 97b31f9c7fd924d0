// Copyright (c) 2025 - Cowboy AI, Inc.
//! Registry Domain Models
//!
//! Typed handles over the registry tree. Every handle is a DN plus the
//! backend it reads from; construction never touches the backend.
//!
//! # Layout
//!
//! ```text
//! {cluster}/status
//! {cluster}/nodes/{node}/{status,mem,cpu,id,address,host,services}
//! {cluster}/nodes/{node}/disks/{disk}/{origin,destination,mode}
//! {cluster}/services/{service}/{status,heap,workers,disks,nodes}
//! ```
//!
//! # Entities
//!
//! - [`Cluster`] - lists its nodes and services
//! - [`Node`] - resolves its services, disks and owning cluster
//! - [`Service`] - resolves its nodes and owning cluster
//! - [`Disk`] - mount description, resolves its owning node
//!
//! Collections come back as `BTreeSet`s ordered by DN. Nothing is cached:
//! each accessor re-reads the backend.

pub mod cluster;
pub mod disk;
pub mod entity;
pub mod node;
pub mod service;

pub use cluster::Cluster;
pub use disk::Disk;
pub use entity::{Access, Entity, FieldSpec, Record};
pub use node::Node;
pub use service::Service;
