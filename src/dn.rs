// Copyright (c) 2025 - Cowboy AI, Inc.
//! Distinguished names and the flat-id codec
//!
//! Every registry key is addressed by a slash-delimited distinguished name
//! (DN). Two layouts are recognized for the cluster root:
//!
//! ```text
//! clusters/{user}/{product}/{version}/{cluster}/...
//! instances/{product}/{version}/{id}/...            (or with a user segment)
//! ```
//!
//! Below the root, the structural landmarks `nodes/`, `services/` and
//! `disks/` locate child entities regardless of how many segments follow.
//!
//! # Flat ids
//!
//! A DN is encoded into a single token by replacing `.` with `__` and `/`
//! with `--`. Decoding reverses the two substitutions. The round trip is
//! lossless only when no segment contains `--` or `__` and no `-`, `_` or `.`
//! touches a boundary that would merge into one of those pairs; such DNs are
//! rejected by [`id_from`] with [`RegistryError::AmbiguousId`].
//!
//! ```rust
//! use cluster_registry::dn::{dn_from, id_from};
//!
//! let id = id_from("instances/cdh/5.7.0/1/nodes/node0").unwrap();
//! assert_eq!(id, "instances--cdh--5__7__0--1--nodes--node0");
//! assert_eq!(dn_from(&id).unwrap().as_str(), "instances/cdh/5.7.0/1/nodes/node0");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{RegistryError, RegistryResult};

/// Hierarchy separator inside a DN
pub const SEPARATOR: char = '/';

/// Flat-id replacement for [`SEPARATOR`]
pub const ID_SEPARATOR: &str = "--";

/// Flat-id replacement for a literal dot
pub const ID_DOT: &str = "__";

/// Landmark segment holding a cluster's nodes
pub const NODES: &str = "nodes";

/// Landmark segment holding a cluster's services
pub const SERVICES: &str = "services";

/// Landmark segment holding a node's disks
pub const DISKS: &str = "disks";

/// Normalized distinguished name
///
/// Leading, trailing and repeated separators are removed on construction,
/// so equality, ordering and hashing all operate on the segment sequence.
/// A DN is never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dn(String);

impl Dn {
    /// Parse and normalize a DN
    pub fn parse(dn: &str) -> RegistryResult<Self> {
        let normalized = normalize(dn);
        if normalized.is_empty() {
            return Err(RegistryError::MalformedDn(format!(
                "'{}' has no path segments",
                dn
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments from the root down
    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.split(SEPARATOR)
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Last segment
    pub fn name(&self) -> &str {
        self.0.rsplit(SEPARATOR).next().unwrap_or(&self.0)
    }

    /// Append one or more segments; an empty child leaves the DN unchanged
    pub fn join(&self, child: &str) -> Dn {
        let child = normalize(child);
        if child.is_empty() {
            return self.clone();
        }
        Dn(format!("{}{}{}", self.0, SEPARATOR, child))
    }

    /// DN with the last segment removed, `None` at the root
    pub fn parent(&self) -> Option<Dn> {
        self.0
            .rsplit_once(SEPARATOR)
            .map(|(parent, _)| Dn(parent.to_string()))
    }

    /// First `depth` segments; `None` when `depth` is zero or exceeds the DN
    pub fn truncate(&self, depth: usize) -> Option<Dn> {
        if depth == 0 || depth > self.depth() {
            return None;
        }
        let prefix: Vec<&str> = self.segments().take(depth).collect();
        Some(Dn(prefix.join("/")))
    }

    /// Segment-wise prefix test (`a/b` is a prefix of `a/b/c`, not of `a/bc`)
    pub fn starts_with(&self, prefix: &Dn) -> bool {
        self.0 == prefix.0
            || (self.0.starts_with(&prefix.0)
                && self.0[prefix.0.len()..].starts_with(SEPARATOR))
    }

    /// Segment-wise suffix after `prefix`, if `prefix` is a proper prefix
    pub fn strip_prefix(&self, prefix: &Dn) -> Option<&str> {
        self.0
            .strip_prefix(&prefix.0)
            .and_then(|rest| rest.strip_prefix(SEPARATOR))
    }
}

fn normalize(dn: &str) -> String {
    dn.split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

impl fmt::Display for Dn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Dn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Dn {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Dn {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Dn {
    type Error = RegistryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Dn> for String {
    fn from(dn: Dn) -> Self {
        dn.0
    }
}

/// Recognized cluster-root layouts, selected by the leading segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnShape {
    /// `clusters/{user}/{product}/{version}/{cluster}`
    Cluster,
    /// `instances/[{user}/]{product}/{version}/{id}` with a numeric id
    Instance,
}

impl DnShape {
    pub fn detect(dn: &Dn) -> Option<Self> {
        match dn.segments().next() {
            Some("clusters") => Some(DnShape::Cluster),
            Some("instances") => Some(DnShape::Instance),
            _ => None,
        }
    }

    /// Minimum number of segments in a cluster root of this shape
    pub fn root_depth(self) -> usize {
        match self {
            DnShape::Cluster => 5,
            DnShape::Instance => 4,
        }
    }
}

impl fmt::Display for DnShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnShape::Cluster => write!(f, "clusters"),
            DnShape::Instance => write!(f, "instances"),
        }
    }
}

/// Encode a DN as a flat id
pub fn id_from(dn: impl AsRef<str>) -> RegistryResult<String> {
    let dn = Dn::parse(dn.as_ref())?;
    let id = dn
        .as_str()
        .replace('.', ID_DOT)
        .replace(SEPARATOR, ID_SEPARATOR);

    if decode(&id) != dn.as_str() {
        return Err(RegistryError::AmbiguousId(dn.into()));
    }
    Ok(id)
}

/// Decode a flat id back into its DN
pub fn dn_from(id: &str) -> RegistryResult<Dn> {
    Dn::parse(&decode(id))
}

fn decode(id: &str) -> String {
    id.replace(ID_SEPARATOR, "/").replace(ID_DOT, ".")
}

/// Last segment of a DN
pub fn parse_name(dn: &str) -> RegistryResult<String> {
    Ok(Dn::parse(dn)?.name().to_string())
}

/// Truncate any DN inside a cluster down to the cluster root
///
/// - [`DnShape::Cluster`]: the first five segments, whatever follows.
/// - [`DnShape::Instance`]: up to and including the first numeric segment at
///   or past the fourth, which must come before any `nodes`/`services`
///   landmark.
/// - Any other layout: everything before the first landmark.
pub fn parse_cluster_dn(dn: &str) -> RegistryResult<Dn> {
    let dn = Dn::parse(dn)?;
    let root_depth = match DnShape::detect(&dn) {
        Some(DnShape::Cluster) => Some(DnShape::Cluster.root_depth()),
        Some(DnShape::Instance) => instance_root_depth(&dn),
        None => dn.segments().position(is_landmark).filter(|&depth| depth > 0),
    };

    root_depth
        .and_then(|depth| dn.truncate(depth))
        .ok_or_else(|| RegistryError::MalformedDn(format!("'{}' has no cluster root", dn)))
}

fn is_landmark(segment: &str) -> bool {
    segment == NODES || segment == SERVICES
}

fn instance_root_depth(dn: &Dn) -> Option<usize> {
    let min_index = DnShape::Instance.root_depth() - 1;
    dn.segments()
        .enumerate()
        .skip(min_index)
        .take_while(|(_, segment)| !is_landmark(segment))
        .find(|(_, segment)| segment.parse::<u64>().is_ok())
        .map(|(index, _)| index + 1)
}

/// Truncate a DN at the disk entity, dropping any trailing field segments
pub fn parse_disk_dn(dn: &str) -> RegistryResult<Dn> {
    let dn = Dn::parse(dn)?;
    let segments: Vec<&str> = dn.segments().collect();

    let disk_depth = (2..segments.len().saturating_sub(1))
        .find(|&i| segments[i] == DISKS && segments[i - 2] == NODES)
        .map(|i| i + 2);

    disk_depth
        .and_then(|depth| dn.truncate(depth))
        .ok_or_else(|| {
            RegistryError::MalformedDn(format!("'{}' has no nodes/<node>/disks/<disk> path", dn))
        })
}

/// Extract the numeric instance id following `prefix` in `route`
pub fn parse_instance_id(route: &str, prefix: &str) -> RegistryResult<u64> {
    let route_dn = Dn::parse(route)?;
    let prefix_dn = Dn::parse(prefix)?;

    let rest = route_dn.strip_prefix(&prefix_dn).ok_or_else(|| {
        RegistryError::MalformedDn(format!("'{}' is not below '{}'", route_dn, prefix_dn))
    })?;

    let segment = rest.split(SEPARATOR).next().unwrap_or(rest);
    segment
        .parse::<u64>()
        .map_err(|_| RegistryError::InvalidInstanceId {
            route: route_dn.to_string(),
            segment: segment.to_string(),
        })
}
