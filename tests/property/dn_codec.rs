// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the DN codec
//!
//! Segments are drawn from the alphabet provisioning tooling actually uses:
//! lowercase alphanumerics joined by single `-`, `_` or `.` characters.

use cluster_registry::dn::{dn_from, id_from, parse_cluster_dn, parse_name, Dn};
use cluster_registry::RegistryError;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,6}([-_.][a-z0-9]{1,6}){0,3}"
}

fn dn_string() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..8).prop_map(|segments| segments.join("/"))
}

/// Any printable DN-ish text, including separators in odd places
fn loose_string() -> impl Strategy<Value = String> {
    "[a-z0-9./_-]{1,40}"
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_flat_id_round_trips(dn in dn_string()) {
        let id = id_from(&dn).unwrap();
        prop_assert!(!id.contains('/'), "Flat id must not contain separators: {}", id);
        prop_assert!(!id.contains('.'), "Flat id must not contain dots: {}", id);
        let decoded = dn_from(&id).unwrap();
        prop_assert_eq!(decoded.as_str(), dn.as_str());
    }

    #[test]
    fn prop_id_from_round_trips_or_rejects(raw in loose_string()) {
        match id_from(&raw) {
            Ok(id) => {
                let normalized = Dn::parse(&raw).unwrap();
                prop_assert_eq!(dn_from(&id).unwrap(), normalized);
            }
            Err(RegistryError::AmbiguousId(_)) | Err(RegistryError::MalformedDn(_)) => {}
            Err(other) => prop_assert!(false, "Unexpected error: {}", other),
        }
    }

    #[test]
    fn prop_normalization_is_idempotent(raw in loose_string()) {
        if let Ok(dn) = Dn::parse(&raw) {
            let again = Dn::parse(dn.as_str()).unwrap();
            prop_assert_eq!(&again, &dn);
            prop_assert!(!dn.as_str().starts_with('/'));
            prop_assert!(!dn.as_str().ends_with('/'));
            prop_assert!(!dn.as_str().contains("//"));
        }
    }

    #[test]
    fn prop_outer_slashes_do_not_change_identity(dn in dn_string()) {
        let padded = format!("/{}/", dn);
        prop_assert_eq!(Dn::parse(&padded).unwrap(), Dn::parse(&dn).unwrap());
        prop_assert_eq!(id_from(&padded).unwrap(), id_from(&dn).unwrap());
    }

    #[test]
    fn prop_name_is_last_segment(dn in dn_string()) {
        let expected = dn.rsplit('/').next().unwrap().to_string();
        prop_assert_eq!(parse_name(&dn).unwrap(), expected);
    }

    #[test]
    fn prop_cluster_root_is_stable(
        head in prop::collection::vec(segment(), 4),
        node in segment(),
        field in segment(),
    ) {
        let root = format!("clusters/{}", head.join("/"));
        let deep = format!("{}/nodes/{}/{}", root, node, field);

        let parsed = parse_cluster_dn(&deep).unwrap();
        prop_assert_eq!(parsed.as_str(), root.as_str());
        prop_assert_eq!(parse_cluster_dn(parsed.as_str()).unwrap(), parsed);
    }

    #[test]
    fn prop_cluster_root_survives_trailing_fields(
        head in prop::collection::vec(segment(), 4),
        fields in prop::collection::vec(segment(), 0..4),
    ) {
        let root = format!("clusters/{}", head.join("/"));
        let dn = std::iter::once(root.clone()).chain(fields).collect::<Vec<_>>().join("/");
        let parsed = parse_cluster_dn(&dn).unwrap();
        prop_assert_eq!(parsed.as_str(), root.as_str());
    }

    #[test]
    fn prop_instance_root_survives_trailing_fields(
        product in "[a-z]{1,6}",
        id in any::<u64>(),
        field in "[a-z]{1,6}",
    ) {
        let root = format!("instances/user/{}/5.7.0/{}", product, id);
        let dn = format!("{}/{}", root, field);
        let parsed = parse_cluster_dn(&dn).unwrap();
        prop_assert_eq!(parsed.as_str(), root.as_str());
    }
}
