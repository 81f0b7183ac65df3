// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;

fn page() -> MoviePage {
    MoviePage { items: vec![Movie::new("m1", "Heat"), Movie::new("m2", "Ran")], total_count: 20, page: 1 }
}

#[test]
fn staleness_boundary() {
    let snap = CachedSnapshot::from_page(page(), 0);
    let just_fresh = SNAPSHOT_MAX_AGE.as_millis() as u64 - 60_000;
    assert!(!snap.is_stale(just_fresh));
    assert!(!snap.is_stale(SNAPSHOT_MAX_AGE.as_millis() as u64));
    assert!(snap.is_stale(SNAPSHOT_MAX_AGE.as_millis() as u64 + 1));
}

#[test]
fn optimistic_removal_updates_total() {
    let mut snap = CachedSnapshot::from_page(page(), 0);
    assert!(snap.remove_optimistically("m1"));
    assert_eq!(snap.items.len(), 1);
    assert_eq!(snap.total_count, 19);
    assert!(snap.optimistic);
}

#[test]
fn optimistic_removal_of_unknown_movie_is_noop() {
    let mut snap = CachedSnapshot::from_page(page(), 0);
    assert!(!snap.remove_optimistically("m404"));
    assert_eq!(snap.total_count, 20);
    assert!(!snap.optimistic);
}

#[test]
fn wire_format_uses_storage_keys() {
    let snap = CachedSnapshot::from_page(page(), 5);
    let value = serde_json::to_value(&snap).unwrap();
    assert_eq!(value["totalData"], 20);
    assert_eq!(value["movies"][0]["_id"], "m1");

    // Snapshots written without the flag decode as confirmed.
    let legacy = json!({ "movies": [], "totalData": 0, "page": 1, "timestamp": 5 });
    let decoded: CachedSnapshot = serde_json::from_value(legacy).unwrap();
    assert!(!decoded.optimistic);
}
