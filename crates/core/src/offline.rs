// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable offline cache: the pending mutation queue and the last good list.
//!
//! Every operation here is best-effort. Storage failures are logged and the
//! call degrades to "no effect" (or an empty result) so a broken disk never
//! takes the caller down with it. The only hard error is a malformed action
//! handed to [`OfflineStorage::enqueue`], since it could never replay.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::action::{NewAction, PendingAction};
use crate::api::MoviePage;
use crate::clock::{ClockSource, SystemClock};
use crate::error::Result;
use crate::snapshot::CachedSnapshot;
use crate::store::{KeyValueStore, MemoryStore};

pub const SNAPSHOT_KEY: &str = "offline_movies_cache";
pub const PENDING_KEY: &str = "pending_offline_actions";
pub const LAST_SYNC_KEY: &str = "last_sync_timestamp";

/// Summary of what the offline cache currently holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StorageInfo {
    pub cached_movies: usize,
    pub pending_actions: usize,
    pub last_sync: Option<DateTime<Utc>>,
    /// Approximate bytes used by the cache keys.
    pub storage_used: usize,
}

/// Offline queue and snapshot cache over a [`KeyValueStore`].
pub struct OfflineStorage {
    store: Box<dyn KeyValueStore>,
    clock: Arc<dyn ClockSource>,
}

fn best_effort<T>(op: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(op, error = %e, "offline storage operation failed");
            None
        }
    }
}

fn parse_pending(raw: &str) -> Vec<PendingAction> {
    let entries: Vec<Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "pending action list is unreadable, treating as empty");
            return Vec::new();
        }
    };
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<PendingAction>(entry) {
            Ok(action) => Some(action),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable pending action");
                None
            }
        })
        .collect()
}

impl OfflineStorage {
    pub fn new(store: Box<dyn KeyValueStore>, clock: Arc<dyn ClockSource>) -> Self {
        OfflineStorage { store, clock }
    }

    /// Ephemeral storage on the system clock.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    pub fn clock(&self) -> &Arc<dyn ClockSource> {
        &self.clock
    }

    /// Replaces the cached snapshot and records the sync time.
    pub fn cache_snapshot(&self, page: MoviePage) {
        let now = self.clock.now_ms();
        let snapshot = CachedSnapshot::from_page(page, now);
        best_effort("cache_snapshot", self.write_snapshot(&snapshot));
        best_effort("cache_snapshot", self.store.set(LAST_SYNC_KEY, &now.to_string()));
    }

    /// Returns the cached snapshot if present, readable and fresh.
    ///
    /// A stale snapshot is cleared on the way out.
    pub fn get_snapshot(&self) -> Option<CachedSnapshot> {
        let snapshot = self.read_snapshot()?;
        if snapshot.is_stale(self.clock.now_ms()) {
            tracing::debug!(timestamp = snapshot.timestamp, "discarding stale snapshot");
            self.clear_snapshot();
            return None;
        }
        Some(snapshot)
    }

    pub fn clear_snapshot(&self) {
        best_effort("clear_snapshot", self.store.remove(SNAPSHOT_KEY));
        best_effort("clear_snapshot", self.store.remove(LAST_SYNC_KEY));
    }

    /// Drops a movie from the cached list ahead of server confirmation.
    ///
    /// Keeps the snapshot timestamp so freshness still reflects the last fetch.
    /// Returns true if the movie was in the cached page.
    pub fn remove_from_snapshot(&self, movie_id: &str) -> bool {
        let Some(mut snapshot) = self.read_snapshot() else {
            return false;
        };
        if !snapshot.remove_optimistically(movie_id) {
            return false;
        }
        best_effort("remove_from_snapshot", self.write_snapshot(&snapshot)).is_some()
    }

    /// Appends an action to the pending queue.
    ///
    /// Returns the stored action, or `None` if the write failed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MissingMovieId`] for an UPDATE or DELETE
    /// without a target movie.
    pub fn enqueue(&self, action: NewAction) -> Result<Option<PendingAction>> {
        action.request()?;
        let pending = PendingAction::stamp(action, self.clock.now_ms());
        let entry = serde_json::to_value(&pending)?;

        let result = self.store.update(PENDING_KEY, &mut |current| {
            let mut entries: Vec<Value> = match current.as_deref() {
                Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "replacing unreadable pending action list");
                    Vec::new()
                }),
                None => Vec::new(),
            };
            entries.push(entry.clone());
            Ok(Some(serde_json::to_string(&entries)?))
        });

        Ok(best_effort("enqueue", result).map(|()| {
            tracing::debug!(id = %pending.id, kind = %pending.kind, "queued offline action");
            pending
        }))
    }

    /// All pending actions in insertion order.
    pub fn list_pending(&self) -> Vec<PendingAction> {
        best_effort("list_pending", self.store.get(PENDING_KEY))
            .flatten()
            .map(|raw| parse_pending(&raw))
            .unwrap_or_default()
    }

    /// Removes the action with `action_id`; unknown ids are a no-op.
    pub fn remove(&self, action_id: &str) {
        let result = self.store.update(PENDING_KEY, &mut |current| {
            let Some(raw) = current else {
                return Ok(None);
            };
            let Ok(mut entries) = serde_json::from_str::<Vec<Value>>(&raw) else {
                return Ok(Some(raw));
            };
            entries.retain(|entry| entry.get("id").and_then(Value::as_str) != Some(action_id));
            Ok(Some(serde_json::to_string(&entries)?))
        });
        best_effort("remove", result);
    }

    /// Deletes queue entries that no longer parse as actions.
    ///
    /// Returns how many were removed. An unreadable list counts as one.
    pub fn prune_unreadable(&self) -> usize {
        let mut pruned = 0;
        let result = self.store.update(PENDING_KEY, &mut |current| {
            pruned = 0;
            let Some(raw) = current else {
                return Ok(None);
            };
            let Ok(mut entries) = serde_json::from_str::<Vec<Value>>(&raw) else {
                tracing::warn!("discarding unreadable pending action list");
                pruned = 1;
                return Ok(None);
            };
            let before = entries.len();
            entries.retain(|entry| serde_json::from_value::<PendingAction>(entry.clone()).is_ok());
            pruned = before - entries.len();
            if pruned == 0 {
                return Ok(Some(raw));
            }
            Ok(Some(serde_json::to_string(&entries)?))
        });
        match best_effort("prune_unreadable", result) {
            Some(()) if pruned > 0 => {
                tracing::warn!(count = pruned, "dropped unreadable pending actions");
                pruned
            }
            _ => 0,
        }
    }

    /// Empties the pending queue.
    pub fn clear_all(&self) {
        best_effort("clear_all", self.store.remove(PENDING_KEY));
    }

    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        let raw = best_effort("last_sync", self.store.get(LAST_SYNC_KEY)).flatten()?;
        let ms: i64 = raw.trim().parse().ok()?;
        Utc.timestamp_millis_opt(ms).single()
    }

    pub fn storage_info(&self) -> StorageInfo {
        let storage_used = [SNAPSHOT_KEY, PENDING_KEY, LAST_SYNC_KEY]
            .iter()
            .filter_map(|key| best_effort("storage_info", self.store.get(key)).flatten())
            .map(|value| value.len())
            .sum();

        StorageInfo {
            cached_movies: self.get_snapshot().map(|s| s.items.len()).unwrap_or(0),
            pending_actions: self.list_pending().len(),
            last_sync: self.last_sync(),
            storage_used,
        }
    }

    fn read_snapshot(&self) -> Option<CachedSnapshot> {
        let raw = best_effort("read_snapshot", self.store.get(SNAPSHOT_KEY)).flatten()?;
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "cached snapshot is unreadable");
                None
            }
        }
    }

    fn write_snapshot(&self, snapshot: &CachedSnapshot) -> Result<()> {
        let raw = serde_json::to_string(snapshot)?;
        self.store.set(SNAPSHOT_KEY, &raw)
    }
}

#[cfg(test)]
#[path = "offline_tests.rs"]
mod tests;
