// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cached copy of the last page fetched from the server.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::MoviePage;
use crate::movie::Movie;

/// Snapshots older than this are discarded instead of served.
pub const SNAPSHOT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// The last good page of movies, kept for offline display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedSnapshot {
    #[serde(rename = "movies")]
    pub items: Vec<Movie>,
    #[serde(rename = "totalData")]
    pub total_count: u64,
    pub page: u32,
    /// Creation time in milliseconds since Unix epoch.
    pub timestamp: u64,
    /// Set once unconfirmed local changes have been projected onto the page.
    #[serde(default)]
    pub optimistic: bool,
}

impl CachedSnapshot {
    pub fn from_page(page: MoviePage, now_ms: u64) -> Self {
        CachedSnapshot {
            items: page.items,
            total_count: page.total_count,
            page: page.page,
            timestamp: now_ms,
            optimistic: false,
        }
    }

    pub fn age(&self, now_ms: u64) -> Duration {
        Duration::from_millis(now_ms.saturating_sub(self.timestamp))
    }

    pub fn is_stale(&self, now_ms: u64) -> bool {
        self.age(now_ms) > SNAPSHOT_MAX_AGE
    }

    /// Removes a movie ahead of server confirmation.
    ///
    /// Returns true if the movie was on this page; the total only drops then.
    pub fn remove_optimistically(&mut self, movie_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|m| m.server_id() != Some(movie_id));
        let removed = before - self.items.len();
        if removed == 0 {
            return false;
        }
        self.total_count = self.total_count.saturating_sub(removed as u64);
        self.optimistic = true;
        true
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
