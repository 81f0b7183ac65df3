// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::Result;

use super::Session;

pub fn clear(pending: bool) -> Result<()> {
    let session = Session::open()?;
    let (movies, actions) = clear_impl(&session, pending);
    println!("Removed {} cached movie(s)", movies);
    if pending {
        println!("Discarded {} unsynced change(s)", actions);
    }
    Ok(())
}

/// Drops the cached page, and the queue too when `pending`.
///
/// Returns how many movies and actions were removed.
pub(crate) fn clear_impl(session: &Session, pending: bool) -> (usize, usize) {
    let info = session.storage.storage_info();
    session.storage.clear_snapshot();
    if !pending {
        return (info.cached_movies, 0);
    }
    session.storage.clear_all();
    (info.cached_movies, info.pending_actions)
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
