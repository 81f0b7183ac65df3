// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use reel_core::{with_fallback, ActionKind, ApiError, CachedSnapshot, Movie, MovieApi, MoviePage};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::{Error, Result};

use super::{fetch_page, relative_time, runtime, Session};

/// Movies per server page.
const PAGE_SIZE: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Live,
    Cache,
}

/// A page ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub movies: Vec<Movie>,
    pub page: u32,
    pub total: u64,
    pub source: Source,
    /// When the shown data was fetched.
    pub fetched_at: Option<DateTime<Utc>>,
    /// Local changes not yet confirmed by the server.
    pub pending: usize,
}

impl Listing {
    fn from_snapshot(snapshot: CachedSnapshot, source: Source, pending: usize) -> Self {
        Listing {
            fetched_at: DateTime::from_timestamp_millis(snapshot.timestamp as i64),
            movies: snapshot.items,
            page: snapshot.page,
            total: snapshot.total_count,
            source,
            pending,
        }
    }

    pub fn page_count(&self) -> u64 {
        self.total.div_ceil(PAGE_SIZE).max(1)
    }
}

pub fn run(page: u32, cached: bool, output: OutputFormat) -> Result<()> {
    let session = Session::open()?;
    let listing = if cached {
        cached_listing(&session, page)?
    } else {
        let api = session.api()?;
        runtime()?.block_on(load(&session, &api, page))?
    };
    print_listing(&listing, &session, output)
}

/// Fetches `page`, falling back to the cached copy when the server is unreachable.
pub async fn load<A: MovieApi + ?Sized>(session: &Session, api: &A, page: u32) -> Result<Listing> {
    let breaker = session.breaker();
    let retry = session.config.retry_config();
    let live = async {
        let fresh = fetch_page(api, &breaker, &retry, page).await?;
        Ok::<_, ApiError>(Some(store_fresh(session, fresh)))
    };
    let listing = with_fallback(live, || async { cached_listing(session, page).ok() }, ApiError::is_connectivity)
        .await?;
    listing.ok_or(Error::NoCachedData { page })
}

/// The cached page, if it is `page`.
pub fn cached_listing(session: &Session, page: u32) -> Result<Listing> {
    let pending = session.storage.list_pending().len();
    session
        .storage
        .get_snapshot()
        .filter(|snapshot| snapshot.page == page)
        .map(|snapshot| Listing::from_snapshot(snapshot, Source::Cache, pending))
        .ok_or(Error::NoCachedData { page })
}

/// Caches a fresh page with queued deletes already applied.
fn store_fresh(session: &Session, fresh: MoviePage) -> Listing {
    let pending = session.storage.list_pending();
    let now_ms = session.storage.clock().now_ms();

    let mut projected = CachedSnapshot::from_page(fresh.clone(), now_ms);
    session.storage.cache_snapshot(fresh);
    for id in pending.iter().filter(|a| a.kind == ActionKind::Delete).filter_map(|a| a.movie_id.as_deref()) {
        if projected.remove_optimistically(id) {
            session.storage.remove_from_snapshot(id);
        }
    }
    Listing::from_snapshot(projected, Source::Live, pending.len())
}

fn print_listing(listing: &Listing, session: &Session, output: OutputFormat) -> Result<()> {
    if output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(listing)?);
        return Ok(());
    }

    let mut header = format!("Movies, page {} of {} ({} total)", listing.page, listing.page_count(), listing.total);
    if listing.source == Source::Cache {
        let now = DateTime::from_timestamp_millis(session.storage.clock().now_ms() as i64).unwrap_or_else(Utc::now);
        match listing.fetched_at {
            Some(at) => header.push_str(&format!(" [offline, cached {}]", relative_time(at, now))),
            None => header.push_str(" [offline, cached]"),
        }
    }
    println!("{}", header);

    if listing.movies.is_empty() {
        println!("  (no movies)");
    }
    for movie in &listing.movies {
        println!("{}", format_movie_line(movie));
    }
    if listing.pending > 0 {
        println!("\n{} unsynced change(s); run 'reel sync' to push them", listing.pending);
    }
    Ok(())
}

/// Formats a movie as `  {id}  {title} ({year})`.
pub fn format_movie_line(movie: &Movie) -> String {
    let id = movie.server_id().unwrap_or("-");
    match movie.year {
        Some(year) => format!("  {:<12} {} ({})", id, movie.title, year),
        None => format!("  {:<12} {}", id, movie.title),
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
