// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod cache;
pub mod init;
pub mod list;
pub mod mutate;
pub mod pending;
pub mod status;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use reel_core::{
    retry_async, ApiError, ApiResult, CircuitBreaker, ClockSource, FileStore, MovieApi, MoviePage,
    OfflineStorage, RetryConfig, SystemClock,
};

use crate::config::{cache_dir, find_work_dir, Config};
use crate::error::Result;
use crate::http::HttpMovieApi;

/// Everything a command needs from the project directory.
pub struct Session {
    pub work_dir: PathBuf,
    pub config: Config,
    pub storage: Arc<OfflineStorage>,
}

impl Session {
    /// Opens the project found from the current directory.
    pub fn open() -> Result<Self> {
        let work_dir = find_work_dir()?;
        let config = Config::load(&work_dir)?;
        Self::with_config(work_dir, config, Arc::new(SystemClock))
    }

    pub fn with_config(work_dir: PathBuf, config: Config, clock: Arc<dyn ClockSource>) -> Result<Self> {
        let store = FileStore::open(&cache_dir(&work_dir))?;
        let storage = Arc::new(OfflineStorage::new(Box::new(store), clock));
        Ok(Session { work_dir, config, storage })
    }

    pub fn api(&self) -> Result<HttpMovieApi> {
        HttpMovieApi::from_config(&self.config)
    }

    /// A breaker for this invocation's direct API calls.
    pub fn breaker(&self) -> CircuitBreaker {
        CircuitBreaker::with_clock(self.config.breaker_config(), Arc::clone(self.storage.clock()))
    }
}

/// Builds the single-threaded runtime commands block on.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread().enable_all().build()?)
}

/// Fetches a page through the breaker with backoff.
pub async fn fetch_page<A: MovieApi + ?Sized>(
    api: &A,
    breaker: &CircuitBreaker,
    retry: &RetryConfig<ApiError>,
    page: u32,
) -> ApiResult<MoviePage> {
    retry_async(
        move || async move { breaker.call(|| api.list(page)).await.map_err(ApiError::from) },
        retry,
    )
    .await
    .into_result()
}

/// Formats the time since `then` as a short relative age.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    match secs {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86_399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

/// Human-readable byte count.
pub fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}
