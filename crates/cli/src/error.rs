// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use reel_core::ApiError;
use thiserror::Error;

/// All possible errors that can occur in the reelrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'reel init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("{field} is required")]
    FieldRequired { field: &'static str },

    #[error("nothing to change\n  hint: pass at least one of --title, --year, --overview, --release-date, --runtime, --image, --link")]
    NoChanges,

    #[error("no cached movies for page {page}\n  hint: run 'reel list' while online to fill the cache")]
    NoCachedData { page: u32 },

    #[error("could not save the change for later sync\n  hint: check that the cache directory is writable")]
    QueueFailed,

    #[error("{0}")]
    Core(#[from] reel_core::Error),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for reelrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
