// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions. The variable name constants are generated
//! by `build.rs` and live in the [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Returns `REEL_API_URL` if set and non-empty.
pub fn api_url() -> Option<String> {
    non_empty(vars::REEL_API_URL)
}

/// Returns `REEL_TOKEN` if set and non-empty.
pub fn token() -> Option<String> {
    non_empty(vars::REEL_TOKEN)
}

/// Returns the value of `REEL_STATE_DIR` if set.
pub fn state_dir() -> Option<PathBuf> {
    non_empty(vars::REEL_STATE_DIR).map(PathBuf::from)
}

/// Returns the log filter directive from `REEL_LOG`, if set.
pub fn log_filter() -> Option<String> {
    non_empty(vars::REEL_LOG)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
