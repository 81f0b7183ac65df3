// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup.
//!
//! The filter comes from `REEL_LOG`, then `RUST_LOG`, then `warn`. One-shot
//! commands log to stderr; `reel watch` appends to `.reel/reel.log` and falls
//! back to stderr if the file cannot be opened.

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::env;

const DEFAULT_FILTER: &str = "warn";

fn filter() -> EnvFilter {
    env::log_filter()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init(log_file: Option<&Path>) {
    let file = log_file.and_then(|path| fs::OpenOptions::new().create(true).append(true).open(path).ok());

    // try_init fails only if a subscriber is already installed
    let _ = match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .try_init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .try_init(),
    };
}
