// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use crate::config::{init_work_dir, Config, DEFAULT_API_URL};
use crate::env;
use crate::error::Result;

pub fn run(api_url: Option<String>, path: Option<String>) -> Result<()> {
    let target = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };
    let (work_dir, config) = run_impl(&target, api_url)?;
    println!("Initialized reel at {}", work_dir.display());
    println!("API: {}", config.api_url);
    Ok(())
}

/// Creates `.reel/` under `target`. The URL comes from the flag, then
/// `REEL_API_URL`, then the default.
pub(crate) fn run_impl(target: &Path, api_url: Option<String>) -> Result<(PathBuf, Config)> {
    let url = api_url.or_else(env::api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let config = Config::new(&url)?;
    std::fs::create_dir_all(target)?;
    let work_dir = init_work_dir(target, &config)?;
    Ok((work_dir, config))
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
