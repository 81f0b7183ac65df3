// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! reelrs - the library behind the `reel` CLI.
//!
//! `reel` talks to a movie catalog API and keeps working when the API is
//! unreachable: lists fall back to a cached page and mutations are queued
//! locally, to be replayed in order by `reel sync` or `reel watch`.
//!
//! # Main Components
//!
//! - [`Config`] - Project configuration stored in `.reel/config.toml`
//! - [`http::HttpMovieApi`] - HTTP transport for the catalog API
//! - [`Error`] - Error types for all commands
//!
//! Queueing, caching and reconciliation live in `reel_core`.

mod cli;
mod commands;
mod env;
mod logging;
mod notify;

pub mod config;
pub mod error;
pub mod http;

pub use cli::{CacheCommand, Cli, Command, FieldArgs, OfflineArgs, OutputFormat};
pub use config::{find_work_dir, init_work_dir, Config};
pub use error::{Error, Result};

use commands::{cache, init, list, mutate, pending, status, sync};

/// Runs a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)?;
    }
    // watch installs its own file logger
    if !matches!(cli.command, Command::Watch { .. }) {
        logging::init(None);
    }
    dispatch(cli.command)
}

fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Init { api_url, path } => init::run(api_url, path),
        Command::Add { title, fields, connectivity, output } => mutate::add(title, fields, connectivity, output),
        Command::Edit { id, title, fields, connectivity, output } => {
            mutate::edit(id, title, fields, connectivity, output)
        }
        Command::Delete { id, connectivity } => mutate::delete(id, connectivity),
        Command::List { page, cached, output } => list::run(page, cached, output),
        Command::Pending { output } => pending::run(output),
        Command::Sync { output } => sync::run(output),
        Command::Watch { interval } => sync::watch(interval),
        Command::Status { output } => status::run(output),
        Command::Cache(CacheCommand::Clear { pending }) => cache::clear(pending),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
