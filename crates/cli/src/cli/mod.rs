// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use clap::{Parser, Subcommand, ValueEnum};

pub use args::{FieldArgs, OfflineArgs};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART_HELP: &str = "\
Get started:
  reel init --api-url http://localhost:3000   Initialize in this directory
  reel add \"Heat\" --year 1995                  Add a movie (queued if offline)
  reel list                                    Show movies, cached when offline
  reel pending                                 Show changes waiting to sync
  reel watch                                   Sync automatically on reconnect";

#[derive(Parser)]
#[command(name = "reel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first client for a movie catalog")]
#[command(
    long_about = "Offline-first client for a movie catalog.\n\n\
    Changes made while the server is unreachable are queued locally and replayed \
    in order once the connection returns."
)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Run as if reel was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize reel in the current directory
    Init {
        /// Base URL of the movie API
        #[arg(long)]
        api_url: Option<String>,

        /// Directory to initialize (defaults to the current directory)
        #[arg(long)]
        path: Option<String>,
    },

    /// Add a movie
    Add {
        #[arg(value_parser = non_empty_string)]
        title: String,

        #[command(flatten)]
        fields: FieldArgs,

        #[command(flatten)]
        connectivity: OfflineArgs,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Edit a movie's fields
    #[command(arg_required_else_help = true)]
    Edit {
        /// Movie id
        id: String,

        /// New title
        #[arg(long, short, value_parser = non_empty_string)]
        title: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,

        #[command(flatten)]
        connectivity: OfflineArgs,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Delete a movie
    #[command(arg_required_else_help = true)]
    Delete {
        /// Movie id
        id: String,

        #[command(flatten)]
        connectivity: OfflineArgs,
    },

    /// List movies, falling back to the cached page when offline
    List {
        /// Page number
        #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Only read the local cache
        #[arg(long)]
        cached: bool,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show changes waiting to be synced
    Pending {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Replay queued changes now
    Sync {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Watch connectivity and sync on reconnect until interrupted
    Watch {
        /// Seconds between connectivity probes
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },

    /// Show cache, queue and connectivity status
    Status {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Manage the local cache
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Remove the cached movie list
    Clear {
        /// Also discard changes waiting to be synced
        #[arg(long)]
        pending: bool,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
