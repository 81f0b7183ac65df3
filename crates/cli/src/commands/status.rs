// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::DateTime;
use reel_core::{ConnectivityProbe, StorageInfo};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;

use super::{format_bytes, relative_time, runtime, Session};

#[derive(Debug, Serialize)]
pub struct Status {
    pub api_url: String,
    pub online: bool,
    #[serde(flatten)]
    pub storage: StorageInfo,
}

pub fn run(output: OutputFormat) -> Result<()> {
    let session = Session::open()?;
    let api = session.api()?;
    let online = runtime()?.block_on(api.check());
    let status = gather(&session, online);
    print_status(&status, session.storage.clock().now_ms(), output)
}

pub fn gather(session: &Session, online: bool) -> Status {
    Status { api_url: session.config.api_url.clone(), online, storage: session.storage.storage_info() }
}

fn print_status(status: &Status, now_ms: u64, output: OutputFormat) -> Result<()> {
    if output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(status)?);
        return Ok(());
    }
    for line in status_lines(status, now_ms) {
        println!("{}", line);
    }
    Ok(())
}

pub fn status_lines(status: &Status, now_ms: u64) -> Vec<String> {
    let info = &status.storage;
    let last_sync = match (info.last_sync, DateTime::from_timestamp_millis(now_ms as i64)) {
        (Some(at), Some(now)) => relative_time(at, now),
        _ => "never".to_string(),
    };
    vec![
        format!("API:        {} ({})", status.api_url, if status.online { "online" } else { "offline" }),
        format!("Cached:     {} movie(s)", info.cached_movies),
        format!("Pending:    {} change(s)", info.pending_actions),
        format!("Last sync:  {}", last_sync),
        format!("Storage:    {}", format_bytes(info.storage_used)),
    ]
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
