// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::DateTime;
use reel_core::{ActionKind, PendingAction};

use crate::cli::OutputFormat;
use crate::error::Result;

use super::{relative_time, Session};

pub fn run(output: OutputFormat) -> Result<()> {
    let session = Session::open()?;
    let actions = session.storage.list_pending();
    let now_ms = session.storage.clock().now_ms();

    if output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&actions)?);
        return Ok(());
    }

    if actions.is_empty() {
        println!("Nothing waiting to sync");
        return Ok(());
    }
    println!("{} change(s) waiting to sync:", actions.len());
    for action in &actions {
        println!("{}", format_action_line(action, now_ms));
    }
    Ok(())
}

/// Describes what a queued action will do.
pub fn describe(action: &PendingAction) -> String {
    let target = action.movie_id.as_deref().unwrap_or("?");
    match action.kind {
        ActionKind::Create => format!("add \"{}\"", action.data.title.as_deref().unwrap_or("")),
        ActionKind::Update => match &action.data.title {
            Some(title) => format!("edit {} (title \"{}\")", target, title),
            None => format!("edit {}", target),
        },
        ActionKind::Delete => format!("delete {}", target),
    }
}

pub fn format_action_line(action: &PendingAction, now_ms: u64) -> String {
    let queued = match (
        DateTime::from_timestamp_millis(action.timestamp as i64),
        DateTime::from_timestamp_millis(now_ms as i64),
    ) {
        (Some(then), Some(now)) => relative_time(then, now),
        _ => "unknown".to_string(),
    };
    format!("  {:<6} {}  ({})", action.kind.as_str(), describe(action), queued)
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
