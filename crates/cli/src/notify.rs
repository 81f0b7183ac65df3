// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Prints sync notices to stderr.

use reel_core::{Notifier, SyncEvent};

/// Severity prefix shown before a notice.
pub fn prefix(event: &SyncEvent) -> &'static str {
    match event {
        SyncEvent::Succeeded { .. } | SyncEvent::BackOnline | SyncEvent::Started { .. } => "",
        SyncEvent::WentOffline | SyncEvent::Failed { .. } | SyncEvent::Discarded { .. } => "warning: ",
        SyncEvent::Error { .. } => "error: ",
    }
}

/// Writes each [`SyncEvent`] as a single line on stderr.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, event: SyncEvent) {
        tracing::info!(%event, "sync notice");
        eprintln!("{}{}", prefix(&event), event);
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
