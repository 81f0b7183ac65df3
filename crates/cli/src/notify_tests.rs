// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    success = { SyncEvent::Succeeded { count: 2 }, "" },
    started = { SyncEvent::Started { pending: 2 }, "" },
    offline = { SyncEvent::WentOffline, "warning: " },
    failed = { SyncEvent::Failed { count: 1 }, "warning: " },
    error = { SyncEvent::Error { message: "timeout".into() }, "error: " },
)]
fn test_prefix(event: SyncEvent, expected: &str) {
    assert_eq!(prefix(&event), expected);
}
