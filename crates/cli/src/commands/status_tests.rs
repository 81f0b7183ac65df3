// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::{TestContext, NOW_MS};
use reel_core::{MovieApi, NewAction};

#[tokio::test]
async fn status_reports_cache_and_queue() {
    let ctx = TestContext::new();
    ctx.session.storage.cache_snapshot(ctx.api.list(1).await.unwrap());
    ctx.session.storage.enqueue(NewAction::delete("m1")).unwrap();

    let status = gather(&ctx.session, false);

    assert_eq!(status.api_url, "http://movies.test");
    assert_eq!(status.storage.cached_movies, 3);
    assert_eq!(status.storage.pending_actions, 1);
    assert_eq!(status.storage.last_sync.unwrap().timestamp_millis() as u64, NOW_MS);
    assert!(status.storage.storage_used > 0);

    let lines = status_lines(&status, NOW_MS);
    assert!(lines[0].ends_with("(offline)"));
    assert!(lines[3].ends_with("just now"));
}

#[test]
fn empty_status_has_never_synced() {
    let ctx = TestContext::new();
    let status = gather(&ctx.session, true);
    let lines = status_lines(&status, NOW_MS);
    assert!(lines[0].ends_with("(online)"));
    assert!(lines[3].ends_with("never"));

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["online"], true);
    assert_eq!(json["pending_actions"], 0);
}
