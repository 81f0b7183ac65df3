// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestContext;
use futures_util::future::BoxFuture;
use reel_core::{MovieFields, NewAction, SyncEvent};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
struct Recorder(Mutex<Vec<SyncEvent>>);

impl Recorder {
    fn events(&self) -> Vec<SyncEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for Recorder {
    fn notify(&self, event: SyncEvent) {
        self.0.lock().unwrap().push(event);
    }
}

/// Answers probes from a script, repeating the last answer.
struct ScriptedProbe(Mutex<VecDeque<bool>>);

impl ScriptedProbe {
    fn new(answers: &[bool]) -> Self {
        ScriptedProbe(Mutex::new(answers.iter().copied().collect()))
    }
}

impl ConnectivityProbe for ScriptedProbe {
    fn check(&self) -> BoxFuture<'_, bool> {
        let mut answers = self.0.lock().unwrap();
        let answer = if answers.len() > 1 { answers.pop_front().unwrap() } else { answers[0] };
        Box::pin(async move { answer })
    }
}

fn queue_two(ctx: &TestContext) {
    let storage = &ctx.session.storage;
    storage.enqueue(NewAction::create(MovieFields::titled("Brazil"))).unwrap();
    storage.enqueue(NewAction::delete("m1")).unwrap();
}

#[tokio::test]
async fn sync_replays_the_queue() {
    let ctx = TestContext::new();
    queue_two(&ctx);
    let recorder = Arc::new(Recorder::default());

    let outcome = sync_once(&ctx.session, Arc::clone(&ctx.api), true, recorder.clone()).await;

    assert_eq!(outcome.report().success, 2);
    assert!(ctx.session.storage.list_pending().is_empty());
    assert_eq!(ctx.api.titles(), vec!["Ran", "Alien", "Brazil"]);
    assert_eq!(
        recorder.events(),
        vec![SyncEvent::Started { pending: 2 }, SyncEvent::Succeeded { count: 2 }]
    );
}

#[tokio::test]
async fn sync_offline_leaves_queue() {
    let ctx = TestContext::new();
    queue_two(&ctx);

    let outcome = sync_once(&ctx.session, Arc::clone(&ctx.api), false, Arc::new(Recorder::default())).await;

    assert_eq!(outcome, SyncOutcome::Offline);
    assert_eq!(ctx.session.storage.list_pending().len(), 2);
    assert!(ctx.api.calls().is_empty());
}

#[tokio::test]
async fn failed_replays_stay_queued() {
    let ctx = TestContext::new();
    queue_two(&ctx);
    ctx.api.set_offline(true);

    let outcome = sync_once(&ctx.session, Arc::clone(&ctx.api), true, Arc::new(Recorder::default())).await;

    assert_eq!(outcome.report().failed, 2);
    assert_eq!(ctx.session.storage.list_pending().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn watch_syncs_after_reconnect() {
    let ctx = TestContext::new();
    queue_two(&ctx);
    let recorder = Arc::new(Recorder::default());
    let probe = ScriptedProbe::new(&[false, false, true]);

    watch_until(
        &ctx.session,
        Arc::clone(&ctx.api),
        &probe,
        Duration::from_secs(5),
        recorder.clone(),
        tokio::time::sleep(Duration::from_secs(30)),
    )
    .await;

    assert!(ctx.session.storage.list_pending().is_empty());
    let events = recorder.events();
    assert_eq!(events[0], SyncEvent::BackOnline);
    assert!(events.contains(&SyncEvent::Succeeded { count: 2 }));
}

#[tokio::test(start_paused = true)]
async fn watch_syncs_immediately_when_online() {
    let ctx = TestContext::new();
    queue_two(&ctx);
    let probe = ScriptedProbe::new(&[true]);

    watch_until(
        &ctx.session,
        Arc::clone(&ctx.api),
        &probe,
        Duration::from_secs(5),
        Arc::new(Recorder::default()),
        tokio::time::sleep(Duration::from_secs(1)),
    )
    .await;

    assert!(ctx.session.storage.list_pending().is_empty());
}

#[tokio::test(start_paused = true)]
async fn watch_announces_lost_connection() {
    let ctx = TestContext::new();
    let recorder = Arc::new(Recorder::default());
    let probe = ScriptedProbe::new(&[true, false]);

    watch_until(
        &ctx.session,
        Arc::clone(&ctx.api),
        &probe,
        Duration::from_secs(5),
        recorder.clone(),
        tokio::time::sleep(Duration::from_secs(12)),
    )
    .await;

    assert_eq!(recorder.events(), vec![SyncEvent::WentOffline]);
    assert!(ctx.api.calls().is_empty());
}
