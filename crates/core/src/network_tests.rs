// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

#[test]
fn starts_in_observed_state() {
    let online = NetworkMonitor::new(true).state();
    assert!(online.is_online && !online.is_offline && !online.was_offline);

    let offline = NetworkMonitor::new(false).state();
    assert!(offline.is_offline && offline.was_offline && !offline.reconnected);
}

#[test]
fn reconnect_fires_once_per_transition() {
    let monitor = NetworkMonitor::new(true);
    assert!(!monitor.state().reconnected);

    monitor.set_online(false);
    let state = monitor.state();
    assert!(state.is_offline && state.was_offline && !state.reconnected);

    monitor.set_online(true);
    let state = monitor.state();
    assert!(state.is_online && state.reconnected && !state.was_offline);

    // A repeated online event is not a new edge.
    assert!(!monitor.set_online(true));
    monitor.clear_reconnected_flag();
    assert!(!monitor.set_online(true));
    assert!(!monitor.state().reconnected);
}

#[test]
fn newer_reconnect_keeps_the_flag() {
    let monitor = NetworkMonitor::new(false);
    monitor.set_online(true);
    let seen = monitor.reconnect_count();
    assert_eq!(seen, 1);

    monitor.set_online(false);
    monitor.set_online(true);
    assert_eq!(monitor.reconnect_count(), 2);
    assert!(!monitor.clear_reconnected_flag_since(seen));
    assert!(monitor.state().reconnected);

    assert!(monitor.clear_reconnected_flag_since(2));
    assert!(!monitor.state().reconnected);
}

#[test]
fn reconnected_survives_going_offline_again() {
    let monitor = NetworkMonitor::new(false);
    monitor.set_online(true);
    monitor.handle(NetworkEvent::ProbeFailed);
    let state = monitor.state();
    assert!(state.is_offline && state.reconnected);
}

#[test]
fn quality_changes_do_not_touch_connectivity() {
    let monitor = NetworkMonitor::new(true);
    let quality = ConnectionQuality { downlink: Some(1.5), effective_type: Some("3g".into()), save_data: None };
    assert!(monitor.handle(NetworkEvent::QualityChanged(quality.clone())));
    assert!(!monitor.handle(NetworkEvent::QualityChanged(quality.clone())));

    let state = monitor.state();
    assert_eq!(state.quality, quality);
    assert!(state.is_online && !state.reconnected);
}

#[test]
fn subscribers_see_changes_until_dropped() {
    let monitor = NetworkMonitor::new(true);
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let sub = monitor.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    monitor.set_online(false);
    monitor.set_online(false);
    monitor.set_online(true);
    assert_eq!(seen.load(Ordering::SeqCst), 2);

    sub.unsubscribe();
    assert_eq!(monitor.subscriber_count(), 0);
    monitor.set_online(false);
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn callbacks_may_reenter_the_monitor() {
    let monitor = NetworkMonitor::new(false);
    let handle = monitor.clone();
    let _sub = monitor.subscribe(move |state| {
        if state.reconnected {
            handle.clear_reconnected_flag();
        }
    });

    monitor.set_online(true);
    assert!(!monitor.state().reconnected);
}

#[test]
fn subscription_outliving_monitor_is_harmless() {
    let monitor = NetworkMonitor::new(true);
    let sub = monitor.subscribe(|_| {});
    drop(monitor);
    drop(sub);
}
