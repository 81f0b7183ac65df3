// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replays queued offline mutations once connectivity returns.
//!
//! A pass reads the pending queue once and dispatches every action in FIFO
//! order. Successful actions are removed, failed ones stay queued for the next
//! pass. One failure never stops the batch. If anything went through, the
//! cached list is refetched and replaced wholesale with server state.
//!
//! Only one pass runs at a time per [`Reconciler`]; a trigger that arrives
//! while a pass is in flight returns [`SyncOutcome::AlreadyRunning`].

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::action::{ActionRequest, PendingAction};
use crate::api::{send_request, ApiError, ApiResult, MovieApi};
use crate::breaker::{BreakerConfig, CircuitBreaker};
use crate::movie::Movie;
use crate::network::NetworkMonitor;
use crate::offline::OfflineStorage;
use crate::retry::{retry_async, RetryConfig};

/// Tuning for [`Reconciler`].
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Wait after a reconnect before replaying, so a flapping link settles.
    pub settle_delay: Duration,
    /// Failed actions older than this are evicted instead of kept.
    /// `None` keeps them forever.
    pub max_action_age: Option<Duration>,
    /// Retry policy applied to each dispatched action.
    pub dispatch_retry: RetryConfig<ApiError>,
    pub breaker: BreakerConfig,
    /// Page refetched after a pass when no snapshot is cached.
    pub revalidate_page: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        ReconcileConfig {
            settle_delay: Duration::from_secs(1),
            max_action_age: Some(Duration::from_secs(7 * 24 * 60 * 60)),
            dispatch_retry: RetryConfig::no_retry(),
            breaker: BreakerConfig::default(),
            revalidate_page: 1,
        }
    }
}

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub success: usize,
    /// Failed and kept for the next pass.
    pub failed: usize,
    /// Malformed actions that could never replay.
    pub dropped: usize,
    /// Failed actions past the maximum age.
    pub evicted: usize,
}

impl SyncReport {
    pub fn discarded(&self) -> usize {
        self.dropped + self.evicted
    }
}

/// What a sync trigger ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed(SyncReport),
    AlreadyRunning,
    Offline,
    /// No reconnect edge to act on.
    NotTriggered,
}

impl SyncOutcome {
    pub fn report(&self) -> SyncReport {
        match self {
            SyncOutcome::Completed(report) => *report,
            _ => SyncReport::default(),
        }
    }
}

/// User-facing notices emitted by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    WentOffline,
    BackOnline,
    Started { pending: usize },
    Succeeded { count: usize },
    Failed { count: usize },
    Discarded { count: usize },
    Error { message: String },
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncEvent::WentOffline => write!(f, "You're offline. Changes will be saved locally."),
            SyncEvent::BackOnline => write!(f, "Connection restored! Syncing data..."),
            SyncEvent::Started { pending } => write!(f, "Syncing {pending} offline actions..."),
            SyncEvent::Succeeded { count } => write!(f, "Successfully synced {count} actions"),
            SyncEvent::Failed { count } => {
                write!(f, "Failed to sync {count} actions. Will retry later.")
            }
            SyncEvent::Discarded { count } => {
                write!(f, "Discarded {count} offline actions that can no longer be synced")
            }
            SyncEvent::Error { message } => write!(f, "Failed to sync offline changes: {message}"),
        }
    }
}

/// Sink for [`SyncEvent`]s. Implementations must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: SyncEvent);
}

/// Clears the in-flight flag when a pass ends, however it ends.
struct PassGuard<'a>(&'a AtomicBool);

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drains the offline queue against a [`MovieApi`].
pub struct Reconciler<A: MovieApi> {
    storage: Arc<OfflineStorage>,
    api: A,
    monitor: NetworkMonitor,
    notifier: Arc<dyn Notifier>,
    config: ReconcileConfig,
    breaker: CircuitBreaker,
    in_flight: AtomicBool,
}

impl<A: MovieApi> Reconciler<A> {
    pub fn new(
        storage: Arc<OfflineStorage>,
        api: A,
        monitor: NetworkMonitor,
        notifier: Arc<dyn Notifier>,
        config: ReconcileConfig,
    ) -> Self {
        let breaker = CircuitBreaker::with_clock(config.breaker, Arc::clone(storage.clock()));
        Reconciler { storage, api, monitor, notifier, config, breaker, in_flight: AtomicBool::new(false) }
    }

    pub fn monitor(&self) -> &NetworkMonitor {
        &self.monitor
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Option<PassGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PassGuard(&self.in_flight))
    }

    /// Runs a pass if the monitor reports a reconnect and we are online.
    ///
    /// Waits the settle delay first. If the link dropped again in the
    /// meantime the pass is skipped and the reconnect flag is left set. A
    /// reconnect that lands while the pass runs also leaves the flag set.
    pub async fn run_pass_if_reconnected(&self) -> SyncOutcome {
        let state = self.monitor.state();
        if !(state.reconnected && state.is_online) {
            return SyncOutcome::NotTriggered;
        }
        let Some(_guard) = self.try_begin() else {
            return SyncOutcome::AlreadyRunning;
        };

        tokio::time::sleep(self.config.settle_delay).await;
        if !self.monitor.is_online() {
            tracing::debug!("connection dropped during settle delay, skipping pass");
            return SyncOutcome::Offline;
        }

        let seen = self.monitor.reconnect_count();
        let report = self.drain().await;
        if !self.monitor.clear_reconnected_flag_since(seen) {
            tracing::debug!("reconnected again during pass, keeping flag for another pass");
        }
        SyncOutcome::Completed(report)
    }

    /// Runs a pass now, without waiting for a reconnect edge.
    pub async fn sync_now(&self) -> SyncOutcome {
        if !self.monitor.is_online() {
            return SyncOutcome::Offline;
        }
        let Some(_guard) = self.try_begin() else {
            return SyncOutcome::AlreadyRunning;
        };
        SyncOutcome::Completed(self.drain().await)
    }

    /// Follows the monitor until `shutdown` resolves, replaying the queue on
    /// every reconnect and announcing connectivity changes.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _subscription = self.monitor.subscribe(move |state| {
            let _ = tx.send(state.clone());
        });
        tokio::pin!(shutdown);

        let mut online = self.monitor.is_online();
        self.run_pass_if_reconnected().await;

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                Some(state) = rx.recv() => {
                    if online && state.is_offline {
                        self.notifier.notify(SyncEvent::WentOffline);
                    } else if !online && state.is_online {
                        self.notifier.notify(SyncEvent::BackOnline);
                    }
                    online = state.is_online;
                    if state.reconnected && state.is_online {
                        self.run_pass_if_reconnected().await;
                    }
                }
                else => break,
            }
        }
    }

    async fn dispatch(&self, request: ActionRequest<'_>) -> ApiResult<Option<Movie>> {
        retry_async(
            move || async move {
                self.breaker.call(|| send_request(&self.api, request)).await.map_err(ApiError::from)
            },
            &self.config.dispatch_retry,
        )
        .await
        .into_result()
    }

    fn is_expired(&self, action: &PendingAction, now_ms: u64) -> bool {
        self.config
            .max_action_age
            .is_some_and(|max| action.age_ms(now_ms) > max.as_millis() as u64)
    }

    async fn drain(&self) -> SyncReport {
        let mut report = SyncReport { dropped: self.storage.prune_unreadable(), ..SyncReport::default() };
        let pending = self.storage.list_pending();
        if pending.is_empty() {
            if report.dropped > 0 {
                self.notifier.notify(SyncEvent::Discarded { count: report.dropped });
            }
            return report;
        }

        tracing::info!(pending = pending.len(), "replaying offline actions");
        self.notifier.notify(SyncEvent::Started { pending: pending.len() });

        for action in &pending {
            let request = match action.request() {
                Ok(request) => request,
                Err(e) => {
                    tracing::warn!(id = %action.id, error = %e, "dropping malformed offline action");
                    self.storage.remove(&action.id);
                    report.dropped += 1;
                    continue;
                }
            };

            match self.dispatch(request).await {
                Ok(_) => {
                    tracing::debug!(id = %action.id, kind = %action.kind, "synced offline action");
                    self.storage.remove(&action.id);
                    report.success += 1;
                }
                // Only permanent rejections age out; outages keep the action queued.
                Err(e) if !e.is_connectivity() && self.is_expired(action, self.storage.clock().now_ms()) => {
                    tracing::warn!(id = %action.id, error = %e, "evicting offline action past maximum age");
                    self.storage.remove(&action.id);
                    report.evicted += 1;
                }
                Err(e) => {
                    tracing::warn!(id = %action.id, kind = %action.kind, error = %e, "failed to sync offline action");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            success = report.success,
            failed = report.failed,
            dropped = report.dropped,
            evicted = report.evicted,
            "offline sync pass finished"
        );

        if report.success > 0 {
            let revalidated = self.revalidate().await;
            self.notifier.notify(SyncEvent::Succeeded { count: report.success });
            if let Err(e) = revalidated {
                self.notifier.notify(SyncEvent::Error { message: e.to_string() });
            }
        }
        if report.failed > 0 {
            self.notifier.notify(SyncEvent::Failed { count: report.failed });
        }
        if report.discarded() > 0 {
            self.notifier.notify(SyncEvent::Discarded { count: report.discarded() });
        }
        report
    }

    /// Refetches the cached page and replaces the snapshot with it.
    async fn revalidate(&self) -> ApiResult<()> {
        let page = self.storage.get_snapshot().map_or(self.config.revalidate_page, |s| s.page);
        match self.breaker.call(|| self.api.list(page)).await {
            Ok(fresh) => {
                self.storage.cache_snapshot(fresh);
                Ok(())
            }
            Err(e) => {
                let e = ApiError::from(e);
                tracing::warn!(page, error = %e, "failed to refresh cached movie list");
                Err(e)
            }
        }
    }
}

impl<A: MovieApi> fmt::Debug for Reconciler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
