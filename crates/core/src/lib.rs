// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! reel-core: Offline-first sync engine for the reel movie catalog
//!
//! This crate provides the durable offline queue, the cached list snapshot,
//! connectivity tracking, and the reconciler that replays queued mutations
//! against the remote movie API once the network returns. It also hosts the
//! retry/backoff and circuit breaker utilities used by every network call.

pub mod action;
pub mod api;
pub mod breaker;
pub mod clock;
pub mod error;
pub mod movie;
pub mod network;
pub mod offline;
pub mod reconcile;
pub mod retry;
pub mod snapshot;
pub mod store;

#[cfg(test)]
mod test_support;

pub use action::{ActionKind, ActionRequest, NewAction, PendingAction};
pub use api::{ApiError, ApiResult, MovieApi, MoviePage};
pub use breaker::{BreakerConfig, BreakerError, CircuitBreaker, CircuitState};
pub use clock::{ClockSource, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use movie::{Movie, MovieFields};
pub use network::{ConnectionQuality, ConnectivityProbe, NetworkEvent, NetworkMonitor, NetworkState, Subscription};
pub use offline::{OfflineStorage, StorageInfo};
pub use reconcile::{Notifier, ReconcileConfig, Reconciler, SyncEvent, SyncOutcome, SyncReport};
pub use retry::{retry_async, with_fallback, RetryConfig, RetryOutcome, Retryable};
pub use snapshot::CachedSnapshot;
pub use store::{FileStore, KeyValueStore, MemoryStore};
