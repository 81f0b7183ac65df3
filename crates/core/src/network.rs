// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity tracking with an edge-triggered reconnect flag.
//!
//! The monitor is fed [`NetworkEvent`]s by whoever can observe the network
//! (a probe loop in the CLI, a test directly) and fans state changes out to
//! subscribers. `reconnected` turns on exactly once per offline→online
//! transition and stays on until [`NetworkMonitor::clear_reconnected_flag`].

use std::sync::{Arc, Mutex, Weak};

use futures_util::future::BoxFuture;
use serde::Serialize;

/// Link quality hints, when the observer can provide them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionQuality {
    /// Estimated bandwidth in Mbit/s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downlink: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_data: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkState {
    pub is_online: bool,
    pub is_offline: bool,
    /// Set while an offline period has been observed and not yet ended.
    pub was_offline: bool,
    /// True after an offline→online transition until explicitly cleared.
    pub reconnected: bool,
    pub quality: ConnectionQuality,
}

impl NetworkState {
    fn initial(online: bool) -> Self {
        NetworkState {
            is_online: online,
            is_offline: !online,
            was_offline: !online,
            reconnected: false,
            quality: ConnectionQuality::default(),
        }
    }
}

/// An observation about connectivity.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    Online,
    Offline,
    /// A connectivity probe failed; treated like going offline.
    ProbeFailed,
    QualityChanged(ConnectionQuality),
}

/// Checks whether the remote side is reachable.
pub trait ConnectivityProbe: Send + Sync {
    fn check(&self) -> BoxFuture<'_, bool>;
}

type Listener = Arc<dyn Fn(&NetworkState) + Send + Sync>;

struct MonitorInner {
    state: NetworkState,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
    reconnects: u64,
}

/// Shared handle to the connectivity state; clones observe the same state.
#[derive(Clone)]
pub struct NetworkMonitor {
    inner: Arc<Mutex<MonitorInner>>,
}

impl NetworkMonitor {
    pub fn new(initially_online: bool) -> Self {
        NetworkMonitor {
            inner: Arc::new(Mutex::new(MonitorInner {
                state: NetworkState::initial(initially_online),
                listeners: Vec::new(),
                next_listener_id: 0,
                reconnects: 0,
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MonitorInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> NetworkState {
        self.lock().state.clone()
    }

    pub fn is_online(&self) -> bool {
        self.lock().state.is_online
    }

    /// Applies an observation. Returns true if the state changed.
    ///
    /// Subscribers run after the state lock is released, so they may call
    /// back into the monitor.
    pub fn handle(&self, event: NetworkEvent) -> bool {
        let (snapshot, listeners) = {
            let mut inner = self.lock();
            let state = &mut inner.state;
            let mut reconnected_now = false;
            let changed = match event {
                NetworkEvent::Online if state.is_online => false,
                NetworkEvent::Online => {
                    state.is_online = true;
                    state.is_offline = false;
                    if state.was_offline {
                        state.reconnected = true;
                        reconnected_now = true;
                    }
                    state.was_offline = false;
                    true
                }
                NetworkEvent::Offline | NetworkEvent::ProbeFailed if state.is_offline => false,
                NetworkEvent::Offline | NetworkEvent::ProbeFailed => {
                    state.is_online = false;
                    state.is_offline = true;
                    state.was_offline = true;
                    true
                }
                NetworkEvent::QualityChanged(quality) => {
                    let changed = state.quality != quality;
                    state.quality = quality;
                    changed
                }
            };
            if !changed {
                return false;
            }
            if reconnected_now {
                inner.reconnects += 1;
            }
            let listeners: Vec<Listener> = inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
            (inner.state.clone(), listeners)
        };

        tracing::debug!(online = snapshot.is_online, reconnected = snapshot.reconnected, "network state changed");
        for listener in listeners {
            listener(&snapshot);
        }
        true
    }

    /// Shorthand for feeding an online/offline observation.
    pub fn set_online(&self, online: bool) -> bool {
        self.handle(if online { NetworkEvent::Online } else { NetworkEvent::Offline })
    }

    /// Number of offline→online transitions seen so far.
    pub fn reconnect_count(&self) -> u64 {
        self.lock().reconnects
    }

    pub fn clear_reconnected_flag(&self) {
        self.clear_reconnected_where(|_| true);
    }

    /// Clears the flag only if no reconnect happened after `seen` was read
    /// from [`NetworkMonitor::reconnect_count`]. Returns false when a newer
    /// reconnect keeps the flag set.
    pub fn clear_reconnected_flag_since(&self, seen: u64) -> bool {
        self.clear_reconnected_where(|inner| inner.reconnects == seen)
    }

    fn clear_reconnected_where(&self, allowed: impl FnOnce(&MonitorInner) -> bool) -> bool {
        let (snapshot, listeners) = {
            let mut inner = self.lock();
            if !inner.state.reconnected {
                return true;
            }
            if !allowed(&inner) {
                return false;
            }
            inner.state.reconnected = false;
            let listeners: Vec<Listener> = inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
            (inner.state.clone(), listeners)
        };
        for listener in listeners {
            listener(&snapshot);
        }
        true
    }

    /// Registers `callback` for every state change until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&self, callback: impl Fn(&NetworkState) + Send + Sync + 'static) -> Subscription {
        let mut inner = self.lock();
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.push((id, Arc::new(callback)));
        Subscription { monitor: Arc::downgrade(&self.inner), id }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().listeners.len()
    }
}

impl std::fmt::Debug for NetworkMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkMonitor").field("state", &self.state()).finish_non_exhaustive()
    }
}

/// Disposer for a monitor callback.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    monitor: Weak<Mutex<MonitorInner>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.monitor.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
#[path = "network_tests.rs"]
mod tests;
