// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Circuit breaker for calls to an unreliable dependency.
//!
//! ```text
//!            threshold failures            recovery timeout
//!   CLOSED ─────────────────────► OPEN ──────────────────► HALF_OPEN
//!     ▲                            ▲                           │
//!     │        trial succeeds      │       trial fails         │
//!     └────────────────────────────┼───────────────────────────┘
//!                                  └───────────────────────────┘
//! ```
//!
//! While OPEN every call is rejected without touching the operation. Once the
//! recovery timeout has passed exactly one trial call is let through.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ApiError;
use crate::clock::{elapsed_ms, ClockSource, SystemClock};

/// State of the circuit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitState {
    /// Calls pass through.
    #[default]
    Closed,
    /// Calls are rejected immediately.
    Open,
    /// A single trial call decides whether to close again.
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "CLOSED"),
            CircuitState::Open => write!(f, "OPEN"),
            CircuitState::HalfOpen => write!(f, "HALF_OPEN"),
        }
    }
}

/// Thresholds for [`CircuitBreaker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerConfig {
    /// Failures within the monitoring period that open the circuit.
    pub failure_threshold: u32,
    /// How long the circuit stays open before a trial call.
    pub recovery_timeout: Duration,
    /// Failures older than this no longer count.
    pub monitoring_period: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        BreakerConfig {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
            monitoring_period: Duration::from_secs(60),
        }
    }
}

/// Error returned by [`CircuitBreaker::call`].
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    #[error("Circuit breaker is OPEN")]
    Open,

    #[error("{0}")]
    Inner(E),
}

impl<E> BreakerError<E> {
    pub fn is_open(&self) -> bool {
        matches!(self, BreakerError::Open)
    }

    pub fn into_inner(self) -> Option<E> {
        match self {
            BreakerError::Open => None,
            BreakerError::Inner(e) => Some(e),
        }
    }
}

impl From<BreakerError<ApiError>> for ApiError {
    fn from(err: BreakerError<ApiError>) -> Self {
        match err {
            BreakerError::Open => ApiError::CircuitOpen,
            BreakerError::Inner(e) => e,
        }
    }
}

#[derive(Debug, Default)]
struct BreakerInner {
    state: CircuitState,
    failure_count: u32,
    last_failure_ms: u64,
    trial_in_flight: bool,
}

/// Releases the half-open trial slot, including when the call is cancelled.
struct TrialGuard<'a>(&'a Mutex<BreakerInner>);

impl Drop for TrialGuard<'_> {
    fn drop(&mut self) {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).trial_in_flight = false;
    }
}

/// Guards an operation with CLOSED/OPEN/HALF_OPEN states.
pub struct CircuitBreaker {
    config: BreakerConfig,
    clock: Arc<dyn ClockSource>,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    /// Creates a breaker on the system clock.
    pub fn new(config: BreakerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: BreakerConfig, clock: Arc<dyn ClockSource>) -> Self {
        CircuitBreaker { config, clock, inner: Mutex::new(BreakerInner::default()) }
    }

    pub fn state(&self) -> CircuitState {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).state
    }

    pub fn failure_count(&self) -> u32 {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).failure_count
    }

    /// Runs `operation` unless the circuit is open.
    pub async fn call<T, E, F, Fut>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let now = self.clock.now_ms();
        self.admit(now)?;
        let _trial = TrialGuard(&self.inner);

        let result = operation().await;

        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match result {
            Ok(value) => {
                if inner.state == CircuitState::HalfOpen {
                    tracing::info!("circuit breaker closed after successful trial");
                }
                inner.state = CircuitState::Closed;
                inner.failure_count = 0;
                Ok(value)
            }
            Err(err) => {
                inner.failure_count = inner.failure_count.saturating_add(1);
                inner.last_failure_ms = now;
                let trip = inner.failure_count >= self.config.failure_threshold
                    || inner.state == CircuitState::HalfOpen;
                if trip && inner.state != CircuitState::Open {
                    tracing::warn!(failures = inner.failure_count, "circuit breaker opened");
                    inner.state = CircuitState::Open;
                }
                Err(BreakerError::Inner(err))
            }
        }
    }

    fn admit<E>(&self, now: u64) -> Result<(), BreakerError<E>> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let since_failure = elapsed_ms(inner.last_failure_ms, now);

        if since_failure > self.config.monitoring_period.as_millis() as u64 {
            inner.failure_count = 0;
        }

        match inner.state {
            CircuitState::Closed => Ok(()),
            CircuitState::Open => {
                if since_failure > self.config.recovery_timeout.as_millis() as u64 {
                    tracing::debug!("circuit breaker half-open, allowing trial call");
                    inner.state = CircuitState::HalfOpen;
                    inner.trial_in_flight = true;
                    Ok(())
                } else {
                    Err(BreakerError::Open)
                }
            }
            CircuitState::HalfOpen => {
                if inner.trial_in_flight {
                    Err(BreakerError::Open)
                } else {
                    inner.trial_in_flight = true;
                    Ok(())
                }
            }
        }
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "breaker_tests.rs"]
mod tests;
