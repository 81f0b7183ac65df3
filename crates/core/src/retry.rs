// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retry with exponential backoff.
//!
//! The delay before retry `n` (1-based) is
//! `min(base_delay * backoff_multiplier^(n-1), max_delay)` plus a random
//! jitter of up to [`RetryConfig::jitter`], so concurrent callers that fail
//! together do not retry together.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::api::ApiError;

/// Errors that know whether another attempt could succeed.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for ApiError {
    fn is_retryable(&self) -> bool {
        ApiError::is_retryable(self)
    }
}

/// Predicate deciding whether an error should be retried.
pub type RetryCondition<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Retry policy for [`retry_async`].
pub struct RetryConfig<E> {
    /// Retries after the first attempt; total attempts are `max_retries + 1`.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Upper bound of the random term added to every delay.
    pub jitter: Duration,
    pub retry_condition: RetryCondition<E>,
}

impl<E> RetryConfig<E> {
    /// Default timings with a custom retry condition.
    pub fn with_condition(condition: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        RetryConfig {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            backoff_multiplier: 2.0,
            jitter: Duration::from_millis(1000),
            retry_condition: Arc::new(condition),
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        RetryConfig { max_retries: 0, ..Self::with_condition(|_| false) }
    }

    /// Pre-jitter delay before retry number `attempt` (1-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let base_ms = self.base_delay.as_millis() as f64;
        let max_ms = self.max_delay.as_millis() as f64;
        let delay_ms = (base_ms * self.backoff_multiplier.powi(exponent)).min(max_ms);
        Duration::from_millis(delay_ms.max(0.0) as u64)
    }

    /// Backoff delay plus random jitter.
    pub fn jittered_delay(&self, attempt: u32) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 { 0 } else { rand::thread_rng().gen_range(0..=jitter_ms) };
        self.backoff_delay(attempt) + Duration::from_millis(jitter)
    }
}

impl<E: Retryable + 'static> Default for RetryConfig<E> {
    fn default() -> Self {
        RetryConfig::with_condition(|e: &E| e.is_retryable())
    }
}

impl<E> Clone for RetryConfig<E> {
    fn clone(&self) -> Self {
        RetryConfig {
            max_retries: self.max_retries,
            base_delay: self.base_delay,
            max_delay: self.max_delay,
            backoff_multiplier: self.backoff_multiplier,
            jitter: self.jitter,
            retry_condition: Arc::clone(&self.retry_condition),
        }
    }
}

impl<E> fmt::Debug for RetryConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("jitter", &self.jitter)
            .finish_non_exhaustive()
    }
}

/// Result of [`retry_async`]: the final result and how many attempts it took.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
}

impl<T, E> RetryOutcome<T, E> {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Runs `operation` until it succeeds, the retry budget is spent, or the
/// retry condition rejects the error.
///
/// Never fails by itself: the last error comes back inside the outcome and
/// the caller decides whether to propagate it.
pub async fn retry_async<T, E, F, Fut>(mut operation: F, config: &RetryConfig<E>) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        match operation().await {
            Ok(value) => return RetryOutcome { result: Ok(value), attempts },
            Err(err) => {
                if attempts > config.max_retries || !(config.retry_condition)(&err) {
                    return RetryOutcome { result: Err(err), attempts };
                }
                let delay = config.jittered_delay(attempts);
                tracing::warn!(
                    attempt = attempts,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "retrying after failure"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Runs `primary`; if it fails and `use_fallback` accepts the error, returns
/// the fallback's value instead.
pub async fn with_fallback<T, E, P, F, Fut>(
    primary: P,
    fallback: F,
    use_fallback: impl Fn(&E) -> bool,
) -> Result<T, E>
where
    P: Future<Output = Result<T, E>>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
    E: fmt::Display,
{
    match primary.await {
        Ok(value) => Ok(value),
        Err(err) if use_fallback(&err) => {
            tracing::warn!(error = %err, "primary operation failed, using fallback");
            Ok(fallback().await)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
