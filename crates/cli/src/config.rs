// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.reel/config.toml` and includes:
//! - `api_url`: base URL of the movie API
//! - `token`: optional bearer token
//! - `[sync]`, `[retry]`, `[breaker]`: tuning for offline replay
//!
//! `REEL_API_URL` and `REEL_TOKEN` override the file at load time.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reel_core::{ApiError, BreakerConfig, ReconcileConfig, RetryConfig};
use serde::{Deserialize, Serialize};

use crate::env;
use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".reel";
const CONFIG_FILE_NAME: &str = "config.toml";
const CACHE_DIR_NAME: &str = "cache";
const LOG_FILE_NAME: &str = "reel.log";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Project configuration stored in `.reel/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the movie API, without a trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub breaker: BreakerSettings,
}

/// Offline replay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Wait after a reconnect before replaying (default: 1000).
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Seconds between connectivity probes in `reel watch` (default: 5).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
    /// Failed actions older than this are discarded (default: 168). 0 keeps them forever.
    #[serde(default = "default_max_action_age_hours")]
    pub max_action_age_hours: u64,
    /// Retries per replayed action (default: 0).
    #[serde(default)]
    pub dispatch_retries: u32,
}

/// Backoff for direct API calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakerSettings {
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    #[serde(default = "default_recovery_timeout_secs")]
    pub recovery_timeout_secs: u64,
    #[serde(default = "default_monitoring_period_secs")]
    pub monitoring_period_secs: u64,
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_probe_interval_secs() -> u64 {
    5
}

fn default_max_action_age_hours() -> u64 {
    168
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_jitter_ms() -> u64 {
    1000
}

fn default_failure_threshold() -> u32 {
    5
}

fn default_recovery_timeout_secs() -> u64 {
    30
}

fn default_monitoring_period_secs() -> u64 {
    60
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            settle_delay_ms: default_settle_delay_ms(),
            probe_interval_secs: default_probe_interval_secs(),
            max_action_age_hours: default_max_action_age_hours(),
            dispatch_retries: 0,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        RetrySettings {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter_ms: default_jitter_ms(),
        }
    }
}

impl Default for BreakerSettings {
    fn default() -> Self {
        BreakerSettings {
            failure_threshold: default_failure_threshold(),
            recovery_timeout_secs: default_recovery_timeout_secs(),
            monitoring_period_secs: default_monitoring_period_secs(),
        }
    }
}

/// Checks that `url` is an http(s) URL and strips trailing slashes.
pub fn normalize_api_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let host = trimmed.strip_prefix("http://").or_else(|| trimmed.strip_prefix("https://"));
    match host {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        Some(_) => Err(Error::Config(format!("invalid api_url '{}': missing host", url))),
        None => Err(Error::Config(format!(
            "invalid api_url '{}': must start with http:// or https://",
            url
        ))),
    }
}

impl Config {
    /// Creates a config with default settings for the given API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL is not http(s).
    pub fn new(api_url: &str) -> Result<Self> {
        Ok(Config {
            api_url: normalize_api_url(api_url)?,
            token: None,
            sync: SyncSettings::default(),
            retry: RetrySettings::default(),
            breaker: BreakerSettings::default(),
        })
    }

    /// Loads configuration from the given `.reel/` directory, applying
    /// environment overrides.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(url) = env::api_url() {
            self.api_url = url;
        }
        if let Some(token) = env::token() {
            self.token = Some(token);
        }
        self.api_url = normalize_api_url(&self.api_url)?;
        Ok(())
    }

    /// Saves configuration to the given `.reel/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Backoff policy for direct API calls.
    pub fn retry_config(&self) -> RetryConfig<ApiError> {
        RetryConfig {
            max_retries: self.retry.max_retries,
            base_delay: Duration::from_millis(self.retry.base_delay_ms),
            max_delay: Duration::from_millis(self.retry.max_delay_ms),
            backoff_multiplier: self.retry.backoff_multiplier,
            jitter: Duration::from_millis(self.retry.jitter_ms),
            ..RetryConfig::default()
        }
    }

    pub fn breaker_config(&self) -> BreakerConfig {
        BreakerConfig {
            failure_threshold: self.breaker.failure_threshold,
            recovery_timeout: Duration::from_secs(self.breaker.recovery_timeout_secs),
            monitoring_period: Duration::from_secs(self.breaker.monitoring_period_secs),
        }
    }

    /// Reconciler settings. Replayed actions reuse the direct-call backoff
    /// timings with their own retry budget.
    pub fn reconcile_config(&self) -> ReconcileConfig {
        let dispatch_retry = if self.sync.dispatch_retries == 0 {
            RetryConfig::no_retry()
        } else {
            RetryConfig { max_retries: self.sync.dispatch_retries, ..self.retry_config() }
        };
        ReconcileConfig {
            settle_delay: Duration::from_millis(self.sync.settle_delay_ms),
            max_action_age: match self.sync.max_action_age_hours {
                0 => None,
                hours => Some(Duration::from_secs(hours * 60 * 60)),
            },
            dispatch_retry,
            breaker: self.breaker_config(),
            ..ReconcileConfig::default()
        }
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.sync.probe_interval_secs.max(1))
    }
}

/// Find the .reel directory by walking up from `start`.
pub fn find_work_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Find the .reel directory by walking up from the current directory.
pub fn find_work_dir() -> Result<PathBuf> {
    find_work_dir_from(&std::env::current_dir()?)
}

/// Directory holding the offline cache. `REEL_STATE_DIR` overrides it.
pub fn cache_dir(work_dir: &Path) -> PathBuf {
    env::state_dir().unwrap_or_else(|| work_dir.join(CACHE_DIR_NAME))
}

/// Log file written by `reel watch`.
pub fn log_path(work_dir: &Path) -> PathBuf {
    work_dir.join(LOG_FILE_NAME)
}

/// Initialize a new .reel directory at the given path.
pub fn init_work_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    fs::create_dir_all(work_dir.join(CACHE_DIR_NAME))?;
    config.save(&work_dir)?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Write a .gitignore that keeps local state out of version control.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    let content = "# Offline cache and queued changes\ncache/\n\n# Sync log\nreel.log\n";
    fs::write(work_dir.join(GITIGNORE_FILE_NAME), content)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
