// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::error::Error;
use tempfile::TempDir;

#[test]
fn init_writes_config_and_cache_dir() {
    let temp = TempDir::new().unwrap();
    let (work_dir, config) = run_impl(temp.path(), Some("https://movies.example/".into())).unwrap();

    assert_eq!(work_dir, temp.path().join(".reel"));
    assert_eq!(config.api_url, "https://movies.example");
    assert!(work_dir.join("config.toml").is_file());
    assert!(work_dir.join("cache").is_dir());
    assert!(work_dir.join(".gitignore").is_file());
    assert_eq!(Config::load(&work_dir).unwrap().retry.max_retries, config.retry.max_retries);
}

#[test]
fn init_creates_missing_target() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("nested/project");
    let (work_dir, _) = run_impl(&target, Some("http://localhost:3000".into())).unwrap();
    assert!(work_dir.is_dir());
}

#[test]
fn init_twice_fails() {
    let temp = TempDir::new().unwrap();
    run_impl(temp.path(), Some("http://localhost:3000".into())).unwrap();
    let err = run_impl(temp.path(), Some("http://localhost:3000".into())).unwrap_err();
    assert!(matches!(err, Error::AlreadyInitialized(_)));
}

#[test]
fn init_rejects_bad_url() {
    let temp = TempDir::new().unwrap();
    let err = run_impl(temp.path(), Some("ftp://movies".into())).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(!temp.path().join(".reel").exists());
}
