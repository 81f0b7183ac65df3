// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Nothing listens on the discard port, so connections are refused at once.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:9";

pub fn reel() -> Command {
    let mut cmd = cargo_bin_cmd!("reel");
    cmd.env_remove("REEL_API_URL")
        .env_remove("REEL_TOKEN")
        .env_remove("REEL_STATE_DIR")
        .env_remove("REEL_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create an initialized temp directory pointing at an
/// unreachable API with retries disabled.
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    reel()
        .args(["init", "--api-url", UNREACHABLE_API])
        .current_dir(temp.path())
        .assert()
        .success();

    let config_path = temp.path().join(".reel/config.toml");
    let config = std::fs::read_to_string(&config_path).unwrap();
    std::fs::write(&config_path, config.replace("max_retries = 3", "max_retries = 0")).unwrap();
    temp
}

/// Runs `reel` in `temp` and returns stdout.
pub fn run_ok(temp: &TempDir, args: &[&str]) -> String {
    let output = reel().args(args).current_dir(temp.path()).output().unwrap();
    assert!(output.status.success(), "reel {:?} failed: {}", args, String::from_utf8_lossy(&output.stderr));
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// The queue as reported by `reel pending -o json`.
pub fn pending_json(temp: &TempDir) -> Vec<serde_json::Value> {
    serde_json::from_str(&run_ok(temp, &["pending", "-o", "json"])).unwrap()
}
