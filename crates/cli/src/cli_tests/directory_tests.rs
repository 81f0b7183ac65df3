// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use clap::Parser;
use yare::parameterized;

#[parameterized(
    separate = { &["reel", "-C", "/tmp", "pending"] },
    equals = { &["reel", "-C=/tmp", "pending"] },
    no_space = { &["reel", "-C/tmp", "pending"] },
    long = { &["reel", "--directory", "/tmp", "pending"] },
    after_subcommand = { &["reel", "pending", "-C", "/tmp"] },
)]
fn parse_directory_flag(args: &[&str]) {
    let cli = Cli::try_parse_from(args).unwrap();
    assert_eq!(cli.directory, Some("/tmp".to_string()));
}

#[test]
fn directory_is_optional() {
    let cli = Cli::try_parse_from(["reel", "status"]).unwrap();
    assert!(cli.directory.is_none());
}

#[test]
fn init_accepts_api_url() {
    let cli = Cli::try_parse_from(["reel", "init", "--api-url", "http://movies.test"]).unwrap();
    match cli.command {
        Command::Init { api_url, path } => {
            assert_eq!(api_url.as_deref(), Some("http://movies.test"));
            assert!(path.is_none());
        }
        _ => panic!("expected init"),
    }
}
