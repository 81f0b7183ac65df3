// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Tests for command routing that need no project directory.
//!
//! Commands that touch `.reel/` are covered by the integration tests that
//! run the binary.

use super::*;

#[test]
fn edit_without_fields_is_rejected_before_io() {
    let cmd = Command::Edit {
        id: "m1".to_string(),
        title: None,
        fields: FieldArgs::default(),
        connectivity: OfflineArgs::default(),
        output: OutputFormat::Text,
    };
    assert!(matches!(dispatch(cmd), Err(Error::NoChanges)));
}

#[test]
fn command_enum_is_exported() {
    let cmd = Command::Cache(CacheCommand::Clear { pending: true });
    let Command::Cache(CacheCommand::Clear { pending }) = cmd else {
        panic!("Expected cache clear command");
    };
    assert!(pending);
}
