// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    missing_update_id = { Error::MissingMovieId { kind: ActionKind::Update }, "UPDATE action requires a movie id" },
    missing_delete_id = { Error::MissingMovieId { kind: ActionKind::Delete }, "DELETE" },
    invalid_type = { Error::InvalidActionType("RENAME".into()), "RENAME" },
    lock = { Error::Lock("busy".into()), "busy" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn error_from_api() {
    let err: Error = ApiError::Timeout.into();
    assert!(matches!(err, Error::Api(ApiError::Timeout)));
}
