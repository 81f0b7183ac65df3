// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use reel_core::ActionKind;
use yare::parameterized;

#[parameterized(
    not_initialized = { Error::NotInitialized, "reel init" },
    already_initialized = { Error::AlreadyInitialized("/p/.reel".into()), "/p/.reel" },
    config = { Error::Config("bad url".into()), "config error: bad url" },
    field_required = { Error::FieldRequired { field: "Title" }, "Title is required" },
    no_changes = { Error::NoChanges, "hint:" },
    no_cache = { Error::NoCachedData { page: 3 }, "page 3" },
    queue_failed = { Error::QueueFailed, "later sync" },
)]
fn test_error_display(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected), "{err}");
}

#[test]
fn test_api_error_keeps_server_message() {
    let err: Error = ApiError::from_status(404, Some("Movie not found.".into())).into();
    assert_eq!(err.to_string(), "Movie not found. (HTTP 404)");
}

#[test]
fn test_core_error_passes_through() {
    let err: Error = reel_core::Error::MissingMovieId { kind: ActionKind::Delete }.into();
    assert!(err.to_string().starts_with("DELETE action requires a movie id"));
}

#[test]
fn test_from_io() {
    let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(err, Error::Io(_)));
}
