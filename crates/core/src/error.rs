// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for reel-core operations.

use thiserror::Error;

use crate::action::ActionKind;
use crate::api::ApiError;

/// All possible errors that can occur in reel-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind} action requires a movie id\n  hint: only CREATE actions may omit the target movie")]
    MissingMovieId { kind: ActionKind },

    #[error("invalid action type: '{0}'\n  hint: valid types are: CREATE, UPDATE, DELETE")]
    InvalidActionType(String),

    #[error("storage lock error: {0}")]
    Lock(String),

    #[error("api error: {0}")]
    Api(#[from] ApiError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for reel-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
