// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Boundary to the remote movie catalog API.
//!
//! The reconciler only needs four calls: create, partial update, delete and
//! list a page. [`MovieApi`] abstracts over the transport so tests can replay
//! against an in-memory fake while the CLI talks HTTP.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::ActionRequest;
use crate::movie::{Movie, MovieFields};

/// Errors returned by the remote API or the transport underneath it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never reached the server (DNS, refused, reset).
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("Circuit breaker is OPEN")]
    CircuitOpen,
}

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Builds a status error, falling back to a stock message for the code.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_message(status).to_string());
        ApiError::Status { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable machine-readable label for the error class.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "NETWORK_ERROR",
            ApiError::Timeout => "TIMEOUT_ERROR",
            ApiError::Decode(_) => "DECODE_ERROR",
            ApiError::CircuitOpen => "CIRCUIT_OPEN",
            ApiError::Status { status, .. } => match status {
                400 => "VALIDATION_ERROR",
                401 => "AUTH_ERROR",
                403 => "PERMISSION_ERROR",
                404 => "NOT_FOUND",
                409 => "CONFLICT_ERROR",
                413 => "PAYLOAD_TOO_LARGE",
                429 => "RATE_LIMIT_ERROR",
                500 => "SERVER_ERROR",
                502 => "BAD_GATEWAY",
                503 => "SERVICE_UNAVAILABLE",
                504 => "GATEWAY_TIMEOUT",
                _ => "UNKNOWN_ERROR",
            },
        }
    }

    /// Transport failures, timeouts, 5xx and 429 are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout => true,
            ApiError::Status { status, .. } => *status >= 500 || *status == 429,
            ApiError::Decode(_) | ApiError::CircuitOpen => false,
        }
    }

    /// True when the failure says nothing about the request itself, only
    /// that the server could not be reached or is refusing everyone.
    pub fn is_connectivity(&self) -> bool {
        self.is_retryable() || matches!(self, ApiError::CircuitOpen)
    }
}

fn default_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request data",
        401 => "Authentication required",
        403 => "Permission denied",
        404 => "Resource not found",
        409 => "Resource conflict",
        413 => "Request payload too large",
        429 => "Too many requests",
        500 => "Internal server error",
        502 => "Bad gateway",
        503 => "Service unavailable",
        504 => "Gateway timeout",
        _ => "An unexpected error occurred",
    }
}

/// One page of the movie list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub items: Vec<Movie>,
    pub total_count: u64,
    pub page: u32,
}

/// Boxed future returned by [`MovieApi`] calls.
pub type ApiFuture<'a, T> = BoxFuture<'a, ApiResult<T>>;

/// The CRUD surface the offline queue replays against.
pub trait MovieApi: Send + Sync {
    /// `POST /api/movies`
    fn create(&self, fields: MovieFields) -> ApiFuture<'_, Movie>;

    /// `PATCH /api/movies/{id}`
    fn update(&self, id: String, fields: MovieFields) -> ApiFuture<'_, Movie>;

    /// `DELETE /api/movies/{id}`
    fn delete(&self, id: String) -> ApiFuture<'_, ()>;

    /// `GET /api/movies?page={page}`
    fn list(&self, page: u32) -> ApiFuture<'_, MoviePage>;
}

impl<T: MovieApi + ?Sized> MovieApi for Arc<T> {
    fn create(&self, fields: MovieFields) -> ApiFuture<'_, Movie> {
        (**self).create(fields)
    }

    fn update(&self, id: String, fields: MovieFields) -> ApiFuture<'_, Movie> {
        (**self).update(id, fields)
    }

    fn delete(&self, id: String) -> ApiFuture<'_, ()> {
        (**self).delete(id)
    }

    fn list(&self, page: u32) -> ApiFuture<'_, MoviePage> {
        (**self).list(page)
    }
}

/// Issues the remote call for a resolved action.
///
/// Returns the movie the server echoed back for create/update, `None` for delete.
pub async fn send_request<A: MovieApi + ?Sized>(
    api: &A,
    request: ActionRequest<'_>,
) -> ApiResult<Option<Movie>> {
    match request {
        ActionRequest::Create(fields) => api.create(fields.clone()).await.map(Some),
        ActionRequest::Update(id, fields) => api.update(id.to_string(), fields.clone()).await.map(Some),
        ActionRequest::Delete(id) => api.delete(id.to_string()).await.map(|()| None),
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
