// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the movie API.
//!
//! Every endpoint wraps its payload in `{ data, message, success, totalData? }`.
//! Non-2xx responses become [`ApiError::Status`] carrying the server's
//! `message` when it sent one.

use std::time::Duration;

use futures_util::future::BoxFuture;
use reel_core::api::ApiFuture;
use reel_core::{ApiError, ApiResult, ConnectivityProbe, Movie, MovieApi, MovieFields, MoviePage};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Response envelope used by every endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    total_data: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Maps a response status and body to the payload envelope.
fn parse_response<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<Envelope<T>> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body).unwrap_or_default().message;
        return Err(ApiError::from_status(status, message));
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn require_data<T>(envelope: Envelope<T>) -> ApiResult<T> {
    envelope.data.ok_or_else(|| {
        ApiError::Decode(envelope.message.unwrap_or_else(|| "response has no data".to_string()))
    })
}

/// Converts a transport failure into the API error taxonomy.
fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

/// [`MovieApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMovieApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpMovieApi {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {}", e)))?;
        Ok(HttpMovieApi { client, base_url: base_url.trim_end_matches('/').to_string(), token })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, config.token.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<Envelope<T>> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        tracing::debug!(status, bytes = body.len(), "api response");
        parse_response(status, &body)
    }
}

impl MovieApi for HttpMovieApi {
    fn create(&self, fields: MovieFields) -> ApiFuture<'_, Movie> {
        Box::pin(async move {
            let envelope = self.send(self.request(Method::POST, "/api/movies").json(&fields)).await?;
            require_data(envelope)
        })
    }

    fn update(&self, id: String, fields: MovieFields) -> ApiFuture<'_, Movie> {
        Box::pin(async move {
            let path = format!("/api/movies/{}", id);
            let envelope = self.send(self.request(Method::PATCH, &path).json(&fields)).await?;
            require_data(envelope)
        })
    }

    fn delete(&self, id: String) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let path = format!("/api/movies/{}", id);
            self.send::<serde_json::Value>(self.request(Method::DELETE, &path)).await?;
            Ok(())
        })
    }

    fn list(&self, page: u32) -> ApiFuture<'_, MoviePage> {
        Box::pin(async move {
            let path = format!("/api/movies?page={}", page);
            let envelope: Envelope<Vec<Movie>> = self.send(self.request(Method::GET, &path)).await?;
            Ok(page_from(envelope, page))
        })
    }
}

/// An empty catalog comes back with `data: []` and no total.
fn page_from(envelope: Envelope<Vec<Movie>>, page: u32) -> MoviePage {
    let items = envelope.data.unwrap_or_default();
    let total_count = envelope.total_data.unwrap_or(items.len() as u64);
    MoviePage { items, total_count, page }
}

impl ConnectivityProbe for HttpMovieApi {
    fn check(&self) -> BoxFuture<'_, bool> {
        Box::pin(async move {
            let result = self.request(Method::HEAD, "/api/health").timeout(PROBE_TIMEOUT).send().await;
            match result {
                // Any answer, even a 404, means the server is reachable.
                Ok(response) => {
                    tracing::trace!(status = response.status().as_u16(), "connectivity probe answered");
                    true
                }
                Err(e) => {
                    tracing::debug!(error = %e, "connectivity probe failed");
                    false
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
