// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fakes shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::api::{ApiError, ApiFuture, MovieApi, MoviePage};
use crate::error::{Error, Result};
use crate::movie::{Movie, MovieFields};
use crate::reconcile::{Notifier, SyncEvent};
use crate::store::{KeyValueStore, Updater};

pub const PAGE_SIZE: usize = 15;

/// In-memory movie API that records every call as `"VERB target"`.
#[derive(Default)]
pub struct FakeApi {
    movies: Mutex<Vec<Movie>>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, ApiError>>,
    outage: Mutex<Option<ApiError>>,
    latency: Mutex<Duration>,
    next_id: Mutex<u32>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, movie: Movie) {
        self.movies.lock().unwrap().push(movie);
    }

    pub fn movies(&self) -> Vec<Movie> {
        self.movies.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Fails every call labelled `call` (e.g. `"DELETE m2"`) with `err`.
    pub fn fail_call(&self, call: &str, err: ApiError) {
        self.failures.lock().unwrap().insert(call.to_string(), err);
    }

    /// Fails every call with `err` until cleared with `None`.
    pub fn set_outage(&self, err: Option<ApiError>) {
        *self.outage.lock().unwrap() = err;
    }

    /// Makes each call take `latency` of tokio time.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    async fn begin(&self, call: String) -> std::result::Result<(), ApiError> {
        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.calls.lock().unwrap().push(call.clone());
        if let Some(err) = self.outage.lock().unwrap().clone() {
            return Err(err);
        }
        match self.failures.lock().unwrap().get(&call) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::from_status(404, Some("Movie not found.".into()))
    }
}

fn apply(movie: &mut Movie, fields: MovieFields) {
    if let Some(title) = fields.title {
        movie.title = title;
    }
    if fields.year.is_some() {
        movie.year = fields.year;
    }
    if fields.overview.is_some() {
        movie.overview = fields.overview;
    }
    if fields.link.is_some() {
        movie.link = fields.link;
    }
}

impl MovieApi for FakeApi {
    fn create(&self, fields: MovieFields) -> ApiFuture<'_, Movie> {
        Box::pin(async move {
            let title = fields.title.clone().unwrap_or_default();
            self.begin(format!("POST {title}")).await?;
            let id = {
                let mut next = self.next_id.lock().unwrap();
                *next += 1;
                format!("new{}", *next)
            };
            let mut movie = Movie::new(id, "");
            apply(&mut movie, fields);
            self.movies.lock().unwrap().push(movie.clone());
            Ok(movie)
        })
    }

    fn update(&self, id: String, fields: MovieFields) -> ApiFuture<'_, Movie> {
        Box::pin(async move {
            self.begin(format!("PATCH {id}")).await?;
            let mut movies = self.movies.lock().unwrap();
            let movie =
                movies.iter_mut().find(|m| m.server_id() == Some(id.as_str())).ok_or_else(Self::not_found)?;
            apply(movie, fields);
            Ok(movie.clone())
        })
    }

    fn delete(&self, id: String) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.begin(format!("DELETE {id}")).await?;
            let mut movies = self.movies.lock().unwrap();
            let before = movies.len();
            movies.retain(|m| m.server_id() != Some(id.as_str()));
            if movies.len() == before {
                return Err(Self::not_found());
            }
            Ok(())
        })
    }

    fn list(&self, page: u32) -> ApiFuture<'_, MoviePage> {
        Box::pin(async move {
            self.begin(format!("GET page {page}")).await?;
            let movies = self.movies.lock().unwrap();
            let skip = (page.max(1) as usize - 1) * PAGE_SIZE;
            Ok(MoviePage {
                items: movies.iter().skip(skip).take(PAGE_SIZE).cloned().collect(),
                total_count: movies.len() as u64,
                page,
            })
        })
    }
}

/// Notifier that keeps every event for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: SyncEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Store whose every operation fails.
pub struct FailingStore;

fn disk_error() -> Error {
    Error::Io(std::io::Error::other("disk unavailable"))
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(disk_error())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(disk_error())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(disk_error())
    }

    fn update(&self, _key: &str, _f: Updater<'_>) -> Result<()> {
        Err(disk_error())
    }
}
