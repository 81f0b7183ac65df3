// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending mutations recorded while offline.
//!
//! A [`NewAction`] is what a caller asks to queue; the offline store stamps it
//! with an id and timestamp and persists it as a [`PendingAction`]. Pending
//! actions are only ever appended or removed, never edited in place.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::movie::MovieFields;

/// The kind of mutation a pending action replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Create,
    Update,
    Delete,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "CREATE",
            ActionKind::Update => "UPDATE",
            ActionKind::Delete => "DELETE",
        }
    }

    /// UPDATE and DELETE address an existing movie and need its id.
    pub fn requires_movie_id(&self) -> bool {
        !matches!(self, ActionKind::Create)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CREATE" => Ok(ActionKind::Create),
            "UPDATE" => Ok(ActionKind::Update),
            "DELETE" => Ok(ActionKind::Delete),
            _ => Err(Error::InvalidActionType(s.to_string())),
        }
    }
}

/// A resolved remote call, borrowed from an action that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionRequest<'a> {
    Create(&'a MovieFields),
    Update(&'a str, &'a MovieFields),
    Delete(&'a str),
}

fn resolve<'a>(
    kind: ActionKind,
    movie_id: Option<&'a str>,
    data: &'a MovieFields,
) -> Result<ActionRequest<'a>> {
    let target = movie_id.filter(|id| !id.trim().is_empty());
    match (kind, target) {
        (ActionKind::Create, _) => Ok(ActionRequest::Create(data)),
        (ActionKind::Update, Some(id)) => Ok(ActionRequest::Update(id, data)),
        (ActionKind::Delete, Some(id)) => Ok(ActionRequest::Delete(id)),
        (kind, None) => Err(Error::MissingMovieId { kind }),
    }
}

/// A mutation waiting to be queued.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAction {
    pub kind: ActionKind,
    pub data: MovieFields,
    pub movie_id: Option<String>,
}

impl NewAction {
    pub fn create(data: MovieFields) -> Self {
        NewAction { kind: ActionKind::Create, data, movie_id: None }
    }

    pub fn update(movie_id: impl Into<String>, data: MovieFields) -> Self {
        NewAction { kind: ActionKind::Update, data, movie_id: Some(movie_id.into()) }
    }

    pub fn delete(movie_id: impl Into<String>) -> Self {
        NewAction { kind: ActionKind::Delete, data: MovieFields::default(), movie_id: Some(movie_id.into()) }
    }

    /// Resolves the remote call this action stands for.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMovieId`] for UPDATE/DELETE without a target.
    pub fn request(&self) -> Result<ActionRequest<'_>> {
        resolve(self.kind, self.movie_id.as_deref(), &self.data)
    }
}

/// A queued mutation, persisted until replayed or discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default)]
    pub data: MovieFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<String>,
    /// Enqueue time in milliseconds since Unix epoch.
    pub timestamp: u64,
}

impl PendingAction {
    /// Stamps a new action with a fresh id and the given enqueue time.
    pub fn stamp(action: NewAction, now_ms: u64) -> Self {
        PendingAction {
            id: generate_action_id(action.kind, now_ms),
            kind: action.kind,
            data: action.data,
            movie_id: action.movie_id,
            timestamp: now_ms,
        }
    }

    /// Resolves the remote call, or fails if the action can never replay.
    pub fn request(&self) -> Result<ActionRequest<'_>> {
        resolve(self.kind, self.movie_id.as_deref(), &self.data)
    }

    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp)
    }
}

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates `{TYPE}_{timestamp}_{suffix}` with a random base-36 suffix.
pub fn generate_action_id(kind: ActionKind, now_ms: u64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String =
        (0..ID_SUFFIX_LEN).map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char).collect();
    format!("{}_{}_{}", kind, now_ms, suffix)
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
