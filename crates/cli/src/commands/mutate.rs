// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `add`, `edit` and `delete`.
//!
//! Each mutation goes to the server first. When the server is unreachable
//! the change is queued for the next sync instead, and a queued delete is
//! applied to the cached list right away.

use reel_core::api::send_request;
use reel_core::{retry_async, ActionKind, ApiError, Movie, MovieApi, NewAction, PendingAction};
use serde::Serialize;

use crate::cli::{FieldArgs, OfflineArgs, OutputFormat};
use crate::error::{Error, Result};

use super::{fetch_page, runtime, Session};

/// What happened to a submitted change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Applied {
        #[serde(rename = "type")]
        kind: ActionKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        movie_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        movie: Option<Movie>,
    },
    Queued { action: PendingAction },
}

pub fn add(title: String, fields: FieldArgs, connectivity: OfflineArgs, output: OutputFormat) -> Result<()> {
    let action = NewAction::create(fields.into_fields(Some(title)));
    run(action, connectivity, output)
}

pub fn edit(
    id: String,
    title: Option<String>,
    fields: FieldArgs,
    connectivity: OfflineArgs,
    output: OutputFormat,
) -> Result<()> {
    let fields = fields.into_fields(title);
    if fields.is_empty() {
        return Err(Error::NoChanges);
    }
    run(NewAction::update(id, fields), connectivity, output)
}

pub fn delete(id: String, connectivity: OfflineArgs) -> Result<()> {
    run(NewAction::delete(id), connectivity, OutputFormat::Text)
}

fn run(action: NewAction, connectivity: OfflineArgs, output: OutputFormat) -> Result<()> {
    let session = Session::open()?;
    let api = session.api()?;
    let outcome = runtime()?.block_on(submit(&session, &api, action, connectivity.offline))?;
    print_outcome(&outcome, output)
}

/// Sends `action` to the server, queueing it when the server can't be reached.
///
/// Client errors such as 404 or 400 are returned, not queued: replaying them
/// later would fail the same way.
pub async fn submit<A: MovieApi + ?Sized>(
    session: &Session,
    api: &A,
    action: NewAction,
    offline: bool,
) -> Result<Outcome> {
    if action.kind == ActionKind::Create && action.data.title.as_deref().filter(|t| !t.trim().is_empty()).is_none() {
        return Err(Error::FieldRequired { field: "title" });
    }
    let request = action.request()?;

    if offline {
        return queue(session, action);
    }

    let breaker = &session.breaker();
    let retry = session.config.retry_config();
    let result = retry_async(
        move || async move { breaker.call(|| send_request(api, request)).await.map_err(ApiError::from) },
        &retry,
    )
    .await
    .into_result();

    match result {
        Ok(movie) => {
            tracing::info!(kind = %action.kind, "change applied");
            refresh_cache(session, api).await;
            Ok(Outcome::Applied { kind: action.kind, movie_id: action.movie_id.clone(), movie })
        }
        Err(err) if err.is_connectivity() => {
            tracing::warn!(error = %err, kind = %action.kind, "server unreachable, queueing change");
            queue(session, action)
        }
        Err(err) => Err(err.into()),
    }
}

fn queue(session: &Session, action: NewAction) -> Result<Outcome> {
    let target = match action.kind {
        ActionKind::Delete => action.movie_id.clone(),
        _ => None,
    };
    let pending = session.storage.enqueue(action)?.ok_or(Error::QueueFailed)?;
    if let Some(id) = target {
        session.storage.remove_from_snapshot(&id);
    }
    Ok(Outcome::Queued { action: pending })
}

/// Refetches the cached page so the snapshot reflects the change.
async fn refresh_cache<A: MovieApi + ?Sized>(session: &Session, api: &A) {
    let Some(snapshot) = session.storage.get_snapshot() else {
        return;
    };
    let breaker = session.breaker();
    match fetch_page(api, &breaker, &session.config.retry_config(), snapshot.page).await {
        Ok(page) => session.storage.cache_snapshot(page),
        Err(err) => tracing::debug!(error = %err, "cache refresh failed"),
    }
}

fn print_outcome(outcome: &Outcome, output: OutputFormat) -> Result<()> {
    if output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }
    match outcome {
        Outcome::Applied { kind, movie_id, movie } => {
            let id = movie.as_ref().and_then(Movie::server_id).or(movie_id.as_deref()).unwrap_or("?");
            let verb = match kind {
                ActionKind::Create => "Added",
                ActionKind::Update => "Updated",
                ActionKind::Delete => "Deleted",
            };
            match movie {
                Some(movie) => println!("{} {}: {}", verb, id, movie.title),
                None => println!("{} {}", verb, id),
            }
        }
        Outcome::Queued { action } => {
            println!("Offline: queued {} ({}); it will sync when the connection returns", action.kind, action.id);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "mutate_tests.rs"]
mod tests;
