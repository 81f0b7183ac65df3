// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `sync` and `watch`: replaying the offline queue.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reel_core::{
    ConnectivityProbe, MovieApi, NetworkEvent, NetworkMonitor, Notifier, Reconciler, SyncOutcome, SyncReport,
};
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use crate::cli::OutputFormat;
use crate::config::log_path;
use crate::error::Result;
use crate::logging;
use crate::notify::TerminalNotifier;

use super::{runtime, Session};

#[derive(Serialize)]
struct SyncJson {
    status: &'static str,
    #[serde(flatten)]
    report: SyncReport,
    remaining: usize,
}

pub fn run(output: OutputFormat) -> Result<()> {
    let session = Session::open()?;
    let api = session.api()?;
    let outcome = runtime()?.block_on(async {
        let online = api.check().await;
        sync_once(&session, api, online, Arc::new(TerminalNotifier)).await
    });
    print_outcome(&session, outcome, output)
}

/// Runs one reconciliation pass if `online`.
pub async fn sync_once<A: MovieApi>(
    session: &Session,
    api: A,
    online: bool,
    notifier: Arc<dyn Notifier>,
) -> SyncOutcome {
    let reconciler = Reconciler::new(
        Arc::clone(&session.storage),
        api,
        NetworkMonitor::new(online),
        notifier,
        session.config.reconcile_config(),
    );
    reconciler.sync_now().await
}

fn status_label(outcome: &SyncOutcome) -> &'static str {
    match outcome {
        SyncOutcome::Completed(_) => "completed",
        SyncOutcome::AlreadyRunning => "already_running",
        SyncOutcome::Offline => "offline",
        SyncOutcome::NotTriggered => "not_triggered",
    }
}

fn print_outcome(session: &Session, outcome: SyncOutcome, output: OutputFormat) -> Result<()> {
    let remaining = session.storage.list_pending().len();
    if output == OutputFormat::Json {
        let json = SyncJson { status: status_label(&outcome), report: outcome.report(), remaining };
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    match outcome {
        SyncOutcome::Completed(report) if report == SyncReport::default() => println!("Nothing to sync"),
        SyncOutcome::Completed(report) => {
            println!("Synced {} change(s)", report.success);
            if report.failed > 0 {
                println!("{} change(s) failed and stay queued", report.failed);
            }
            if report.discarded() > 0 {
                println!("{} change(s) discarded", report.discarded());
            }
        }
        SyncOutcome::Offline => {
            println!("Server unreachable; {} change(s) still queued", remaining);
        }
        SyncOutcome::AlreadyRunning | SyncOutcome::NotTriggered => println!("No sync performed"),
    }
    Ok(())
}

pub fn watch(interval: Option<u64>) -> Result<()> {
    let session = Session::open()?;
    let log_file = log_path(&session.work_dir);
    logging::init(Some(log_file.as_path()));

    let api = Arc::new(session.api()?);
    let interval = interval.map(Duration::from_secs).unwrap_or_else(|| session.config.probe_interval());
    println!("Watching {} (probe every {}s); press Ctrl-C to stop", api.base_url(), interval.as_secs());
    println!("Log: {}", log_file.display());

    runtime()?.block_on(watch_until(
        &session,
        Arc::clone(&api),
        &*api,
        interval,
        Arc::new(TerminalNotifier),
        shutdown_signal(),
    ));
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
}

/// Probes connectivity every `interval` and replays the queue whenever the
/// server comes back, until `shutdown` resolves.
pub async fn watch_until<A, P, F>(
    session: &Session,
    api: A,
    probe: &P,
    interval: Duration,
    notifier: Arc<dyn Notifier>,
    shutdown: F,
) where
    A: MovieApi,
    P: ConnectivityProbe + ?Sized,
    F: Future<Output = ()>,
{
    let online = probe.check().await;
    let monitor = NetworkMonitor::new(online);
    let reconciler =
        Reconciler::new(Arc::clone(&session.storage), api, monitor.clone(), notifier, session.config.reconcile_config());
    tracing::info!(online, interval_secs = interval.as_secs(), "watching connectivity");

    if online && !session.storage.list_pending().is_empty() {
        reconciler.sync_now().await;
    }

    let probe_loop = async {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let event = if probe.check().await { NetworkEvent::Online } else { NetworkEvent::ProbeFailed };
            monitor.handle(event);
        }
    };

    tokio::select! {
        () = reconciler.run_until(shutdown) => {}
        _ = probe_loop => {}
    }
    tracing::info!("watch stopped");
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
