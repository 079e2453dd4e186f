//! Background maintenance.
//!
//! Sessions live in memory only, so players who close the tab leave their
//! session behind. The sweeper drops sessions nobody has acted on for the
//! configured idle time.

use std::time::Duration;

use chrono::Utc;
use tokio::{task::JoinHandle, time::interval};

use crate::session::SessionStore;

/// How often idle sessions are looked for.
const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Start all background jobs.
///
/// Returns the join handles so the caller can keep or abort them.
pub fn start_background_jobs(store: SessionStore, idle: chrono::Duration) -> Vec<JoinHandle<()>> {
    vec![tokio::spawn(periodic_session_sweep(store, idle))]
}

async fn periodic_session_sweep(store: SessionStore, idle: chrono::Duration) {
    let mut interval = interval(SWEEP_INTERVAL);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        sweep_once(&store, idle).await;
    }
}

async fn sweep_once(store: &SessionStore, idle: chrono::Duration) -> usize {
    let removed = store.sweep_idle(Utc::now(), idle).await;
    if removed > 0 {
        let remaining = store.len().await;
        tracing::info!(removed, remaining, "Removed idle quiz sessions");
    } else {
        tracing::debug!("Session sweep complete: nothing idle");
    }
    removed
}
