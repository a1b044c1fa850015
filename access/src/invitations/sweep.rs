//! Periodic invitation expiry.
//!
//! Optional housekeeping: expiry is always derived on read, the sweep only
//! makes it stick in storage.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use super::registry::InvitationRegistry;

/// Spawn a task that stores `expired` on lapsed invitations every `every`.
///
/// The first tick is skipped so nothing runs at startup.
pub fn spawn_expiry_sweep(
    registry: Arc<InvitationRegistry>,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await; // consume immediate first tick
        loop {
            interval.tick().await;
            run_sweep(&registry);
        }
    })
}

#[tracing::instrument(skip(registry))]
fn run_sweep(registry: &InvitationRegistry) {
    let expired = registry.reconcile_expired(Utc::now());
    if expired > 0 {
        tracing::info!(expired, "Invitation expiry sweep completed");
    }
}
