//! Fixed-interval scheduler driving monitor cycles.
//!
//! One spawned task owns the cadence: it runs a cycle immediately at boot,
//! then one per interval. Each cycle is awaited to completion before the
//! next tick is observed, so scheduled cycles never overlap.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domain::MonitorService;

/// Spawn the background cycle loop.
pub fn spawn_cycle_loop(monitor: Arc<MonitorService>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // A cycle can outlast the interval; run late rather than bursting.
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            // The first tick completes immediately, matching "fetch now, then
            // every interval".
            ticker.tick().await;
            match monitor.run_cycle().await {
                Ok(report) => info!(
                    inserted = report.reconciliation.inserted,
                    updated = report.reconciliation.updated,
                    breaches = report.breaches,
                    messages_sent = report.messages_sent,
                    "scheduled cycle finished"
                ),
                Err(cycle_error) => {
                    // The next tick retries naturally by re-fetching state.
                    error!(error = %cycle_error, "scheduled cycle failed");
                }
            }
        }
    })
}
