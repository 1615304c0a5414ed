//! Fixed-interval scheduling of sync cycles.

use std::time::Duration;

use chrono::Local;
use tokio::time::MissedTickBehavior;

use passsync_common::format::format_duration;

use crate::sync::SyncEngine;

/// Run sync cycles forever on a fixed interval.
///
/// The first cycle starts immediately. Each cycle runs to completion before
/// the next tick is consumed, so cycles never overlap; if a cycle outlasts
/// the interval the next one starts back-to-back.
pub async fn run(engine: SyncEngine, interval_mins: u64) {
    let period = Duration::from_secs(interval_mins * 60);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match engine.run_cycle().await {
            Ok(report) => {
                let next = Local::now() + chrono::Duration::minutes(interval_mins as i64);
                tracing::info!(
                    "Cycle took {}. Next sync at {}",
                    format_duration(report.duration.as_millis() as i64),
                    next.format("%H:%M")
                );
            }
            Err(e) => {
                // Local stores can be briefly unavailable (capture pipeline
                // writing); keep the daemon alive and try again next tick.
                tracing::error!("Sync cycle failed: {}", e);
            }
        }
    }
}
