//! Once-per-second ticker background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Tick period of the timer
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that advances one run of the timer every second.
///
/// Missed ticks are not caught up. The task exits as soon as the engine
/// reports that `run_id` is no longer the active run.
pub async fn ticker_task(state: Arc<AppState>, run_id: u64) {
    info!("Starting ticker for run {}", run_id);

    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        match state.tick(run_id) {
            Ok(Some(outcome)) => {
                if let Some((from, to)) = outcome.transition {
                    info!("{} finished, {} begins with {}s", from, to, outcome.snapshot.remaining_seconds);
                } else {
                    debug!("Tick: {} {}s remaining", outcome.snapshot.phase, outcome.snapshot.remaining_seconds);
                }
            }
            Ok(None) => {
                debug!("Run {} is no longer active, ticker exiting", run_id);
                break;
            }
            Err(e) => {
                error!("Failed to advance timer: {}", e);
                break;
            }
        }
    }
}
