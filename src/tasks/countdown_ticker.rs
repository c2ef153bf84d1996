//! Periodic tick driver for the countdown engine

use std::sync::Arc;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

use crate::state::AppState;

/// Background task that ticks the engine once per `tick_interval`.
///
/// Exits as soon as the countdown is stopped or a newer ticker replaces it.
pub async fn countdown_ticker_task(state: Arc<AppState>, driver_id: u64) {
    info!("Starting countdown ticker #{}", driver_id);

    let mut ticks = interval(state.tick_interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_tick: Option<Instant> = None;

    loop {
        ticks.tick().await;

        let now = Instant::now();
        if let Some(previous) = last_tick {
            let gap = now.duration_since(previous);
            if gap > state.tick_interval * 2 {
                // Typically a system sleep. Thresholds inside the gap are not replayed.
                warn!(
                    "Countdown ticks were delayed by {:?}; notifications in that window may have been skipped",
                    gap
                );
            }
        }
        last_tick = Some(now);

        match state.tick(driver_id) {
            Ok(Some(events)) => {
                trace!("Tick #{} produced {} event(s)", driver_id, events.len());
            }
            Ok(None) => {
                debug!("Countdown ticker #{} no longer active", driver_id);
                break;
            }
            Err(e) => {
                error!("Countdown tick failed: {}", e);
                break;
            }
        }
    }

    info!("Countdown ticker #{} exited", driver_id);
}
