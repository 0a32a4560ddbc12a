//! Wake lock background task

use std::sync::Arc;
use tracing::{debug, info};

use crate::state::AppState;

/// Background task that holds a wake lock exactly while the timer runs.
///
/// If an acquisition resolves after the timer has already stopped, the
/// running flag will have changed in the meantime and the next pass releases
/// the lock straight away.
pub async fn wake_lock_task(state: Arc<AppState>) {
    info!("Starting wake lock task");

    let mut running_rx = state.subscribe_running();

    loop {
        let running = *running_rx.borrow_and_update();

        if running {
            let held = state.wake_lock().ensure_held().await;
            debug!("Timer running, wake lock held: {}", held);
        } else {
            state.wake_lock().ensure_released().await;
            debug!("Timer stopped, wake lock released");
        }

        if running_rx.changed().await.is_err() {
            debug!("Running channel closed, wake lock task exiting");
            break;
        }
    }
}
