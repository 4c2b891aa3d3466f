//! Background sweep of expired in-memory cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info};

use crate::main_lib::AppState;

/// Starts the periodic sweep. The first tick fires immediately.
pub fn start_cache_sweep_scheduler(state: Arc<AppState>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Cache sweep scheduler started ({}s interval)", every.as_secs());
        let mut ticker = interval(every);
        loop {
            ticker.tick().await;
            run_sweep(&state);
        }
    })
}

fn run_sweep(state: &AppState) {
    let removed = state.cache.memory().cleanup();
    if removed > 0 {
        debug!("Cache sweep removed {} expired entries", removed);
    }
}
