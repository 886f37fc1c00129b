//! Background scheduler for the digest job.
//!
//! The HTTP trigger stays the primary entry point; this runs the same job on
//! a fixed interval when `CF_DIGEST_INTERVAL_HOURS` is set.

use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{info, warn};

use crate::api::digest::run_digest_job;
use crate::error::ApiError;
use crate::main_lib::AppState;

/// Initial delay before the first run, so startup finishes first.
const INITIAL_DELAY_SECS: u64 = 60;

/// Starts the periodic digest job.
pub fn start_digest_scheduler(state: Arc<AppState>, every: Duration) {
    tokio::spawn(async move {
        info!("Digest scheduler started ({}s interval)", every.as_secs());

        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        // First tick is immediate.
        let mut digest_interval = interval(every);
        loop {
            digest_interval.tick().await;
            match run_digest_job(&state).await {
                Ok(_) | Err(ApiError::Conflict(_)) => {}
                Err(e) => warn!("Scheduled digest run failed: {}", e),
            }
        }
    });
}
