//! Simulated upload progress.
//!
//! The ramp is feedback only, not a measurement: it runs on a timer while the
//! upload request is in flight and knows nothing about bytes transferred.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::store::WorkflowStore;

pub const RAMP_INTERVAL: Duration = Duration::from_millis(200);
pub const RAMP_STEP: u8 = 10;
pub const RAMP_CEILING: u8 = 90;

/// Timer task advancing the store's upload progress. Stops when dropped.
pub struct ProgressRamp {
    handle: JoinHandle<()>,
}

impl ProgressRamp {
    pub fn start(store: WorkflowStore) -> Self {
        let handle = tokio::spawn(async move {
            // First tick one period from now, not immediately.
            let mut ticker = interval_at(Instant::now() + RAMP_INTERVAL, RAMP_INTERVAL);
            loop {
                ticker.tick().await;
                store.advance_upload_progress(RAMP_STEP, RAMP_CEILING);
            }
        });
        Self { handle }
    }
}

impl Drop for ProgressRamp {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
