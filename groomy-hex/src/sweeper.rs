//! Retention sweeper.
//!
//! Runs the physical purge of logically deleted payments on a fixed
//! schedule, outside the request path.

use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, instrument};

use groomy_types::ReservationRepository;

use crate::service::purge_expired_payments;

/// Periodic worker purging payments past the retention window.
pub struct RetentionSweeper<R: ReservationRepository> {
    repo: R,
    period: Duration,
}

impl<R: ReservationRepository> RetentionSweeper<R> {
    pub fn new(repo: R, period: Duration) -> Self {
        Self { repo, period }
    }

    #[instrument(skip(self))]
    pub async fn run(self) {
        info!(period_secs = self.period.as_secs(), "Starting retention sweeper");
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(err) = purge_expired_payments(&self.repo).await {
                error!(error = %err, "retention sweep failed");
            }
        }
    }
}
