/// Periodic rebuild of every stored playlist
use remix_sync::{PlaylistService, RefreshAllSummary};
use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

pub struct RefreshScheduler {
    service: Arc<PlaylistService>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(service: Arc<PlaylistService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Start the scheduler task. The first pass runs one interval after start.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(
                interval_secs = self.interval.as_secs(),
                "Playlist refresh scheduler started"
            );

            let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                self.run_once().await;
            }
        })
    }

    /// One pass over every playlist. Failures are logged, never propagated.
    pub async fn run_once(&self) -> Option<RefreshAllSummary> {
        match self.service.refresh_all_playlists().await {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::error!("Scheduled playlist refresh failed: {}", e);
                None
            }
        }
    }
}
