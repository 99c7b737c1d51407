// Maintenance Service
// Scheduled maintenance operations for the queue database

use crate::error::Result;
use crate::port::{Maintenance, MaintenanceConfig, TimeProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

/// Maintenance scheduler
///
/// Runs periodic maintenance (expired-queue GC, VACUUM) in the background
pub struct MaintenanceScheduler {
    maintenance: Arc<dyn Maintenance>,
    time_provider: Arc<dyn TimeProvider>,
    config: MaintenanceConfig,
    interval_hours: u64,
}

impl MaintenanceScheduler {
    pub fn new(
        maintenance: Arc<dyn Maintenance>,
        time_provider: Arc<dyn TimeProvider>,
        config: MaintenanceConfig,
        interval_hours: u64,
    ) -> Self {
        Self {
            maintenance,
            time_provider,
            config,
            interval_hours,
        }
    }

    /// Run maintenance loop (background task)
    ///
    /// Should be spawned in tokio::spawn
    pub async fn run(self) {
        info!(
            interval_hours = self.interval_hours,
            retention_days = self.config.expired_queue_retention_days,
            "Maintenance scheduler started"
        );

        let mut tick = interval(Duration::from_secs(self.interval_hours * 3600));

        loop {
            tick.tick().await;

            info!("Running scheduled maintenance...");

            let now = self.time_provider.now_millis();
            match self
                .maintenance
                .run_full_maintenance(&self.config, now)
                .await
            {
                Ok(stats) => {
                    info!(
                        db_size_mb = stats.db_size_mb,
                        queue_count = stats.queue_count,
                        expired_queues = stats.expired_queue_count,
                        participants = stats.participant_count,
                        "Scheduled maintenance completed successfully"
                    );
                }
                Err(e) => {
                    error!(error = ?e, "Scheduled maintenance failed");
                }
            }
        }
    }

    /// Run maintenance immediately (for manual trigger)
    pub async fn run_now(&self) -> Result<()> {
        info!("Running manual maintenance...");
        let now = self.time_provider.now_millis();
        self.maintenance
            .run_full_maintenance(&self.config, now)
            .await?;
        Ok(())
    }
}
