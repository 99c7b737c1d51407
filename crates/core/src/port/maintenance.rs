// DB Maintenance port

use crate::error::Result;
use async_trait::async_trait;

/// Database maintenance statistics
#[derive(Debug, Clone)]
pub struct MaintenanceStats {
    pub db_size_bytes: i64,
    pub db_size_mb: f64,
    pub queue_count: i64,
    pub expired_queue_count: i64,
    pub participant_count: i64,
    pub fragmentation_percent: f64,
}

/// Maintenance configuration
#[derive(Debug, Clone)]
pub struct MaintenanceConfig {
    /// Keep expired queues around this long before purging (days)
    pub expired_queue_retention_days: i64,

    /// Maximum DB size before forcing VACUUM (MB)
    pub max_db_size_mb: f64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            expired_queue_retention_days: 7,
            max_db_size_mb: 500.0,
        }
    }
}

/// Database maintenance operations
#[async_trait]
pub trait Maintenance: Send + Sync {
    /// Run VACUUM to reclaim space and optimize the DB
    ///
    /// # Returns
    /// Space reclaimed in MB
    async fn vacuum(&self) -> Result<f64>;

    /// Delete queues that expired more than `retention_days` before
    /// `now_millis`; participants go with them.
    ///
    /// # Returns
    /// Number of queues deleted
    async fn gc_expired_queues(&self, retention_days: i64, now_millis: i64) -> Result<i64>;

    /// Get maintenance statistics
    async fn get_stats(&self) -> Result<MaintenanceStats>;

    /// Run full maintenance (GC + VACUUM when the DB is large)
    async fn run_full_maintenance(
        &self,
        config: &MaintenanceConfig,
        now_millis: i64,
    ) -> Result<MaintenanceStats> {
        let stats_before = self.get_stats().await?;

        let deleted_queues = self
            .gc_expired_queues(config.expired_queue_retention_days, now_millis)
            .await?;

        let reclaimed_mb = if stats_before.db_size_mb > config.max_db_size_mb {
            self.vacuum().await?
        } else {
            0.0
        };

        let stats_after = self.get_stats().await?;

        tracing::info!(
            deleted_queues = deleted_queues,
            reclaimed_mb = reclaimed_mb,
            db_size_mb = stats_after.db_size_mb,
            "Maintenance completed"
        );

        Ok(stats_after)
    }
}
