// SQLite Maintenance Implementation

use crate::queue_repository::map_sqlx_error;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use waitline_core::error::Result;
use waitline_core::port::{Maintenance, MaintenanceStats, TimeProvider};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

pub struct SqliteMaintenance {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteMaintenance {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }

    async fn db_size_bytes(&self) -> Result<i64> {
        let page_count: i64 = sqlx::query_scalar("PRAGMA page_count")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let page_size: i64 = sqlx::query_scalar("PRAGMA page_size")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(page_count * page_size)
    }
}

#[async_trait]
impl Maintenance for SqliteMaintenance {
    async fn vacuum(&self) -> Result<f64> {
        let before = self.db_size_bytes().await?;

        sqlx::query("VACUUM")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let after = self.db_size_bytes().await?;
        let reclaimed_mb = (before - after).max(0) as f64 / (1024.0 * 1024.0);

        tracing::info!(reclaimed_mb = reclaimed_mb, "VACUUM completed");
        Ok(reclaimed_mb)
    }

    async fn gc_expired_queues(&self, retention_days: i64, now_millis: i64) -> Result<i64> {
        let cutoff = now_millis - retention_days * MILLIS_PER_DAY;

        // Participants follow via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM queues WHERE expires_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let deleted = result.rows_affected() as i64;
        if deleted > 0 {
            tracing::info!(deleted = deleted, cutoff = cutoff, "Purged expired queues");
        }
        Ok(deleted)
    }

    async fn get_stats(&self) -> Result<MaintenanceStats> {
        let db_size_bytes = self.db_size_bytes().await?;

        let queue_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM queues")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let now = self.time_provider.now_millis();
        let expired_queue_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM queues WHERE expires_at <= ?")
                .bind(now)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        let participant_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM participants")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let freelist_count: i64 = sqlx::query_scalar("PRAGMA freelist_count")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let page_count: i64 = sqlx::query_scalar("PRAGMA page_count")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let fragmentation_percent = if page_count > 0 {
            freelist_count as f64 / page_count as f64 * 100.0
        } else {
            0.0
        };

        Ok(MaintenanceStats {
            db_size_bytes,
            db_size_mb: db_size_bytes as f64 / (1024.0 * 1024.0),
            queue_count,
            expired_queue_count,
            participant_count,
            fragmentation_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations, SqliteQueueRepository};
    use waitline_core::domain::Queue;
    use waitline_core::port::time_provider::SystemTimeProvider;
    use waitline_core::port::QueueRepository;

    #[tokio::test]
    async fn test_gc_keeps_recently_expired_queues() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = SqliteQueueRepository::new(pool.clone());
        let maintenance = SqliteMaintenance::new(pool, Arc::new(SystemTimeProvider));

        let now = 100 * MILLIS_PER_DAY;

        // Expired 2 days ago: inside the 7-day retention window
        let mut recent = Queue::new_test(5, now - 2 * MILLIS_PER_DAY);
        recent.token = "gc-recent".to_string();
        recent.id = "gc-recent-id".to_string();
        repo.insert(&recent).await.unwrap();

        // Expired 30 days ago: should be purged
        let mut old = Queue::new_test(5, now - 30 * MILLIS_PER_DAY);
        old.token = "gc-old".to_string();
        old.id = "gc-old-id".to_string();
        repo.insert(&old).await.unwrap();

        let deleted = maintenance.gc_expired_queues(7, now).await.unwrap();
        assert_eq!(deleted, 1);

        assert!(repo.find_by_token("gc-recent").await.unwrap().is_some());
        assert!(repo.find_by_token("gc-old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stats_report_counts() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = SqliteQueueRepository::new(pool.clone());
        let maintenance = SqliteMaintenance::new(pool, Arc::new(SystemTimeProvider));

        repo.insert(&Queue::new_test(5, i64::MAX)).await.unwrap();

        let stats = maintenance.get_stats().await.unwrap();
        assert_eq!(stats.queue_count, 1);
        assert_eq!(stats.expired_queue_count, 0);
        assert_eq!(stats.participant_count, 0);
        assert!(stats.db_size_bytes > 0);
    }
}
