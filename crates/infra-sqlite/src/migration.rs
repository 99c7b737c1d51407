// Migration Runner

use sqlx::SqlitePool;
use tracing::info;

type MigrationResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Ordered list of schema migrations; position 0 is version 1.
const MIGRATIONS: &[(&str, &str)] = &[(
    "initial schema",
    include_str!("../migrations/001_initial_schema.sql"),
)];

/// Bring the database schema up to the latest version.
///
/// Each pending migration runs in its own transaction and records itself
/// in `schema_version`, so a rerun after a crash picks up where it stopped.
pub async fn run_migrations(pool: &SqlitePool) -> MigrationResult<()> {
    let current = current_version(pool).await?;
    info!(current_version = current, "Checking schema migrations");

    for (idx, (name, sql)) in MIGRATIONS.iter().enumerate() {
        let version = idx as i64 + 1;
        if version <= current {
            continue;
        }
        info!(version = version, name = name, "Applying migration");
        apply(pool, sql).await?;
    }

    Ok(())
}

async fn current_version(pool: &SqlitePool) -> MigrationResult<i64> {
    let has_version_table: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
    )
    .fetch_one(pool)
    .await?;

    if has_version_table == 0 {
        return Ok(0);
    }

    let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await?;
    Ok(version.unwrap_or(0))
}

/// Run one migration script inside a transaction.
///
/// SQLite executes one statement at a time, so the script is split on
/// semicolons; comment-only fragments are dropped.
async fn apply(pool: &SqlitePool, sql: &str) -> MigrationResult<()> {
    let mut tx = pool.begin().await?;

    for fragment in sql.split(';') {
        let statement = fragment
            .lines()
            .filter(|line| !line.trim_start().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_pool;

    async fn migrated_pool() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_fresh_database_gets_all_tables() {
        let pool = migrated_pool().await;

        for table in ["queues", "participants"] {
            let count: i64 =
                sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
                    .fetch_one(&pool)
                    .await
                    .unwrap();
            assert_eq!(count, 0, "table {} should exist and be empty", table);
        }
    }

    #[tokio::test]
    async fn test_rerun_is_a_no_op() {
        let pool = migrated_pool().await;
        run_migrations(&pool).await.unwrap();

        let version = current_version(&pool).await.unwrap();
        assert_eq!(version, MIGRATIONS.len() as i64);
    }

    #[tokio::test]
    async fn test_participant_unique_phone_constraint_exists() {
        let pool = migrated_pool().await;

        let ddl: String = sqlx::query_scalar(
            "SELECT sql FROM sqlite_master WHERE type='table' AND name='participants'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(ddl.contains("UNIQUE"));
    }
}
