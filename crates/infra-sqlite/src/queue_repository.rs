// SQLite QueueRepository Implementation

use crate::SqliteQueueTransaction;
use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};
use waitline_core::domain::{
    OwnerId, Participant, ParticipantId, ParticipantStatus, Queue, QueueId,
};
use waitline_core::error::{AppError, Result};
use waitline_core::port::{
    QueueRepository, QueueRepositoryTransaction, TransactionalQueueRepository,
};

// Helper to convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => {
                        // UNIQUE constraint failed (queue token or queue/phone pair)
                        AppError::Conflict(format!(
                            "Unique constraint violation: {} ({})",
                            db_err.message(),
                            code_str
                        ))
                    }
                    "787" | "3850" => {
                        AppError::Database(format!(
                            "Foreign key constraint violation: {} ({})",
                            db_err.message(),
                            code_str
                        ))
                    }
                    "5" => AppError::Database(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        _ => AppError::Database(err.to_string()),
    }
}

/// SQLite row representation of a queue (without participants)
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct QueueRow {
    id: String,
    token: String,
    owner_id: String,
    name: String,
    organization: String,
    description: String,
    capacity: i64,
    expires_at: i64,
    join_url: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl QueueRow {
    fn into_queue(self, participants: Vec<Participant>) -> Queue {
        Queue {
            id: self.id,
            token: self.token,
            owner_id: self.owner_id,
            name: self.name,
            organization: self.organization,
            description: self.description,
            capacity: self.capacity,
            expires_at: self.expires_at,
            join_url: self.join_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
            participants,
        }
    }
}

/// SQLite row representation of a participant
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ParticipantRow {
    id: String,
    name: String,
    phone: String,
    position: i64,
    status: String,
    joined_at: i64,
    estimated_wait_minutes: i64,
    processed_at: Option<i64>,
    skipped_at: Option<i64>,
    served_at: Option<i64>,
}

impl ParticipantRow {
    fn into_participant(self) -> Participant {
        let status = match self.status.as_str() {
            "WAITING" => ParticipantStatus::Waiting,
            "CURRENT" => ParticipantStatus::Current,
            "SKIPPED" => ParticipantStatus::Skipped,
            "SERVED" => ParticipantStatus::Served,
            _ => ParticipantStatus::Waiting, // Default fallback
        };

        Participant {
            id: self.id,
            name: self.name,
            phone: self.phone,
            position: self.position,
            status,
            joined_at: self.joined_at,
            estimated_wait_minutes: self.estimated_wait_minutes,
            processed_at: self.processed_at,
            skipped_at: self.skipped_at,
            served_at: self.served_at,
        }
    }
}

/// Load a full queue aggregate through any SQLite connection.
///
/// Shared between the pooled repository and the transaction adapter so the
/// join path sees exactly the same snapshot shape.
pub(crate) async fn load_queue(
    conn: &mut SqliteConnection,
    where_clause: &str,
    key: &str,
) -> Result<Option<Queue>> {
    let sql = format!("SELECT * FROM queues WHERE {}", where_clause);
    let row = sqlx::query_as::<_, QueueRow>(&sql)
        .bind(key)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    let Some(row) = row else {
        return Ok(None);
    };

    let participants: Vec<ParticipantRow> = sqlx::query_as(
        r#"
        SELECT id, name, phone, position, status, joined_at,
               estimated_wait_minutes, processed_at, skipped_at, served_at
        FROM participants
        WHERE queue_id = ?
        ORDER BY joined_at ASC, position ASC
        "#,
    )
    .bind(&row.id)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(Some(row.into_queue(
        participants
            .into_iter()
            .map(|p| p.into_participant())
            .collect(),
    )))
}

pub(crate) async fn insert_participant_row(
    conn: &mut SqliteConnection,
    queue_id: &QueueId,
    participant: &Participant,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO participants (
            id, queue_id, name, phone, position, status,
            joined_at, estimated_wait_minutes, processed_at, skipped_at, served_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&participant.id)
    .bind(queue_id)
    .bind(&participant.name)
    .bind(&participant.phone)
    .bind(participant.position)
    .bind(participant.status.to_string())
    .bind(participant.joined_at)
    .bind(participant.estimated_wait_minutes)
    .bind(participant.processed_at)
    .bind(participant.skipped_at)
    .bind(participant.served_at)
    .execute(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(())
}

pub struct SqliteQueueRepository {
    pool: SqlitePool,
}

impl SqliteQueueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueRepository for SqliteQueueRepository {
    async fn insert(&self, queue: &Queue) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO queues (
                id, token, owner_id, name, organization, description,
                capacity, expires_at, join_url, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&queue.id)
        .bind(&queue.token)
        .bind(&queue.owner_id)
        .bind(&queue.name)
        .bind(&queue.organization)
        .bind(&queue.description)
        .bind(queue.capacity)
        .bind(queue.expires_at)
        .bind(&queue.join_url)
        .bind(queue.created_at)
        .bind(queue.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &QueueId) -> Result<Option<Queue>> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        load_queue(&mut conn, "id = ?", id).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Queue>> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        load_queue(&mut conn, "token = ?", token).await
    }

    async fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Queue>> {
        let tokens: Vec<String> = sqlx::query_scalar(
            "SELECT token FROM queues WHERE owner_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        let mut queues = Vec::with_capacity(tokens.len());
        for token in &tokens {
            if let Some(queue) = load_queue(&mut conn, "token = ?", token).await? {
                queues.push(queue);
            }
        }
        Ok(queues)
    }

    async fn update(&self, queue: &Queue) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE queues
            SET name = ?, organization = ?, description = ?,
                capacity = ?, expires_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&queue.name)
        .bind(&queue.organization)
        .bind(&queue.description)
        .bind(queue.capacity)
        .bind(queue.expires_at)
        .bind(queue.updated_at)
        .bind(&queue.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Queue {} not found", queue.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: &QueueId) -> Result<()> {
        // participants go via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM queues WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Queue {} not found", id)));
        }
        Ok(())
    }

    async fn update_participant(
        &self,
        queue_id: &QueueId,
        participant: &Participant,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE participants
            SET status = ?, processed_at = ?, skipped_at = ?, served_at = ?
            WHERE id = ? AND queue_id = ?
            "#,
        )
        .bind(participant.status.to_string())
        .bind(participant.processed_at)
        .bind(participant.skipped_at)
        .bind(participant.served_at)
        .bind(&participant.id)
        .bind(queue_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Participant {} not found",
                participant.id
            )));
        }
        Ok(())
    }

    async fn remove_participant(
        &self,
        queue_id: &QueueId,
        participant_id: &ParticipantId,
    ) -> Result<()> {
        let result = sqlx::query("DELETE FROM participants WHERE id = ? AND queue_id = ?")
            .bind(participant_id)
            .bind(queue_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Participant {} not found",
                participant_id
            )));
        }
        Ok(())
    }

    async fn count_queues(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM queues")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count)
    }

    async fn count_active_queues(&self, now_millis: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM queues WHERE expires_at > ?")
            .bind(now_millis)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count)
    }

    async fn count_participants_by_status(&self, status: ParticipantStatus) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM participants WHERE status = ?")
            .bind(status.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count)
    }
}

#[async_trait]
impl TransactionalQueueRepository for SqliteQueueRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn QueueRepositoryTransaction>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // Take the write lock before any read. A deferred transaction that
        // reads first cannot upgrade to a writer once another join commits
        // (SQLITE_BUSY_SNAPSHOT); starting as a writer serializes joins
        // under the busy timeout instead.
        sqlx::query("UPDATE schema_version SET version = version WHERE 0")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(Box::new(SqliteQueueTransaction::new(tx)))
    }
}
