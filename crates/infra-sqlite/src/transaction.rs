// SQLite Transaction Implementation

use crate::queue_repository::{insert_participant_row, load_queue, map_sqlx_error};
use async_trait::async_trait;
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use waitline_core::domain::{Participant, Queue, QueueId};
use waitline_core::error::Result;
use waitline_core::port::{QueueRepositoryTransaction, Transaction};

/// One join executes entirely inside one of these: load the queue, decide,
/// append, commit. SQLite's write lock serializes concurrent instances, so
/// the capacity check always runs against the latest committed state.
pub struct SqliteQueueTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteQueueTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteQueueTransaction<'_> {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl QueueRepositoryTransaction for SqliteQueueTransaction<'_> {
    async fn find_by_token(&mut self, token: &str) -> Result<Option<Queue>> {
        load_queue(&mut self.tx, "token = ?", token).await
    }

    async fn insert_participant(
        &mut self,
        queue_id: &QueueId,
        participant: &Participant,
    ) -> Result<()> {
        insert_participant_row(&mut self.tx, queue_id, participant).await
    }
}
