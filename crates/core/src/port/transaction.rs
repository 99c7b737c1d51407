// Transaction port for atomic operations

use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional QueueRepository operations
#[async_trait]
pub trait TransactionalQueueRepository: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn QueueRepositoryTransaction>>;
}

/// QueueRepository operations within a transaction.
///
/// The join use case re-reads the queue and re-validates inside one of
/// these, so two near-simultaneous joins cannot both observe "not full"
/// and overshoot the capacity.
#[async_trait]
pub trait QueueRepositoryTransaction: Transaction {
    /// Load queue with participants by public token (within transaction)
    async fn find_by_token(&mut self, token: &str) -> Result<Option<crate::domain::Queue>>;

    /// Append a participant (within transaction)
    async fn insert_participant(
        &mut self,
        queue_id: &crate::domain::QueueId,
        participant: &crate::domain::Participant,
    ) -> Result<()>;
}
