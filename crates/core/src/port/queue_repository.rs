// Queue Repository Port (Interface)

use crate::domain::{OwnerId, Participant, ParticipantId, ParticipantStatus, Queue, QueueId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Queue persistence.
///
/// Implementations load the full aggregate: a returned `Queue` always
/// carries its participants in join order.
#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Insert a new queue (no participants yet)
    async fn insert(&self, queue: &Queue) -> Result<()>;

    /// Find queue by internal id
    async fn find_by_id(&self, id: &QueueId) -> Result<Option<Queue>>;

    /// Find queue by public join token
    async fn find_by_token(&self, token: &str) -> Result<Option<Queue>>;

    /// All queues belonging to an owner, newest first
    async fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Queue>>;

    /// Update owner-editable queue fields (name, organization, description,
    /// capacity, expires_at, updated_at)
    async fn update(&self, queue: &Queue) -> Result<()>;

    /// Delete a queue; cascades to all its participants
    async fn delete(&self, id: &QueueId) -> Result<()>;

    /// Persist a participant's status and action timestamps
    async fn update_participant(&self, queue_id: &QueueId, participant: &Participant)
        -> Result<()>;

    /// Delete a single participant
    async fn remove_participant(
        &self,
        queue_id: &QueueId,
        participant_id: &ParticipantId,
    ) -> Result<()>;

    /// Total number of queues
    async fn count_queues(&self) -> Result<i64>;

    /// Queues whose expiry is still in the future at `now_millis`
    async fn count_active_queues(&self, now_millis: i64) -> Result<i64>;

    /// Participants in a given status, across all queues
    async fn count_participants_by_status(&self, status: ParticipantStatus) -> Result<i64>;
}
