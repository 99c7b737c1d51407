// Queue Owner Use Cases
//
// Every operation here checks that the acting principal owns the queue
// before touching it. The principal itself comes from an external
// authentication layer; this service only compares identifiers.

use crate::domain::{OwnerId, ParticipantId, Queue, QueueToken};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, QueueRepository, TimeProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// owner.create.v1 payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQueueRequest {
    pub name: String,
    pub organization: String,
    pub capacity: i64,
    pub expires_at: i64,
    pub description: String,
}

/// owner.update.v1 payload; description keeps its old value when omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQueueRequest {
    pub name: String,
    pub organization: String,
    pub capacity: i64,
    pub expires_at: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Owner-triggered participant actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantAction {
    Current,
    Skip,
    Served,
    Remove,
}

fn validate_queue_fields(
    name: &str,
    organization: &str,
    capacity: i64,
    expires_at: i64,
) -> Result<()> {
    if name.trim().is_empty() || organization.trim().is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }
    if capacity < 1 {
        return Err(AppError::Validation(
            "Queue size must be at least 1".to_string(),
        ));
    }
    if expires_at <= 0 {
        return Err(AppError::Validation(
            "Invalid expiry date format".to_string(),
        ));
    }
    Ok(())
}

/// Queue Admin Service
pub struct QueueAdminService {
    queue_repo: Arc<dyn QueueRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    /// Base URL for public join links, e.g. "https://waitline.example.com"
    public_base_url: String,
}

impl QueueAdminService {
    pub fn new(
        queue_repo: Arc<dyn QueueRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            queue_repo,
            id_provider,
            time_provider,
            public_base_url: public_base_url.into(),
        }
    }

    /// Create a queue: generates id, public token and join link
    pub async fn create_queue(
        &self,
        owner_id: &OwnerId,
        req: CreateQueueRequest,
    ) -> Result<Queue> {
        validate_queue_fields(&req.name, &req.organization, req.capacity, req.expires_at)?;
        if req.description.trim().is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }

        let id = self.id_provider.generate_id();
        let token = self.id_provider.generate_id();
        let now = self.time_provider.now_millis();

        let mut queue = Queue::new(
            id,
            token,
            owner_id.clone(),
            req.name,
            req.organization,
            req.description,
            req.capacity,
            req.expires_at,
            now,
        );
        queue.join_url = Some(format!("{}/join/{}", self.public_base_url, queue.token));

        self.queue_repo.insert(&queue).await?;

        tracing::info!(queue_id = %queue.id, owner_id = %owner_id, "Queue created");
        Ok(queue)
    }

    /// Load a queue by token, enforcing ownership
    async fn load_owned(&self, owner_id: &OwnerId, token: &QueueToken) -> Result<Queue> {
        let queue = self
            .queue_repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::NotFound("Queue not found".to_string()))?;

        if &queue.owner_id != owner_id {
            return Err(AppError::Unauthorized(
                "Not the owner of this queue".to_string(),
            ));
        }
        Ok(queue)
    }

    /// Fetch an owned queue with its participants
    pub async fn get_queue(&self, owner_id: &OwnerId, token: &QueueToken) -> Result<Queue> {
        self.load_owned(owner_id, token).await
    }

    /// All queues belonging to the owner, newest first
    pub async fn list_queues(&self, owner_id: &OwnerId) -> Result<Vec<Queue>> {
        self.queue_repo.list_by_owner(owner_id).await
    }

    /// Update owner-editable fields
    pub async fn update_queue(
        &self,
        owner_id: &OwnerId,
        token: &QueueToken,
        req: UpdateQueueRequest,
    ) -> Result<Queue> {
        validate_queue_fields(&req.name, &req.organization, req.capacity, req.expires_at)?;

        let mut queue = self.load_owned(owner_id, token).await?;

        queue.name = req.name;
        queue.organization = req.organization;
        queue.capacity = req.capacity;
        queue.expires_at = req.expires_at;
        if let Some(description) = req.description {
            queue.description = description;
        }
        queue.updated_at = self.time_provider.now_millis();

        self.queue_repo.update(&queue).await?;
        Ok(queue)
    }

    /// Delete a queue; all its participants go with it
    pub async fn delete_queue(&self, owner_id: &OwnerId, token: &QueueToken) -> Result<()> {
        let queue = self.load_owned(owner_id, token).await?;
        self.queue_repo.delete(&queue.id).await?;

        tracing::info!(queue_id = %queue.id, owner_id = %owner_id, "Queue deleted");
        Ok(())
    }

    /// Apply an owner action to one participant and persist the result.
    ///
    /// Returns the queue as it looks after the action.
    pub async fn participant_action(
        &self,
        owner_id: &OwnerId,
        token: &QueueToken,
        participant_id: &ParticipantId,
        action: ParticipantAction,
    ) -> Result<Queue> {
        let mut queue = self.load_owned(owner_id, token).await?;
        let now = self.time_provider.now_millis();

        match action {
            ParticipantAction::Current => {
                let participant = queue.mark_current(participant_id, now)?;
                self.queue_repo
                    .update_participant(&queue.id, &participant)
                    .await?;
            }
            ParticipantAction::Skip => {
                let participant = queue.skip(participant_id, now)?;
                self.queue_repo
                    .update_participant(&queue.id, &participant)
                    .await?;
            }
            ParticipantAction::Served => {
                let participant = queue.serve(participant_id, now)?;
                self.queue_repo
                    .update_participant(&queue.id, &participant)
                    .await?;
            }
            ParticipantAction::Remove => {
                queue.remove(participant_id)?;
                self.queue_repo
                    .remove_participant(&queue.id, participant_id)
                    .await?;
            }
        }

        tracing::debug!(
            queue_id = %queue.id,
            participant_id = %participant_id,
            action = ?action,
            "Participant action applied"
        );
        Ok(queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_name() {
        let result = validate_queue_fields("  ", "Org", 5, 1000);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let result = validate_queue_fields("Clinic", "Org", 0, 1000);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_validate_rejects_bad_expiry() {
        let result = validate_queue_fields("Clinic", "Org", 5, 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_accepts_valid_fields() {
        assert!(validate_queue_fields("Clinic", "Org", 5, 1000).is_ok());
    }

    #[test]
    fn test_action_wire_names() {
        let action: ParticipantAction = serde_json::from_str("\"current\"").unwrap();
        assert_eq!(action, ParticipantAction::Current);
        let action: ParticipantAction = serde_json::from_str("\"remove\"").unwrap();
        assert_eq!(action, ParticipantAction::Remove);
        assert!(serde_json::from_str::<ParticipantAction>("\"promote\"").is_err());
    }
}
