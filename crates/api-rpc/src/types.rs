//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use serde::{Deserialize, Serialize};
use waitline_core::application::ParticipantAction;
use waitline_core::domain::{Participant, Queue};

/// queue.join.v1 - Join a queue by public token
#[derive(Debug, Deserialize)]
pub struct JoinQueueRequest {
    pub token: String,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinQueueResponse {
    pub message: String,
    pub position: i64,
    pub estimated_wait_minutes: i64,
    /// Queue capacity
    pub queue_size: i64,
    pub current_size: i64,
}

/// queue.info.v1 - Public queue details for the join page
#[derive(Debug, Deserialize)]
pub struct QueueInfoRequest {
    pub token: String,
    /// When supplied, the response reports this phone's enrollment
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueInfoResponse {
    pub queue: QueueInfoBody,
    pub is_in_queue: bool,
    pub position: Option<i64>,
    pub estimated_wait_minutes: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueInfoBody {
    pub name: String,
    pub organization: String,
    pub description: String,
    pub queue_size: i64,
    pub current_size: i64,
    pub is_full: bool,
    pub expires_at: i64,
}

/// owner.create.v1 - Create a queue
#[derive(Debug, Deserialize)]
pub struct CreateQueueRequest {
    /// Externally-authenticated principal
    pub owner_id: String,
    pub name: String,
    pub organization: String,
    pub capacity: i64,
    pub expires_at: i64,
    pub description: String,
}

/// owner.update.v1 - Update owner-editable fields
#[derive(Debug, Deserialize)]
pub struct UpdateQueueRequest {
    pub owner_id: String,
    pub token: String,
    pub name: String,
    pub organization: String,
    pub capacity: i64,
    pub expires_at: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// owner.delete.v1 - Delete a queue (cascades to participants)
#[derive(Debug, Deserialize)]
pub struct DeleteQueueRequest {
    pub owner_id: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteQueueResponse {
    pub deleted: bool,
}

/// owner.get.v1 - Fetch one owned queue with participants
#[derive(Debug, Deserialize)]
pub struct GetQueueRequest {
    pub owner_id: String,
    pub token: String,
}

/// owner.list.v1 - List the owner's queues
#[derive(Debug, Deserialize)]
pub struct ListQueuesRequest {
    pub owner_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListQueuesResponse {
    pub queues: Vec<QueueDto>,
}

/// owner.participant.v1 - Apply an action to one participant
#[derive(Debug, Deserialize)]
pub struct ParticipantActionRequest {
    pub owner_id: String,
    pub token: String,
    pub participant_id: String,
    pub action: ParticipantAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantActionResponse {
    pub message: String,
    pub queue: QueueDto,
}

/// admin.stats.v1 - Engine statistics
#[derive(Debug, Deserialize)]
pub struct StatsRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total_queues: i64,
    pub active_queues: i64,
    pub total_participants: i64,
    pub waiting_participants: i64,
    pub db_size_bytes: i64,
    pub uptime_seconds: i64,
}

/// admin.maintenance.v1 - Run manual maintenance
#[derive(Debug, Deserialize)]
pub struct MaintenanceRequest {
    #[serde(default)]
    pub force_vacuum: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceResponse {
    pub vacuum_run: bool,
    pub queues_deleted: i64,
    pub db_size_before: i64,
    pub db_size_after: i64,
}

/// Wire representation of a queue
#[derive(Debug, Clone, Serialize)]
pub struct QueueDto {
    pub id: String,
    pub token: String,
    pub name: String,
    pub organization: String,
    pub description: String,
    pub capacity: i64,
    pub current_size: i64,
    pub expires_at: i64,
    pub join_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub participants: Vec<ParticipantDto>,
}

impl From<&Queue> for QueueDto {
    fn from(queue: &Queue) -> Self {
        Self {
            id: queue.id.clone(),
            token: queue.token.clone(),
            name: queue.name.clone(),
            organization: queue.organization.clone(),
            description: queue.description.clone(),
            capacity: queue.capacity,
            current_size: queue.current_size(),
            expires_at: queue.expires_at,
            join_url: queue.join_url.clone(),
            created_at: queue.created_at,
            updated_at: queue.updated_at,
            participants: queue.participants.iter().map(ParticipantDto::from).collect(),
        }
    }
}

/// Wire representation of a participant
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantDto {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub position: i64,
    pub status: String,
    pub joined_at: i64,
    pub estimated_wait_minutes: i64,
    pub processed_at: Option<i64>,
    pub skipped_at: Option<i64>,
    pub served_at: Option<i64>,
}

impl From<&Participant> for ParticipantDto {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            phone: p.phone.clone(),
            position: p.position,
            status: p.status.to_string(),
            joined_at: p.joined_at,
            estimated_wait_minutes: p.estimated_wait_minutes,
            processed_at: p.processed_at,
            skipped_at: p.skipped_at,
            served_at: p.served_at,
        }
    }
}
