//! SDK Request/Response Types
//!
//! Mirrors the JSON-RPC types from the api-rpc crate.

use serde::{Deserialize, Serialize};

/// Request to join a queue by its public token
#[derive(Debug, Clone, Serialize)]
pub struct JoinRequest {
    pub token: String,
    pub name: String,
    pub phone: String,
}

/// Response from a successful join
#[derive(Debug, Clone, Deserialize)]
pub struct JoinResponse {
    pub message: String,
    pub position: i64,
    pub estimated_wait_minutes: i64,
    pub queue_size: i64,
    pub current_size: i64,
}

/// Request for public queue information
#[derive(Debug, Clone, Serialize)]
pub struct QueueInfoRequest {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Public queue information
#[derive(Debug, Clone, Deserialize)]
pub struct QueueInfoResponse {
    pub queue: QueueInfo,
    pub is_in_queue: bool,
    pub position: Option<i64>,
    pub estimated_wait_minutes: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueInfo {
    pub name: String,
    pub organization: String,
    pub description: String,
    pub queue_size: i64,
    pub current_size: i64,
    pub is_full: bool,
    pub expires_at: i64,
}

/// Request to create a queue
#[derive(Debug, Clone, Serialize)]
pub struct CreateQueueRequest {
    pub owner_id: String,
    pub name: String,
    pub organization: String,
    pub capacity: i64,
    pub expires_at: i64,
    pub description: String,
}

/// Request to update owner-editable queue fields
#[derive(Debug, Clone, Serialize)]
pub struct UpdateQueueRequest {
    pub owner_id: String,
    pub token: String,
    pub name: String,
    pub organization: String,
    pub capacity: i64,
    pub expires_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Response from delete operation
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteQueueResponse {
    pub deleted: bool,
}

/// Response from list operation
#[derive(Debug, Clone, Deserialize)]
pub struct ListQueuesResponse {
    pub queues: Vec<QueueDetails>,
}

/// Response from a participant action
#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantActionResponse {
    pub message: String,
    pub queue: QueueDetails,
}

/// Full queue details as returned by owner methods
#[derive(Debug, Clone, Deserialize)]
pub struct QueueDetails {
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
    pub participants: Vec<ParticipantDetails>,
}

/// Participant details within a queue
#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantDetails {
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

/// Engine statistics
#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    pub total_queues: i64,
    pub active_queues: i64,
    pub total_participants: i64,
    pub waiting_participants: i64,
    pub db_size_bytes: i64,
    pub uptime_seconds: i64,
}
