// Domain Error Types

use thiserror::Error;

/// Reasons a join request is turned away.
///
/// The display strings are part of the public API contract: clients show
/// them to end users verbatim.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinRejection {
    #[error("Name and phone are required")]
    InvalidInput,

    #[error("Queue has expired")]
    QueueExpired,

    #[error("Queue is full")]
    QueueFull,

    #[error("You are already in this queue")]
    AlreadyJoined,
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid participant status transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
