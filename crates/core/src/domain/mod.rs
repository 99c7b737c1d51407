// Domain Layer - Pure business logic and entities

pub mod error;
pub mod participant;
pub mod queue;
pub mod wait_time;

// Re-exports
pub use error::{DomainError, JoinRejection};
pub use participant::{Participant, ParticipantId, ParticipantStatus};
pub use queue::{JoinOutcome, JoinRequest, OwnerId, Queue, QueueId, QueueToken};
pub use wait_time::{WaitTimeEstimator, AVERAGE_SERVICE_MINUTES};
