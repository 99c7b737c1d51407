// Application Layer - Use Cases and Business Logic

pub mod admin;
pub mod info;
pub mod join;
pub mod maintenance;

// Re-exports
pub use admin::{
    CreateQueueRequest, ParticipantAction, QueueAdminService, UpdateQueueRequest,
};
pub use info::{queue_info, QueueInfo};
pub use join::JoinService;
pub use maintenance::MaintenanceScheduler;
