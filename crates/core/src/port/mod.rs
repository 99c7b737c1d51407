// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod maintenance;
pub mod queue_repository;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use id_provider::IdProvider;
pub use maintenance::{Maintenance, MaintenanceConfig, MaintenanceStats};
pub use queue_repository::QueueRepository;
pub use time_provider::TimeProvider;
pub use transaction::{QueueRepositoryTransaction, Transaction, TransactionalQueueRepository};
