//! Waitline SDK - Rust Client Library
//!
//! Provides a convenient client for interacting with the Waitline Queue
//! Engine daemon.
//!
//! # Example
//!
//! ```no_run
//! use waitline_sdk::{WaitlineClient, JoinRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect to daemon
//!     let client = WaitlineClient::connect("http://127.0.0.1:9641").await?;
//!
//!     // Join a queue
//!     let response = client.join(JoinRequest {
//!         token: "queue-token".to_string(),
//!         name: "Alice".to_string(),
//!         phone: "555-0101".to_string(),
//!     }).await?;
//!
//!     println!("Position: {}", response.position);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::WaitlineClient;
pub use error::{Result, SdkError};
pub use types::{
    CreateQueueRequest, DeleteQueueResponse, JoinRequest, JoinResponse, ListQueuesResponse,
    ParticipantActionResponse, ParticipantDetails, QueueDetails, QueueInfo, QueueInfoRequest,
    QueueInfoResponse, StatsResponse, UpdateQueueRequest,
};
