//! Waitline Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    CreateQueueRequest, DeleteQueueResponse, JoinRequest, JoinResponse, ListQueuesResponse,
    ParticipantActionResponse, QueueDetails, QueueInfoRequest, QueueInfoResponse, StatsResponse,
    UpdateQueueRequest,
};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use std::time::Duration;

/// Waitline Queue Engine Client
///
/// Provides a high-level interface to interact with the Waitline daemon.
///
/// # Example
///
/// ```no_run
/// use waitline_sdk::WaitlineClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = WaitlineClient::connect("http://127.0.0.1:9641").await?;
/// # Ok(())
/// # }
/// ```
pub struct WaitlineClient {
    client: HttpClient,
}

impl WaitlineClient {
    /// Connect to the Waitline daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9641`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Join a queue by its public token
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use waitline_sdk::{WaitlineClient, JoinRequest};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = WaitlineClient::connect("http://127.0.0.1:9641").await?;
    /// let response = client.join(JoinRequest {
    ///     token: "queue-token".to_string(),
    ///     name: "Alice".to_string(),
    ///     phone: "555-0101".to_string(),
    /// }).await?;
    ///
    /// println!("Position: {}", response.position);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn join(&self, request: JoinRequest) -> Result<JoinResponse> {
        let params = rpc_params![request];
        let response: JoinResponse = self.client.request("queue.join.v1", params).await?;

        Ok(response)
    }

    /// Fetch public queue information for the join page
    ///
    /// When `phone` is supplied, the response reports whether that phone
    /// number is already enrolled and at which position.
    pub async fn queue_info(
        &self,
        token: impl Into<String>,
        phone: Option<String>,
    ) -> Result<QueueInfoResponse> {
        let request = QueueInfoRequest {
            token: token.into(),
            phone,
        };
        let params = rpc_params![request];
        let response: QueueInfoResponse = self.client.request("queue.info.v1", params).await?;

        Ok(response)
    }

    /// Create a new queue
    pub async fn create_queue(&self, request: CreateQueueRequest) -> Result<QueueDetails> {
        let params = rpc_params![request];
        let response: QueueDetails = self.client.request("owner.create.v1", params).await?;

        Ok(response)
    }

    /// Update owner-editable fields of a queue
    pub async fn update_queue(&self, request: UpdateQueueRequest) -> Result<QueueDetails> {
        let params = rpc_params![request];
        let response: QueueDetails = self.client.request("owner.update.v1", params).await?;

        Ok(response)
    }

    /// Delete a queue and all of its participants
    pub async fn delete_queue(
        &self,
        owner_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<DeleteQueueResponse> {
        let request = serde_json::json!({
            "owner_id": owner_id.into(),
            "token": token.into(),
        });
        let params = rpc_params![request];
        let response: DeleteQueueResponse = self.client.request("owner.delete.v1", params).await?;

        Ok(response)
    }

    /// Fetch one owned queue with its participants
    pub async fn get_queue(
        &self,
        owner_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<QueueDetails> {
        let request = serde_json::json!({
            "owner_id": owner_id.into(),
            "token": token.into(),
        });
        let params = rpc_params![request];
        let response: QueueDetails = self.client.request("owner.get.v1", params).await?;

        Ok(response)
    }

    /// List all queues belonging to an owner
    pub async fn list_queues(&self, owner_id: impl Into<String>) -> Result<ListQueuesResponse> {
        let request = serde_json::json!({ "owner_id": owner_id.into() });
        let params = rpc_params![request];
        let response: ListQueuesResponse = self.client.request("owner.list.v1", params).await?;

        Ok(response)
    }

    /// Apply an action to a participant
    ///
    /// Valid actions: `current`, `skip`, `served`, `remove`.
    pub async fn participant_action(
        &self,
        owner_id: impl Into<String>,
        token: impl Into<String>,
        participant_id: impl Into<String>,
        action: impl Into<String>,
    ) -> Result<ParticipantActionResponse> {
        let request = serde_json::json!({
            "owner_id": owner_id.into(),
            "token": token.into(),
            "participant_id": participant_id.into(),
            "action": action.into(),
        });
        let params = rpc_params![request];
        let response: ParticipantActionResponse =
            self.client.request("owner.participant.v1", params).await?;

        Ok(response)
    }

    /// Fetch engine statistics
    pub async fn stats(&self) -> Result<StatsResponse> {
        let params = rpc_params![serde_json::json!({})];
        let response: StatsResponse = self.client.request("admin.stats.v1", params).await?;

        Ok(response)
    }
}
