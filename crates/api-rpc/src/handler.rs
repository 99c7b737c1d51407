//! RPC Method Handlers
//!
//! Implements the business logic for each JSON-RPC method.

use crate::error::{code, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::{
    CreateQueueRequest, DeleteQueueRequest, DeleteQueueResponse, GetQueueRequest,
    JoinQueueRequest, JoinQueueResponse, ListQueuesRequest, ListQueuesResponse,
    MaintenanceRequest, MaintenanceResponse, ParticipantActionRequest, ParticipantActionResponse,
    QueueDto, QueueInfoBody, QueueInfoRequest, QueueInfoResponse, StatsRequest, StatsResponse,
    UpdateQueueRequest,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use waitline_core::application::{self, JoinService, QueueAdminService};
use waitline_core::domain::{JoinRequest, ParticipantStatus, WaitTimeEstimator};
use waitline_core::error::AppError;
use waitline_core::port::{Maintenance, MaintenanceConfig, QueueRepository, TimeProvider};

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    join_service: Arc<JoinService>,
    admin_service: Arc<QueueAdminService>,
    queue_repo: Arc<dyn QueueRepository>,
    maintenance: Arc<dyn Maintenance>,
    time_provider: Arc<dyn TimeProvider>,
    estimator: WaitTimeEstimator,
    rate_limiter: Arc<RateLimiter>,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(
        join_service: Arc<JoinService>,
        admin_service: Arc<QueueAdminService>,
        queue_repo: Arc<dyn QueueRepository>,
        maintenance: Arc<dyn Maintenance>,
        time_provider: Arc<dyn TimeProvider>,
        estimator: WaitTimeEstimator,
    ) -> Self {
        // Default: 200 burst, 100 req/sec (configurable via env)
        let max_burst: u32 = std::env::var("WAITLINE_RATE_LIMIT_BURST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(200);

        let rate_per_sec: u32 = std::env::var("WAITLINE_RATE_LIMIT_RATE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        Self {
            join_service,
            admin_service,
            queue_repo,
            maintenance,
            time_provider,
            estimator,
            rate_limiter: Arc::new(RateLimiter::new(max_burst, rate_per_sec)),
            start_time: std::time::Instant::now(),
        }
    }

    fn throttled() -> ErrorObjectOwned {
        ErrorObjectOwned::owned(
            code::THROTTLED,
            "Rate limit exceeded. Please slow down.",
            None::<()>,
        )
    }

    /// queue.join.v1
    pub async fn join(&self, params: JoinQueueRequest) -> Result<JoinQueueResponse, ErrorObjectOwned> {
        // Rate limiting check (anonymous mutating endpoint)
        if !self.rate_limiter.check().await {
            return Err(Self::throttled());
        }

        let outcome = self
            .join_service
            .join(
                &params.token,
                JoinRequest {
                    name: params.name,
                    phone: params.phone,
                },
            )
            .await
            .map_err(to_rpc_error)?;

        Ok(JoinQueueResponse {
            message: "Successfully joined queue".to_string(),
            position: outcome.participant.position,
            estimated_wait_minutes: outcome.participant.estimated_wait_minutes,
            queue_size: outcome.capacity,
            current_size: outcome.current_size,
        })
    }

    /// queue.info.v1
    pub async fn queue_info(
        &self,
        params: QueueInfoRequest,
    ) -> Result<QueueInfoResponse, ErrorObjectOwned> {
        let queue = self
            .queue_repo
            .find_by_token(&params.token)
            .await
            .map_err(to_rpc_error)?
            .ok_or_else(|| to_rpc_error(AppError::NotFound("Queue not found".to_string())))?;

        let info = application::queue_info(&queue, params.phone.as_deref(), &self.estimator);

        Ok(QueueInfoResponse {
            queue: QueueInfoBody {
                name: info.name,
                organization: info.organization,
                description: info.description,
                queue_size: info.queue_size,
                current_size: info.current_size,
                is_full: info.is_full,
                expires_at: info.expires_at,
            },
            is_in_queue: info.is_in_queue,
            position: info.position,
            estimated_wait_minutes: info.estimated_wait_minutes,
        })
    }

    /// owner.create.v1
    pub async fn create_queue(
        &self,
        params: CreateQueueRequest,
    ) -> Result<QueueDto, ErrorObjectOwned> {
        if !self.rate_limiter.check().await {
            return Err(Self::throttled());
        }

        let queue = self
            .admin_service
            .create_queue(
                &params.owner_id,
                application::CreateQueueRequest {
                    name: params.name,
                    organization: params.organization,
                    capacity: params.capacity,
                    expires_at: params.expires_at,
                    description: params.description,
                },
            )
            .await
            .map_err(to_rpc_error)?;

        Ok(QueueDto::from(&queue))
    }

    /// owner.update.v1
    pub async fn update_queue(
        &self,
        params: UpdateQueueRequest,
    ) -> Result<QueueDto, ErrorObjectOwned> {
        let queue = self
            .admin_service
            .update_queue(
                &params.owner_id,
                &params.token,
                application::UpdateQueueRequest {
                    name: params.name,
                    organization: params.organization,
                    capacity: params.capacity,
                    expires_at: params.expires_at,
                    description: params.description,
                },
            )
            .await
            .map_err(to_rpc_error)?;

        Ok(QueueDto::from(&queue))
    }

    /// owner.delete.v1
    pub async fn delete_queue(
        &self,
        params: DeleteQueueRequest,
    ) -> Result<DeleteQueueResponse, ErrorObjectOwned> {
        self.admin_service
            .delete_queue(&params.owner_id, &params.token)
            .await
            .map_err(to_rpc_error)?;

        Ok(DeleteQueueResponse { deleted: true })
    }

    /// owner.get.v1
    pub async fn get_queue(&self, params: GetQueueRequest) -> Result<QueueDto, ErrorObjectOwned> {
        let queue = self
            .admin_service
            .get_queue(&params.owner_id, &params.token)
            .await
            .map_err(to_rpc_error)?;

        Ok(QueueDto::from(&queue))
    }

    /// owner.list.v1
    pub async fn list_queues(
        &self,
        params: ListQueuesRequest,
    ) -> Result<ListQueuesResponse, ErrorObjectOwned> {
        let queues = self
            .admin_service
            .list_queues(&params.owner_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(ListQueuesResponse {
            queues: queues.iter().map(QueueDto::from).collect(),
        })
    }

    /// owner.participant.v1
    pub async fn participant_action(
        &self,
        params: ParticipantActionRequest,
    ) -> Result<ParticipantActionResponse, ErrorObjectOwned> {
        let queue = self
            .admin_service
            .participant_action(
                &params.owner_id,
                &params.token,
                &params.participant_id,
                params.action,
            )
            .await
            .map_err(to_rpc_error)?;

        Ok(ParticipantActionResponse {
            message: "Participant status updated successfully".to_string(),
            queue: QueueDto::from(&queue),
        })
    }

    /// admin.stats.v1
    pub async fn stats(&self, _params: StatsRequest) -> Result<StatsResponse, ErrorObjectOwned> {
        let now = self.time_provider.now_millis();

        let total_queues = self.queue_repo.count_queues().await.map_err(to_rpc_error)?;
        let active_queues = self
            .queue_repo
            .count_active_queues(now)
            .await
            .map_err(to_rpc_error)?;

        let waiting_participants = self
            .queue_repo
            .count_participants_by_status(ParticipantStatus::Waiting)
            .await
            .map_err(to_rpc_error)?;

        let db_stats = self.maintenance.get_stats().await.map_err(to_rpc_error)?;

        Ok(StatsResponse {
            total_queues,
            active_queues,
            total_participants: db_stats.participant_count,
            waiting_participants,
            db_size_bytes: db_stats.db_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs() as i64,
        })
    }

    /// admin.maintenance.v1
    pub async fn maintenance(
        &self,
        params: MaintenanceRequest,
    ) -> Result<MaintenanceResponse, ErrorObjectOwned> {
        let config = MaintenanceConfig::default();
        let now = self.time_provider.now_millis();

        let stats_before = self.maintenance.get_stats().await.map_err(to_rpc_error)?;

        let queues_deleted = self
            .maintenance
            .gc_expired_queues(config.expired_queue_retention_days, now)
            .await
            .map_err(to_rpc_error)?;

        let vacuum_run = params.force_vacuum || stats_before.db_size_mb > config.max_db_size_mb;
        if vacuum_run {
            self.maintenance.vacuum().await.map_err(to_rpc_error)?;
        }

        let stats_after = self.maintenance.get_stats().await.map_err(to_rpc_error)?;

        Ok(MaintenanceResponse {
            vacuum_run,
            queues_deleted,
            db_size_before: stats_before.db_size_bytes,
            db_size_after: stats_after.db_size_bytes,
        })
    }
}
