//! JSON-RPC Server
//!
//! Serves the queue API over TCP on localhost. A fronting gateway terminates
//! TLS and authenticates owners before requests reach this process.

use crate::handler::RpcHandler;
use crate::types::{
    CreateQueueRequest, DeleteQueueRequest, GetQueueRequest, JoinQueueRequest, ListQueuesRequest,
    MaintenanceRequest, ParticipantActionRequest, QueueInfoRequest, StatsRequest,
    UpdateQueueRequest,
};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::{ErrorObjectOwned, Params};
use jsonrpsee::RpcModule;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::info;
use waitline_core::application::{JoinService, QueueAdminService};
use waitline_core::domain::WaitTimeEstimator;
use waitline_core::port::{Maintenance, QueueRepository, TimeProvider};

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9641;

/// Accepts both named params (`{...}`) and the single-positional form
/// (`[{...}]`) that `rpc_params!`-based clients send.
fn parse_params<T: DeserializeOwned>(params: Params<'_>) -> Result<T, ErrorObjectOwned> {
    match params.parse::<T>() {
        Ok(req) => Ok(req),
        Err(e) => params.one::<T>().map_err(|_| e),
    }
}

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        join_service: Arc<JoinService>,
        admin_service: Arc<QueueAdminService>,
        queue_repo: Arc<dyn QueueRepository>,
        maintenance: Arc<dyn Maintenance>,
        time_provider: Arc<dyn TimeProvider>,
        estimator: WaitTimeEstimator,
    ) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(
                join_service,
                admin_service,
                queue_repo,
                maintenance,
                time_provider,
                estimator,
            )),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Security: Only binds to 127.0.0.1 by default (no external access)
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server on TCP"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let mut module = RpcModule::new(());

        // Public methods
        let handler = self.handler.clone();
        module
            .register_async_method("queue.join.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: JoinQueueRequest = parse_params(params)?;
                    handler.join(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.info.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: QueueInfoRequest = parse_params(params)?;
                    handler.queue_info(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        // Owner methods
        let handler = self.handler.clone();
        module
            .register_async_method("owner.create.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: CreateQueueRequest = parse_params(params)?;
                    handler.create_queue(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("owner.update.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: UpdateQueueRequest = parse_params(params)?;
                    handler.update_queue(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("owner.delete.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: DeleteQueueRequest = parse_params(params)?;
                    handler.delete_queue(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("owner.get.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: GetQueueRequest = parse_params(params)?;
                    handler.get_queue(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("owner.list.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ListQueuesRequest = parse_params(params)?;
                    handler.list_queues(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("owner.participant.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ParticipantActionRequest = parse_params(params)?;
                    handler.participant_action(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        // Admin methods
        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: StatsRequest = parse_params(params)?;
                    handler.stats(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("admin.maintenance.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: MaintenanceRequest = parse_params(params)?;
                    handler.maintenance(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        info!("JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok(handle)
    }
}
