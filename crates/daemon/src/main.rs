//! Waitline Queue Engine - Main Entry Point

mod telemetry;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use waitline_api_rpc::{server::RpcServerConfig, RpcServer};
use waitline_core::application::{JoinService, MaintenanceScheduler, QueueAdminService};
use waitline_core::domain::WaitTimeEstimator;
use waitline_core::port::id_provider::UuidProvider;
use waitline_core::port::time_provider::SystemTimeProvider;
use waitline_core::port::MaintenanceConfig;
use waitline_infra_sqlite::{create_pool, run_migrations, SqliteMaintenance, SqliteQueueRepository};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "~/.waitline/queues.db";
const DEFAULT_PUBLIC_URL: &str = "http://127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("WAITLINE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("waitline=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Waitline Queue Engine v{} starting...", VERSION);

    // 1.1. Initialize OpenTelemetry (optional)
    if let Err(e) = telemetry::init_telemetry() {
        tracing::warn!(error = ?e, "Failed to initialize OpenTelemetry (continuing without it)");
    }

    // 2. Load configuration
    let db_path = std::env::var("WAITLINE_DB_PATH")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DB_PATH).into_owned());

    let rpc_port: u16 = std::env::var("WAITLINE_RPC_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9641);

    let public_url =
        std::env::var("WAITLINE_PUBLIC_URL").unwrap_or_else(|_| DEFAULT_PUBLIC_URL.to_string());

    info!(db_path = %db_path, "Initializing database...");

    // 3. Initialize database
    let pool = create_pool(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);
    let estimator = WaitTimeEstimator::default();

    let queue_repo = Arc::new(SqliteQueueRepository::new(pool.clone()));
    let tx_queue_repo = Arc::new(SqliteQueueRepository::new(pool.clone()));
    let maintenance = Arc::new(SqliteMaintenance::new(pool.clone(), time_provider.clone()));

    let join_service = Arc::new(JoinService::new(
        tx_queue_repo,
        id_provider.clone(),
        time_provider.clone(),
        estimator,
    ));

    let admin_service = Arc::new(QueueAdminService::new(
        queue_repo.clone(),
        id_provider.clone(),
        time_provider.clone(),
        public_url,
    ));

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let rpc_config = RpcServerConfig {
        port: rpc_port,
        ..Default::default()
    };
    let rpc_server = RpcServer::new(
        rpc_config,
        join_service,
        admin_service,
        queue_repo.clone(),
        maintenance.clone(),
        time_provider.clone(),
        estimator,
    );
    let rpc_handle = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 6. Start maintenance scheduler
    info!("Starting maintenance scheduler...");
    let maintenance_config = MaintenanceConfig::default(); // 7 days retention
    let maintenance_scheduler = MaintenanceScheduler::new(
        maintenance,
        time_provider.clone(),
        maintenance_config,
        24, // Run every 24 hours
    );

    tokio::spawn(async move {
        maintenance_scheduler.run().await;
    });

    info!("System ready. Accepting queue operations.");
    info!("Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}
