// ABOUTME: Server bootstrap for the Tally backend
// ABOUTME: Logging setup, database connection, provider wiring and the axum server loop

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tally_api::{create_router, AppState};
use tally_config::IngestionSettings;
use tally_ingestion::PartitionKeyRouter;
use tally_warehouse::{SyncServiceClient, UnconfiguredSyncService, WarehouseConfig};

pub mod commands;
pub mod config;

#[cfg(test)]
mod tests;

pub use config::ServerConfig;

/// How often idle partition key buckets are dropped
const PARTITION_BUCKET_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Install the global tracing subscriber; `RUST_LOG` overrides the `info` default
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let pool = tally_storage::connect(config.database_path.clone()).await?;
    let settings = Arc::new(IngestionSettings::from_env());

    let state = match WarehouseConfig::from_env() {
        Ok(warehouse) => {
            info!("Sync service configured at {}", warehouse.api_url);
            AppState::new(pool, Arc::new(SyncServiceClient::new(warehouse)?), settings)
        }
        Err(e) => {
            warn!("Sync service not configured, source provisioning is disabled: {}", e);
            AppState::new(pool, Arc::new(UnconfiguredSyncService::new(e.to_string())), settings)
        }
    };

    tokio::spawn(prune_partition_buckets(state.partition_router.clone()));

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn prune_partition_buckets(router: Arc<PartitionKeyRouter>) {
    let mut interval = tokio::time::interval(PARTITION_BUCKET_CLEANUP_INTERVAL);
    loop {
        interval.tick().await;
        router.retain_recent();
        debug!("Tracking {} partition key buckets", router.tracked_keys());
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
