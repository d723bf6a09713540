//! Runs the `ShowBay` HTTP server.
//!
//! Configuration comes from environment variables (see
//! [`showbay::config`]); log verbosity follows `RUST_LOG` and defaults to
//! `info`. The `tasks` table is created on startup when missing.

use mockable::DefaultClock;
use showbay::{
    api,
    config::AppConfig,
    task::{
        adapters::{
            http::HttpEnrichmentClient,
            postgres::{PostgresTaskRepository, build_pool},
        },
        services::TaskLifecycleService,
    },
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    run().await.inspect_err(|err| error!(error = %err, "server stopped"))
}

async fn run() -> Result<(), BoxError> {
    let config = AppConfig::from_env()?;
    info!(bind_address = %config.bind_address, "starting ShowBay Task Management API");

    let pool_settings = config.pool.clone();
    let database_url = config.database_url.clone();
    let pool =
        tokio::task::spawn_blocking(move || build_pool(&database_url, &pool_settings)).await??;
    let repository = PostgresTaskRepository::new(pool);
    repository.ensure_schema().await?;
    info!("database schema ready");

    let enrichment = HttpEnrichmentClient::new(config.enrichment)?;
    let service = TaskLifecycleService::new(
        Arc::new(repository),
        Arc::new(enrichment),
        Arc::new(DefaultClock),
    );
    let app = api::router(Arc::new(service));

    let listener = TcpListener::bind(config.bind_address).await?;
    info!(address = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("shutting down ShowBay Task Management API");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        // Without a signal handler, keep serving until the process is killed.
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
