//! Training Journal - API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Run against PostgreSQL
//! JOURNAL_DATABASE_URL=postgres://... JOURNAL_JWT_SECRET=... cargo run --bin journal-api
//!
//! # Run on the in-memory store
//! JOURNAL_STORE_BACKEND=memory cargo run --bin journal-api
//! ```
//!
//! # Environment Variables
//!
//! * `JOURNAL_HOST` - Server host (default: 0.0.0.0)
//! * `JOURNAL_PORT` - Server port (default: 8080)
//! * `JOURNAL_JWT_SECRET` - token signing secret shared with the identity provider
//! * `JOURNAL_JWT_ISSUER`, `JOURNAL_JWT_AUDIENCE` - optional claim checks
//! * `JOURNAL_DATABASE_URL` - PostgreSQL connection string
//! * `JOURNAL_STORE_BACKEND` - `postgres` (default) or `memory`
//! * `JOURNAL_LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! * `JOURNAL_LOG_FORMAT` - `pretty` (default) or `json`
//! * `JOURNAL_DEFAULT_TIMEZONE` - IANA name used for "today" (default: UTC)
//! * `JOURNAL_EVIDENCE_THRESHOLD` - default confirmed evidence per checkoff (default: 3)
//! * `JOURNAL_MAX_PAGE_SIZE` - cap on listed entries (default: 200)

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infra_store::{create_pool, DatabaseConfig, KeyValueStore, MemoryStore, PostgresStore, StoreBackend};
use interface_api::config::{ApiConfig, LogFormat};
use interface_api::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid configuration")?;

    init_tracing(&config.log_level, config.log_format);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = %config.store_backend,
        timezone = %config.default_timezone,
        "Starting training journal API server"
    );

    let store = open_store(&config).await?;
    let state = AppState::from_store(config.clone(), store).context("invalid configuration")?;
    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse().context("invalid server address")?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Opens the configured backend, running migrations on PostgreSQL
async fn open_store(config: &ApiConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = create_pool(DatabaseConfig::new(config.database_url.clone()))
                .await
                .context("database connection failed")?;
            let store = PostgresStore::new(pool);
            store.migrate().await.context("database migration failed")?;
            tracing::info!("Database ready");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
