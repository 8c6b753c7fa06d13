//! School Billing - API Server Binary
//!
//! This binary starts the HTTP API server for the school billing ledger.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin billing-api
//!
//! # Run with environment variables
//! API_PORT=8080 API_DATABASE_URL=postgres://... cargo run --bin billing-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_DB_MIN_CONNECTIONS` / `API_DB_MAX_CONNECTIONS` - Pool size (default: 2 / 10)
//! * `API_DB_ACQUIRE_TIMEOUT_SECS` - Wait for a pooled connection (default: 30)
//! * `API_DB_IDLE_TIMEOUT_SECS` / `API_DB_MAX_LIFETIME_SECS` - Connection recycling (default: 600 / 1800)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_ADMIN_USERNAME` / `API_ADMIN_PASSWORD` - Admin login
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_LOG_JSON` - Emit JSON log lines (default: false)
//! * `API_SEED_DEMO_DATA` - Insert the demo school at startup (default: false)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use domain_billing::BillingService;
use infra_db::{create_pool, run_migrations, seed_demo_data, PostgresBillingAdapter};
use interface_api::{config::ApiConfig, create_router, metrics::HttpMetrics};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, establishes database connection,
/// applies migrations and starts the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid API_* configuration")?;

    init_tracing(&config);

    tracing::info!(
        service = %config.service_name,
        host = %config.host,
        port = %config.port,
        "Starting school billing API server"
    );

    for field in config.insecure_defaults() {
        tracing::warn!(field, "Setting is left at its development default; do not use in production");
    }

    let pool = create_pool(config.database_config())
        .await
        .context("failed to connect to the database")?;

    run_migrations(&pool)
        .await
        .context("failed to apply database migrations")?;

    if config.seed_demo_data {
        seed_demo_data(&pool)
            .await
            .context("failed to seed demo data")?;
    }

    let service = BillingService::from_store(Arc::new(PostgresBillingAdapter::new(pool)));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_addr()))?;

    let metrics = HttpMetrics::new().context("failed to register request metrics")?;
    let app = create_router(service, config, metrics);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(config: &ApiConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// This enables graceful shutdown of the server, allowing in-flight
/// requests to complete before the process exits.
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
