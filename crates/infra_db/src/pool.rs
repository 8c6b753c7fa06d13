//! Connection pool and schema migrations
//!
//! The pool is sized and timed from [`DatabaseConfig`], which the API binary
//! fills from its `API_DB_*` settings.

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::DatabaseError;

/// Type alias for the PostgreSQL connection pool
pub type DatabasePool = PgPool;

/// Schema migrations embedded from `migrations/`
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Pool settings for the billing database
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use infra_db::DatabaseConfig;
///
/// let config = DatabaseConfig::new("postgres://localhost/school_billing")
///     .with_pool_size(1, 4)
///     .with_acquire_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_connections, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    /// How long a request waits for a free connection
    pub acquire_timeout: Duration,
    /// Idle connections above `min_connections` are closed after this
    pub idle_timeout: Duration,
    /// Connections are recycled after this age
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    /// Settings for `url` with a small pool suited to a single API process
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            min_connections: 2,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }

    pub fn with_pool_size(mut self, min_connections: u32, max_connections: u32) -> Self {
        self.min_connections = min_connections;
        self.max_connections = max_connections;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Sets the idle timeout and the maximum connection age
    pub fn with_recycling(mut self, idle_timeout: Duration, max_lifetime: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self.max_lifetime = max_lifetime;
        self
    }

    /// Pool options for these settings
    ///
    /// A zero `max_connections` is raised to one, and `min_connections` never
    /// exceeds the maximum.
    fn pool_options(&self) -> PgPoolOptions {
        let max = self.max_connections.max(1);
        let min = self.min_connections.min(max);
        if min != self.min_connections || max != self.max_connections {
            warn!(
                requested_min = self.min_connections,
                requested_max = self.max_connections,
                min,
                max,
                "Adjusted inconsistent pool size"
            );
        }

        PgPoolOptions::new()
            .min_connections(min)
            .max_connections(max)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
    }
}

/// Connects a pool with the given settings
///
/// # Errors
///
/// Returns `DatabaseError::ConnectionFailed` if no connection can be opened
pub async fn create_pool(config: DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!(
        min_connections = config.min_connections,
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        "Connecting to the billing database"
    );

    let pool = config
        .pool_options()
        .connect(&config.url)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Database pool ready");
    Ok(pool)
}

/// Applies any pending schema migrations
///
/// # Errors
///
/// Returns `DatabaseError::MigrationFailed` if a migration cannot be applied
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    info!("Running database migrations");
    MIGRATOR.run(pool).await?;
    info!("Database migrations completed");
    Ok(())
}
