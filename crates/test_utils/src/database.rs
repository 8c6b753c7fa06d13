//! Database Test Utilities
//!
//! Starts one PostgreSQL container per test binary and hands each test its
//! own connection pool. Setting `TEST_DATABASE_URL` points the tests at an
//! existing server instead and skips the container.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Environment variable naming an existing test database
pub const TEST_DATABASE_URL_VAR: &str = "TEST_DATABASE_URL";

const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_PORT: u16 = 5432;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A running test database
pub struct TestDatabase {
    // Keeps the container alive for the life of the test binary.
    _container: Option<ContainerAsync<Postgres>>,
    url: String,
}

impl TestDatabase {
    /// Uses `TEST_DATABASE_URL` when set, otherwise starts a container
    pub async fn start() -> Result<Self, BoxError> {
        if let Ok(url) = std::env::var(TEST_DATABASE_URL_VAR) {
            return Ok(Self {
                _container: None,
                url,
            });
        }

        let container = Postgres::default().with_tag(POSTGRES_TAG).start().await?;
        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(POSTGRES_PORT).await?;

        Ok(Self {
            _container: Some(container),
            url: postgres_url(&host.to_string(), port),
        })
    }

    /// Connection string for this database
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Opens a fresh pool
    ///
    /// Each `#[tokio::test]` runs its own runtime, so pools are not shared
    /// between tests.
    pub async fn connect(&self) -> Result<PgPool, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&self.url)
            .await?;
        Ok(pool)
    }
}

static SHARED_TEST_DB: OnceCell<TestDatabase> = OnceCell::const_new();

/// Gets or starts the database shared by every test in this binary
pub async fn shared_test_database() -> Result<&'static TestDatabase, BoxError> {
    SHARED_TEST_DB.get_or_try_init(TestDatabase::start).await
}

/// Connects a new pool to the shared test database
pub async fn test_pool() -> Result<PgPool, BoxError> {
    shared_test_database().await?.connect().await
}

/// Default credentials of the `postgres` module image
fn postgres_url(host: &str, port: u16) -> String {
    format!("postgres://postgres:postgres@{host}:{port}/postgres")
}
