//! API configuration

use std::time::Duration;

use infra_db::DatabaseConfig;
use serde::Deserialize;

const DEV_JWT_SECRET: &str = "change-me-in-production";
const DEV_ADMIN_PASSWORD: &str = "change_me";

/// API configuration
///
/// Loaded once at startup from `API_*` environment variables; every field
/// falls back to a local development default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Connections kept open even when idle
    pub db_min_connections: u32,
    /// Upper bound on pooled connections
    pub db_max_connections: u32,
    /// Seconds a request waits for a pooled connection
    pub db_acquire_timeout_secs: u64,
    /// Seconds before a surplus idle connection is closed
    pub db_idle_timeout_secs: u64,
    /// Seconds before any connection is recycled
    pub db_max_lifetime_secs: u64,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Username accepted by `/auth/login`
    pub admin_username: String,
    /// Password accepted by `/auth/login`
    pub admin_password: String,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Service name attached to startup logs
    pub service_name: String,
    /// Insert the demo school at startup
    pub seed_demo_data: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/school_billing".to_string(),
            db_min_connections: 2,
            db_max_connections: 10,
            db_acquire_timeout_secs: 30,
            db_idle_timeout_secs: 600,
            db_max_lifetime_secs: 1800,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration_secs: 3600,
            admin_username: "admin".to_string(),
            admin_password: DEV_ADMIN_PASSWORD.to_string(),
            log_level: "info".to_string(),
            log_json: false,
            service_name: "school-billing".to_string(),
            seed_demo_data: false,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for the billing database
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .with_pool_size(self.db_min_connections, self.db_max_connections)
            .with_acquire_timeout(Duration::from_secs(self.db_acquire_timeout_secs))
            .with_recycling(
                Duration::from_secs(self.db_idle_timeout_secs),
                Duration::from_secs(self.db_max_lifetime_secs),
            )
    }

    /// Names the settings still left at their development defaults
    pub fn insecure_defaults(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.jwt_secret == DEV_JWT_SECRET {
            fields.push("jwt_secret");
        }
        if self.admin_password == DEV_ADMIN_PASSWORD {
            fields.push("admin_password");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_flagged() {
        let config = ApiConfig::default();
        assert_eq!(config.insecure_defaults(), vec!["jwt_secret", "admin_password"]);
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overridden_secrets_are_not_flagged() {
        let config = ApiConfig {
            jwt_secret: "s3cret".into(),
            admin_password: "hunter2".into(),
            ..ApiConfig::default()
        };
        assert!(config.insecure_defaults().is_empty());
    }

    #[test]
    fn test_database_config_carries_pool_settings() {
        let config = ApiConfig {
            database_url: "postgres://ledger@db/billing".into(),
            db_min_connections: 1,
            db_max_connections: 25,
            db_acquire_timeout_secs: 5,
            db_idle_timeout_secs: 90,
            db_max_lifetime_secs: 900,
            ..ApiConfig::default()
        };

        let db = config.database_config();
        assert_eq!(db.url, "postgres://ledger@db/billing");
        assert_eq!((db.min_connections, db.max_connections), (1, 25));
        assert_eq!(db.acquire_timeout, Duration::from_secs(5));
        assert_eq!(db.idle_timeout, Duration::from_secs(90));
        assert_eq!(db.max_lifetime, Duration::from_secs(900));
    }

    #[test]
    fn test_default_pool_matches_database_defaults() {
        let config = ApiConfig::default();
        assert_eq!(
            config.database_config(),
            DatabaseConfig::new("postgres://localhost/school_billing")
        );
    }
}
