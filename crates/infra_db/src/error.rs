//! Database error types
//!
//! This module defines the error types that can occur during database operations,
//! providing meaningful error messages and proper error chaining.

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur during database operations
///
/// This enum captures all possible database-related errors, including
/// connection issues, query failures, and constraint violations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Invoice", "INV-123");
    /// assert!(error.to_string().contains("Invoice"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }

    /// Maps a PostgreSQL SQLSTATE code to an error variant
    ///
    /// See <https://www.postgresql.org/docs/current/errcodes-appendix.html>
    pub fn from_sqlstate(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            "23505" => DatabaseError::DuplicateEntry(message),
            "23503" => DatabaseError::ForeignKeyViolation(message),
            "23514" => DatabaseError::ConstraintViolation(message),
            _ => DatabaseError::QueryFailed(message),
        }
    }
}

/// Converts SQLx errors to more specific DatabaseError variants
///
/// Database errors are classified by their PostgreSQL error code so that
/// constraint violations surface as distinct variants.
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::Database(db_err) => match db_err.code() {
                Some(code) => DatabaseError::from_sqlstate(code.as_ref(), db_err.message()),
                None => DatabaseError::QueryFailed(db_err.message().to_string()),
            },
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

/// Translates database errors into the port error contract
///
/// - Foreign key and check violations on writes -> `PortError::Validation`
/// - Duplicate keys -> `PortError::Conflict`
/// - Connection problems -> `PortError::Connection`
/// - Anything else -> `PortError::Internal`
impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(message) => PortError::NotFound {
                entity_type: "Record".to_string(),
                id: message,
            },
            DatabaseError::ForeignKeyViolation(message) | DatabaseError::ConstraintViolation(message) => {
                PortError::validation(message)
            }
            DatabaseError::DuplicateEntry(message) => PortError::conflict(message),
            e @ (DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted) => {
                PortError::Connection {
                    message: e.to_string(),
                    source: Some(Box::new(e)),
                }
            }
            e => PortError::Internal {
                message: e.to_string(),
                source: Some(Box::new(e)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlstate_mapping() {
        assert!(matches!(
            DatabaseError::from_sqlstate("23505", "dup"),
            DatabaseError::DuplicateEntry(_)
        ));
        assert!(matches!(
            DatabaseError::from_sqlstate("23503", "fk"),
            DatabaseError::ForeignKeyViolation(_)
        ));
        assert!(matches!(
            DatabaseError::from_sqlstate("23514", "check"),
            DatabaseError::ConstraintViolation(_)
        ));
        assert!(matches!(
            DatabaseError::from_sqlstate("42P01", "missing table"),
            DatabaseError::QueryFailed(_)
        ));
    }

    #[test]
    fn test_pool_timeout_is_connection_error() {
        let error = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(error.is_connection_error());
        assert!(PortError::from(error).is_connection());
    }

    #[test]
    fn test_foreign_key_becomes_validation() {
        let port = PortError::from(DatabaseError::ForeignKeyViolation("students_school_id_fkey".into()));
        assert!(matches!(port, PortError::Validation { .. }));
    }

    #[test]
    fn test_duplicate_becomes_conflict() {
        let port = PortError::from(DatabaseError::DuplicateEntry("schools_pkey".into()));
        assert!(matches!(port, PortError::Conflict { .. }));
    }
}
