//! School repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database row for the `schools` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SchoolRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for schools
#[derive(Debug, Clone)]
pub struct SchoolRepository {
    pool: PgPool,
}

impl SchoolRepository {
    /// Creates a new SchoolRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a school
    #[instrument(skip(self, row), fields(school_id = %row.id))]
    pub async fn insert(&self, row: &SchoolRow) -> Result<SchoolRow, DatabaseError> {
        let school = sqlx::query_as::<_, SchoolRow>(
            r#"
            INSERT INTO schools (id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(row.id)
        .bind(&row.name)
        .bind(row.created_at)
        .bind(row.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(school)
    }

    /// Retrieves a school by ID
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<SchoolRow>, DatabaseError> {
        let school = sqlx::query_as::<_, SchoolRow>(
            "SELECT id, name, created_at, updated_at FROM schools WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(school)
    }

    /// Lists schools in creation order
    #[instrument(skip(self))]
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<SchoolRow>, DatabaseError> {
        let schools = sqlx::query_as::<_, SchoolRow>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM schools
            ORDER BY created_at, id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(schools)
    }

    /// Finds a school by exact name
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Option<SchoolRow>, DatabaseError> {
        let school = sqlx::query_as::<_, SchoolRow>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM schools
            WHERE name = $1
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(school)
    }

    /// Overwrites a school's mutable columns
    ///
    /// # Returns
    ///
    /// The stored row, or `None` if no school has this ID
    #[instrument(skip(self, row), fields(school_id = %row.id))]
    pub async fn update(&self, row: &SchoolRow) -> Result<Option<SchoolRow>, DatabaseError> {
        let school = sqlx::query_as::<_, SchoolRow>(
            r#"
            UPDATE schools
            SET name = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(row.id)
        .bind(&row.name)
        .bind(row.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(school)
    }

    /// Deletes a school, returning whether a row was removed
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ForeignKeyViolation` while students reference it
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM schools WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
