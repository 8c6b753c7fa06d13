//! Student repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database row for the `students` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StudentRow {
    pub id: Uuid,
    pub school_id: Uuid,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for students
#[derive(Debug, Clone)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    /// Creates a new StudentRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a student
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ForeignKeyViolation` if the school does not exist
    #[instrument(skip(self, row), fields(student_id = %row.id))]
    pub async fn insert(&self, row: &StudentRow) -> Result<StudentRow, DatabaseError> {
        let student = sqlx::query_as::<_, StudentRow>(
            r#"
            INSERT INTO students (id, school_id, full_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, school_id, full_name, created_at, updated_at
            "#,
        )
        .bind(row.id)
        .bind(row.school_id)
        .bind(&row.full_name)
        .bind(row.created_at)
        .bind(row.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(student)
    }

    /// Retrieves a student by ID
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<StudentRow>, DatabaseError> {
        let student = sqlx::query_as::<_, StudentRow>(
            "SELECT id, school_id, full_name, created_at, updated_at FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    /// Lists students in creation order
    #[instrument(skip(self))]
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<StudentRow>, DatabaseError> {
        let students = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, school_id, full_name, created_at, updated_at
            FROM students
            ORDER BY created_at, id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// Lists a school's students in creation order
    ///
    /// # Arguments
    ///
    /// * `school_id` - The owning school
    /// * `window` - `(offset, limit)`, or `None` for every student
    #[instrument(skip(self))]
    pub async fn list_by_school(
        &self,
        school_id: Uuid,
        window: Option<(i64, i64)>,
    ) -> Result<Vec<StudentRow>, DatabaseError> {
        // A NULL limit is unbounded in PostgreSQL
        let (offset, limit) = match window {
            Some((offset, limit)) => (offset, Some(limit)),
            None => (0, None),
        };

        let students = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, school_id, full_name, created_at, updated_at
            FROM students
            WHERE school_id = $1
            ORDER BY created_at, id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(school_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// Finds a student of a school by exact name
    #[instrument(skip(self))]
    pub async fn find_by_name(
        &self,
        school_id: Uuid,
        full_name: &str,
    ) -> Result<Option<StudentRow>, DatabaseError> {
        let student = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, school_id, full_name, created_at, updated_at
            FROM students
            WHERE school_id = $1 AND full_name = $2
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(school_id)
        .bind(full_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    /// Overwrites a student's mutable columns
    #[instrument(skip(self, row), fields(student_id = %row.id))]
    pub async fn update(&self, row: &StudentRow) -> Result<Option<StudentRow>, DatabaseError> {
        let student = sqlx::query_as::<_, StudentRow>(
            r#"
            UPDATE students
            SET school_id = $2, full_name = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, school_id, full_name, created_at, updated_at
            "#,
        )
        .bind(row.id)
        .bind(row.school_id)
        .bind(&row.full_name)
        .bind(row.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    /// Deletes a student, returning whether a row was removed
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
