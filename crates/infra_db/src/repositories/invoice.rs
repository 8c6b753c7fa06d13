//! Invoice repository implementation
//!
//! Invoice totals are stored as `NUMERIC(12,2)` and read back as
//! `rust_decimal::Decimal`, so no floating point is involved at any step.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::error::DatabaseError;

const INVOICE_COLUMNS: &str =
    "id, student_id, total_amount, issued_at, due_date, description, created_at, updated_at";

/// Database row for the `invoices` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct InvoiceRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub total_amount: Decimal,
    pub issued_at: DateTime<Utc>,
    pub due_date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for invoices
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an invoice
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ForeignKeyViolation` if the student does not
    /// exist, or `DatabaseError::ConstraintViolation` for a negative total
    #[instrument(skip(self, row), fields(invoice_id = %row.id))]
    pub async fn insert(&self, row: &InvoiceRow) -> Result<InvoiceRow, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO invoices ({INVOICE_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {INVOICE_COLUMNS}
            "#
        );

        let invoice = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(row.id)
            .bind(row.student_id)
            .bind(row.total_amount)
            .bind(row.issued_at)
            .bind(row.due_date)
            .bind(&row.description)
            .bind(row.created_at)
            .bind(row.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(invoice)
    }

    /// Retrieves an invoice by ID
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<InvoiceRow>, DatabaseError> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1");

        let invoice = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    /// Lists invoices in creation order
    #[instrument(skip(self))]
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<InvoiceRow>, DatabaseError> {
        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY created_at, id OFFSET $1 LIMIT $2"
        );

        let invoices = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(invoices)
    }

    /// Lists invoices for a set of students in a single query
    ///
    /// Rows come back grouped by the position of their student in
    /// `student_ids`, then by `issued_at` and ID.
    #[instrument(skip(self, student_ids), fields(students = student_ids.len()))]
    pub async fn list_by_students(&self, student_ids: &[Uuid]) -> Result<Vec<InvoiceRow>, DatabaseError> {
        let sql = format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE student_id = ANY($1)
            ORDER BY array_position($1, student_id), issued_at, id
            "#
        );

        let invoices = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(student_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(invoices)
    }

    /// Finds an invoice matching every given column
    #[instrument(skip(self))]
    pub async fn find_matching(
        &self,
        student_id: Uuid,
        total_amount: Decimal,
        due_date: NaiveDate,
        description: &str,
    ) -> Result<Option<InvoiceRow>, DatabaseError> {
        let sql = format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE student_id = $1 AND total_amount = $2 AND due_date = $3 AND description = $4
            ORDER BY created_at, id
            LIMIT 1
            "#
        );

        let invoice = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(student_id)
            .bind(total_amount)
            .bind(due_date)
            .bind(description)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    /// Overwrites an invoice's mutable columns
    #[instrument(skip(self, row), fields(invoice_id = %row.id))]
    pub async fn update(&self, row: &InvoiceRow) -> Result<Option<InvoiceRow>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE invoices
            SET student_id = $2, total_amount = $3, issued_at = $4, due_date = $5,
                description = $6, updated_at = $7
            WHERE id = $1
            RETURNING {INVOICE_COLUMNS}
            "#
        );

        let invoice = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(row.id)
            .bind(row.student_id)
            .bind(row.total_amount)
            .bind(row.issued_at)
            .bind(row.due_date)
            .bind(&row.description)
            .bind(row.updated_at)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    /// Deletes an invoice, returning whether a row was removed
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
