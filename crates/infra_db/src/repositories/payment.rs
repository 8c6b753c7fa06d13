//! Payment repository implementation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::error::DatabaseError;

const PAYMENT_COLUMNS: &str =
    "id, invoice_id, amount, paid_at, method, reference, created_at, updated_at";

/// Database row for the `payments` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub amount: Decimal,
    pub paid_at: Option<DateTime<Utc>>,
    pub method: Option<String>,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for payments
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a payment
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ForeignKeyViolation` if the invoice does not
    /// exist, or `DatabaseError::ConstraintViolation` for a non-positive amount
    #[instrument(skip(self, row), fields(payment_id = %row.id))]
    pub async fn insert(&self, row: &PaymentRow) -> Result<PaymentRow, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO payments ({PAYMENT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PAYMENT_COLUMNS}
            "#
        );

        let payment = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(row.id)
            .bind(row.invoice_id)
            .bind(row.amount)
            .bind(row.paid_at)
            .bind(&row.method)
            .bind(&row.reference)
            .bind(row.created_at)
            .bind(row.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(payment)
    }

    /// Retrieves a payment by ID
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<PaymentRow>, DatabaseError> {
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1");

        let payment = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    /// Lists payments in creation order
    #[instrument(skip(self))]
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<PaymentRow>, DatabaseError> {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY created_at, id OFFSET $1 LIMIT $2"
        );

        let payments = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    /// Lists payments for a set of invoices in a single query
    ///
    /// Ordered by `paid_at` with unknown dates last, then creation order.
    #[instrument(skip(self, invoice_ids), fields(invoices = invoice_ids.len()))]
    pub async fn list_by_invoices(&self, invoice_ids: &[Uuid]) -> Result<Vec<PaymentRow>, DatabaseError> {
        let sql = format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments
            WHERE invoice_id = ANY($1)
            ORDER BY paid_at ASC NULLS LAST, created_at, id
            "#
        );

        let payments = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(invoice_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    /// Finds a payment by invoice and external reference
    #[instrument(skip(self))]
    pub async fn find_by_reference(
        &self,
        invoice_id: Uuid,
        reference: &str,
    ) -> Result<Option<PaymentRow>, DatabaseError> {
        let sql = format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments
            WHERE invoice_id = $1 AND reference = $2
            ORDER BY created_at, id
            LIMIT 1
            "#
        );

        let payment = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(invoice_id)
            .bind(reference)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    /// Overwrites a payment's mutable columns
    #[instrument(skip(self, row), fields(payment_id = %row.id))]
    pub async fn update(&self, row: &PaymentRow) -> Result<Option<PaymentRow>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE payments
            SET invoice_id = $2, amount = $3, paid_at = $4, method = $5,
                reference = $6, updated_at = $7
            WHERE id = $1
            RETURNING {PAYMENT_COLUMNS}
            "#
        );

        let payment = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(row.id)
            .bind(row.invoice_id)
            .bind(row.amount)
            .bind(row.paid_at)
            .bind(&row.method)
            .bind(&row.reference)
            .bind(row.updated_at)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    /// Deletes a payment, returning whether a row was removed
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
