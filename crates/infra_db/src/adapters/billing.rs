//! PostgreSQL Billing Adapter
//!
//! This module provides the database adapter for the billing domain,
//! implementing the four billing ports on top of the per-table repositories.
//!
//! # Overview
//!
//! The `PostgresBillingAdapter` serves as the bridge between the domain
//! layer's port interfaces and the database layer. It:
//!
//! - Translates domain entities into row structs and back
//! - Turns foreign key violations on delete into `PortError::Conflict`
//! - Translates all other database errors via `From<DatabaseError>`
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresBillingAdapter;
//! use domain_billing::BillingService;
//! use std::sync::Arc;
//!
//! let adapter = Arc::new(PostgresBillingAdapter::new(pool));
//! let service = BillingService::from_store(adapter);
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, InvoiceId, Money, PaymentId,
    PortError, SchoolId, StudentId,
};
use domain_billing::{
    Invoice, InvoicePort, PageRequest, Payment, PaymentPort, School, SchoolPort, Student,
    StudentPort,
};

use crate::error::DatabaseError;
use crate::repositories::{
    InvoiceRepository, InvoiceRow, PaymentRepository, PaymentRow, SchoolRepository, SchoolRow,
    StudentRepository, StudentRow,
};

/// PostgreSQL-backed implementation of the billing ports
///
/// # Health Checking
///
/// The adapter implements `HealthCheckable` to verify database connectivity
/// with a `SELECT 1` round trip.
///
/// # Error Handling
///
/// - Foreign key violations on insert/update -> `PortError::Validation`
/// - Foreign key violations on delete -> `PortError::Conflict`
/// - Connection errors -> `PortError::Connection`
/// - Other errors -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresBillingAdapter {
    schools: SchoolRepository,
    students: StudentRepository,
    invoices: InvoiceRepository,
    payments: PaymentRepository,
    pool: PgPool,
}

impl PostgresBillingAdapter {
    /// Creates a new PostgreSQL billing adapter
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            schools: SchoolRepository::new(pool.clone()),
            students: StudentRepository::new(pool.clone()),
            invoices: InvoiceRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns the underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// Mark as a domain port
impl DomainPort for PostgresBillingAdapter {}

#[async_trait]
impl HealthCheckable for PostgresBillingAdapter {
    /// Checks database connectivity
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: "postgres-billing-adapter".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: "postgres-billing-adapter".to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl SchoolPort for PostgresBillingAdapter {
    #[instrument(skip(self, school), fields(school_id = %school.id))]
    async fn create_school(&self, school: School) -> Result<School, PortError> {
        let row = self.schools.insert(&school_to_row(&school)).await?;
        Ok(row_to_school(row))
    }

    #[instrument(skip(self))]
    async fn get_school(&self, id: SchoolId) -> Result<Option<School>, PortError> {
        let row = self.schools.get(id.into()).await?;
        Ok(row.map(row_to_school))
    }

    #[instrument(skip(self))]
    async fn list_schools(&self, page: PageRequest) -> Result<Vec<School>, PortError> {
        let (offset, limit) = window(page);
        let rows = self.schools.list(offset, limit).await?;
        Ok(rows.into_iter().map(row_to_school).collect())
    }

    #[instrument(skip(self, school), fields(school_id = %school.id))]
    async fn update_school(&self, school: School) -> Result<Option<School>, PortError> {
        let row = self.schools.update(&school_to_row(&school)).await?;
        Ok(row.map(row_to_school))
    }

    #[instrument(skip(self))]
    async fn delete_school(&self, id: SchoolId) -> Result<bool, PortError> {
        self.schools
            .delete(id.into())
            .await
            .map_err(|e| dependants_conflict(e, || format!("School {id} still has students")))
    }
}

#[async_trait]
impl StudentPort for PostgresBillingAdapter {
    #[instrument(skip(self, student), fields(student_id = %student.id))]
    async fn create_student(&self, student: Student) -> Result<Student, PortError> {
        let row = self
            .students
            .insert(&student_to_row(&student))
            .await
            .map_err(|e| missing_parent(e, "School", student.school_id, "school_id"))?;
        Ok(row_to_student(row))
    }

    #[instrument(skip(self))]
    async fn get_student(&self, id: StudentId) -> Result<Option<Student>, PortError> {
        let row = self.students.get(id.into()).await?;
        Ok(row.map(row_to_student))
    }

    #[instrument(skip(self))]
    async fn list_students(&self, page: PageRequest) -> Result<Vec<Student>, PortError> {
        let (offset, limit) = window(page);
        let rows = self.students.list(offset, limit).await?;
        Ok(rows.into_iter().map(row_to_student).collect())
    }

    #[instrument(skip(self))]
    async fn list_students_by_school(
        &self,
        school_id: SchoolId,
        page: Option<PageRequest>,
    ) -> Result<Vec<Student>, PortError> {
        let rows = self
            .students
            .list_by_school(school_id.into(), page.map(window))
            .await?;
        debug!(count = rows.len(), "Fetched students of school");
        Ok(rows.into_iter().map(row_to_student).collect())
    }

    #[instrument(skip(self, student), fields(student_id = %student.id))]
    async fn update_student(&self, student: Student) -> Result<Option<Student>, PortError> {
        let row = self
            .students
            .update(&student_to_row(&student))
            .await
            .map_err(|e| missing_parent(e, "School", student.school_id, "school_id"))?;
        Ok(row.map(row_to_student))
    }

    #[instrument(skip(self))]
    async fn delete_student(&self, id: StudentId) -> Result<bool, PortError> {
        self.students
            .delete(id.into())
            .await
            .map_err(|e| dependants_conflict(e, || format!("Student {id} still has invoices")))
    }
}

#[async_trait]
impl InvoicePort for PostgresBillingAdapter {
    #[instrument(skip(self, invoice), fields(invoice_id = %invoice.id))]
    async fn create_invoice(&self, invoice: Invoice) -> Result<Invoice, PortError> {
        let row = self
            .invoices
            .insert(&invoice_to_row(&invoice))
            .await
            .map_err(|e| missing_parent(e, "Student", invoice.student_id, "student_id"))?;
        Ok(row_to_invoice(row))
    }

    #[instrument(skip(self))]
    async fn get_invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, PortError> {
        let row = self.invoices.get(id.into()).await?;
        Ok(row.map(row_to_invoice))
    }

    #[instrument(skip(self))]
    async fn list_invoices(&self, page: PageRequest) -> Result<Vec<Invoice>, PortError> {
        let (offset, limit) = window(page);
        let rows = self.invoices.list(offset, limit).await?;
        Ok(rows.into_iter().map(row_to_invoice).collect())
    }

    #[instrument(skip(self))]
    async fn list_invoices_by_student(&self, student_id: StudentId) -> Result<Vec<Invoice>, PortError> {
        self.list_invoices_by_students(&[student_id]).await
    }

    #[instrument(skip(self, student_ids), fields(students = student_ids.len()))]
    async fn list_invoices_by_students(
        &self,
        student_ids: &[StudentId],
    ) -> Result<Vec<Invoice>, PortError> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = student_ids.iter().map(|id| Uuid::from(*id)).collect();
        let rows = self.invoices.list_by_students(&ids).await?;
        debug!(count = rows.len(), "Fetched invoices");
        Ok(rows.into_iter().map(row_to_invoice).collect())
    }

    #[instrument(skip(self, invoice), fields(invoice_id = %invoice.id))]
    async fn update_invoice(&self, invoice: Invoice) -> Result<Option<Invoice>, PortError> {
        let row = self
            .invoices
            .update(&invoice_to_row(&invoice))
            .await
            .map_err(|e| missing_parent(e, "Student", invoice.student_id, "student_id"))?;
        Ok(row.map(row_to_invoice))
    }

    #[instrument(skip(self))]
    async fn delete_invoice(&self, id: InvoiceId) -> Result<bool, PortError> {
        self.invoices
            .delete(id.into())
            .await
            .map_err(|e| dependants_conflict(e, || format!("Invoice {id} still has payments")))
    }
}

#[async_trait]
impl PaymentPort for PostgresBillingAdapter {
    #[instrument(skip(self, payment), fields(payment_id = %payment.id))]
    async fn create_payment(&self, payment: Payment) -> Result<Payment, PortError> {
        let row = self
            .payments
            .insert(&payment_to_row(&payment))
            .await
            .map_err(|e| missing_parent(e, "Invoice", payment.invoice_id, "invoice_id"))?;
        Ok(row_to_payment(row))
    }

    #[instrument(skip(self))]
    async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, PortError> {
        let row = self.payments.get(id.into()).await?;
        Ok(row.map(row_to_payment))
    }

    #[instrument(skip(self))]
    async fn list_payments(&self, page: PageRequest) -> Result<Vec<Payment>, PortError> {
        let (offset, limit) = window(page);
        let rows = self.payments.list(offset, limit).await?;
        Ok(rows.into_iter().map(row_to_payment).collect())
    }

    #[instrument(skip(self))]
    async fn list_payments_by_invoice(&self, invoice_id: InvoiceId) -> Result<Vec<Payment>, PortError> {
        self.list_payments_by_invoices(&[invoice_id]).await
    }

    #[instrument(skip(self, invoice_ids), fields(invoices = invoice_ids.len()))]
    async fn list_payments_by_invoices(
        &self,
        invoice_ids: &[InvoiceId],
    ) -> Result<Vec<Payment>, PortError> {
        if invoice_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = invoice_ids.iter().map(|id| Uuid::from(*id)).collect();
        let rows = self.payments.list_by_invoices(&ids).await?;
        debug!(count = rows.len(), "Fetched payments");
        Ok(rows.into_iter().map(row_to_payment).collect())
    }

    #[instrument(skip(self, payment), fields(payment_id = %payment.id))]
    async fn update_payment(&self, payment: Payment) -> Result<Option<Payment>, PortError> {
        let row = self
            .payments
            .update(&payment_to_row(&payment))
            .await
            .map_err(|e| missing_parent(e, "Invoice", payment.invoice_id, "invoice_id"))?;
        Ok(row.map(row_to_payment))
    }

    #[instrument(skip(self))]
    async fn delete_payment(&self, id: PaymentId) -> Result<bool, PortError> {
        Ok(self.payments.delete(id.into()).await?)
    }
}

// ============================================================================
// Error translation
// ============================================================================

/// A foreign key violation on insert/update means the parent is missing
fn missing_parent(
    error: DatabaseError,
    parent: &str,
    parent_id: impl std::fmt::Display,
    field: &str,
) -> PortError {
    match error {
        DatabaseError::ForeignKeyViolation(_) => {
            PortError::validation_field(format!("{parent} {parent_id} does not exist"), field)
        }
        other => other.into(),
    }
}

/// A foreign key violation on delete means dependants still reference the row
fn dependants_conflict(error: DatabaseError, message: impl FnOnce() -> String) -> PortError {
    match error {
        DatabaseError::ForeignKeyViolation(_) => PortError::conflict(message()),
        other => other.into(),
    }
}

fn window(page: PageRequest) -> (i64, i64) {
    (i64::from(page.offset), i64::from(page.limit))
}

// ============================================================================
// Row conversion
// ============================================================================

fn school_to_row(school: &School) -> SchoolRow {
    SchoolRow {
        id: school.id.into(),
        name: school.name.clone(),
        created_at: school.created_at,
        updated_at: school.updated_at,
    }
}

fn row_to_school(row: SchoolRow) -> School {
    School {
        id: SchoolId::from(row.id),
        name: row.name,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn student_to_row(student: &Student) -> StudentRow {
    StudentRow {
        id: student.id.into(),
        school_id: student.school_id.into(),
        full_name: student.full_name.clone(),
        created_at: student.created_at,
        updated_at: student.updated_at,
    }
}

fn row_to_student(row: StudentRow) -> Student {
    Student {
        id: StudentId::from(row.id),
        school_id: SchoolId::from(row.school_id),
        full_name: row.full_name,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn invoice_to_row(invoice: &Invoice) -> InvoiceRow {
    InvoiceRow {
        id: invoice.id.into(),
        student_id: invoice.student_id.into(),
        total_amount: invoice.total_amount.amount(),
        issued_at: invoice.issued_at,
        due_date: invoice.due_date,
        description: invoice.description.clone(),
        created_at: invoice.created_at,
        updated_at: invoice.updated_at,
    }
}

fn row_to_invoice(row: InvoiceRow) -> Invoice {
    Invoice {
        id: InvoiceId::from(row.id),
        student_id: StudentId::from(row.student_id),
        total_amount: Money::new(row.total_amount),
        issued_at: row.issued_at,
        due_date: row.due_date,
        description: row.description,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn payment_to_row(payment: &Payment) -> PaymentRow {
    PaymentRow {
        id: payment.id.into(),
        invoice_id: payment.invoice_id.into(),
        amount: payment.amount.amount(),
        paid_at: payment.paid_at,
        method: payment.method.clone(),
        reference: payment.reference.clone(),
        created_at: payment.created_at,
        updated_at: payment.updated_at,
    }
}

fn row_to_payment(row: PaymentRow) -> Payment {
    Payment {
        id: PaymentId::from(row.id),
        invoice_id: InvoiceId::from(row.invoice_id),
        amount: Money::new(row.amount),
        paid_at: row.paid_at,
        method: row.method,
        reference: row.reference,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}
