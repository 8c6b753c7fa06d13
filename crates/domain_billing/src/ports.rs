//! Billing Domain Ports
//!
//! This module defines the port interfaces for the billing domain, enabling
//! swappable storage implementations (PostgreSQL, in-memory, etc.).
//!
//! # Architecture
//!
//! One port per entity. Adapters usually implement all four on a single
//! type, which then satisfies [`BillingStore`]:
//!
//! - **Postgres Adapter**: `infra_db::PostgresBillingAdapter`
//! - **In-memory Adapter**: [`mock::InMemoryBillingStore`], for tests and demos
//!
//! # Conventions
//!
//! - Lookups of a single entity return `Ok(None)` when it does not exist.
//! - `update_*` persists the given entity and returns `Ok(None)` if it has
//!   vanished in the meantime; `delete_*` returns `Ok(false)` likewise.
//! - Writes referencing a missing parent fail with `PortError::Validation`.
//! - Deleting an entity that still has dependants fails with
//!   `PortError::Conflict`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_billing::ports::BillingStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(PostgresBillingAdapter::new(pool));
//! let service = BillingService::from_store(store);
//! let statement = service.get_student_statement(student_id).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, InvoiceId, PaymentId, PortError, SchoolId, StudentId};

use crate::invoice::Invoice;
use crate::payment::Payment;
use crate::school::School;
use crate::student::Student;

/// Offset/limit window for list operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Page size used when the caller does not ask for one
    pub const DEFAULT_LIMIT: u32 = 50;
    /// Largest page a caller may request
    pub const MAX_LIMIT: u32 = 200;

    /// Creates a page request, clamping the limit to `1..=MAX_LIMIT`
    pub fn new(offset: u32, limit: u32) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    /// Applies the window to an already ordered sequence
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Storage port for schools
#[async_trait]
pub trait SchoolPort: DomainPort + HealthCheckable {
    /// Persists a new school
    async fn create_school(&self, school: School) -> Result<School, PortError>;

    /// Retrieves a school by ID
    async fn get_school(&self, id: SchoolId) -> Result<Option<School>, PortError>;

    /// Lists schools ordered by creation time
    async fn list_schools(&self, page: PageRequest) -> Result<Vec<School>, PortError>;

    /// Persists changes to an existing school
    async fn update_school(&self, school: School) -> Result<Option<School>, PortError>;

    /// Deletes a school without students
    async fn delete_school(&self, id: SchoolId) -> Result<bool, PortError>;
}

/// Storage port for students
#[async_trait]
pub trait StudentPort: DomainPort + HealthCheckable {
    /// Persists a new student; the school must exist
    async fn create_student(&self, student: Student) -> Result<Student, PortError>;

    /// Retrieves a student by ID
    async fn get_student(&self, id: StudentId) -> Result<Option<Student>, PortError>;

    /// Lists students ordered by creation time
    async fn list_students(&self, page: PageRequest) -> Result<Vec<Student>, PortError>;

    /// Lists the students of a school
    ///
    /// # Arguments
    ///
    /// * `school_id` - The owning school
    /// * `page` - Window to return, or `None` for every student
    async fn list_students_by_school(
        &self,
        school_id: SchoolId,
        page: Option<PageRequest>,
    ) -> Result<Vec<Student>, PortError>;

    /// Persists changes to an existing student; the school must exist
    async fn update_student(&self, student: Student) -> Result<Option<Student>, PortError>;

    /// Deletes a student without invoices
    async fn delete_student(&self, id: StudentId) -> Result<bool, PortError>;
}

/// Storage port for invoices
#[async_trait]
pub trait InvoicePort: DomainPort + HealthCheckable {
    /// Persists a new invoice; the student must exist
    async fn create_invoice(&self, invoice: Invoice) -> Result<Invoice, PortError>;

    /// Retrieves an invoice by ID
    async fn get_invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, PortError>;

    /// Lists invoices ordered by creation time
    async fn list_invoices(&self, page: PageRequest) -> Result<Vec<Invoice>, PortError>;

    /// Lists a student's invoices ordered by `issued_at`, then ID
    async fn list_invoices_by_student(&self, student_id: StudentId) -> Result<Vec<Invoice>, PortError>;

    /// Lists invoices across several students in one call
    ///
    /// Invoices are grouped in the order the students are given, and ordered
    /// by `issued_at`, then ID, within each student.
    async fn list_invoices_by_students(
        &self,
        student_ids: &[StudentId],
    ) -> Result<Vec<Invoice>, PortError>;

    /// Persists changes to an existing invoice; the student must exist
    async fn update_invoice(&self, invoice: Invoice) -> Result<Option<Invoice>, PortError>;

    /// Deletes an invoice without payments
    async fn delete_invoice(&self, id: InvoiceId) -> Result<bool, PortError>;
}

/// Storage port for payments
#[async_trait]
pub trait PaymentPort: DomainPort + HealthCheckable {
    /// Persists a new payment; the invoice must exist
    async fn create_payment(&self, payment: Payment) -> Result<Payment, PortError>;

    /// Retrieves a payment by ID
    async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, PortError>;

    /// Lists payments ordered by creation time
    async fn list_payments(&self, page: PageRequest) -> Result<Vec<Payment>, PortError>;

    /// Lists an invoice's payments, oldest `paid_at` first, unknown dates last
    async fn list_payments_by_invoice(&self, invoice_id: InvoiceId) -> Result<Vec<Payment>, PortError>;

    /// Lists payments for several invoices in one call
    ///
    /// Every payment of every requested invoice is returned; invoices without
    /// payments simply contribute nothing.
    async fn list_payments_by_invoices(
        &self,
        invoice_ids: &[InvoiceId],
    ) -> Result<Vec<Payment>, PortError>;

    /// Persists changes to an existing payment; the invoice must exist
    async fn update_payment(&self, payment: Payment) -> Result<Option<Payment>, PortError>;

    /// Deletes a payment
    async fn delete_payment(&self, id: PaymentId) -> Result<bool, PortError>;
}

/// A storage backend implementing every billing port
pub trait BillingStore: SchoolPort + StudentPort + InvoicePort + PaymentPort {}

impl<T> BillingStore for T where T: SchoolPort + StudentPort + InvoicePort + PaymentPort {}

/// In-memory implementation of the billing ports
///
/// This adapter keeps everything in process memory and enforces the same
/// referential rules as the relational schema. Useful for unit testing and
/// API tests without a database.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use chrono::Utc;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    #[derive(Debug, Default)]
    struct Tables {
        schools: Vec<School>,
        students: Vec<Student>,
        invoices: Vec<Invoice>,
        payments: Vec<Payment>,
    }

    /// In-memory store implementing all four billing ports
    #[derive(Debug, Clone)]
    pub struct InMemoryBillingStore {
        tables: Arc<RwLock<Tables>>,
        healthy: Arc<AtomicBool>,
    }

    impl Default for InMemoryBillingStore {
        fn default() -> Self {
            Self {
                tables: Arc::default(),
                healthy: Arc::new(AtomicBool::new(true)),
            }
        }
    }

    impl InMemoryBillingStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes subsequent health checks report the given status
        pub fn set_healthy(&self, healthy: bool) {
            self.healthy.store(healthy, Ordering::SeqCst);
        }
    }

    fn missing_parent(entity: &str, id: impl std::fmt::Display, field: &str) -> PortError {
        PortError::validation_field(format!("{entity} {id} does not exist"), field)
    }

    fn by_creation<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Vec<T>
    where
        T: Clone,
    {
        let mut sorted = items.to_vec();
        sorted.sort_by_key(key);
        sorted
    }

    // paid_at NULLS LAST, then creation order
    fn payment_order(payment: &Payment) -> impl Ord {
        (
            payment.paid_at.is_none(),
            payment.paid_at,
            payment.created_at,
            payment.id,
        )
    }

    impl DomainPort for InMemoryBillingStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryBillingStore {
        async fn health_check(&self) -> HealthCheckResult {
            let healthy = self.healthy.load(Ordering::SeqCst);
            HealthCheckResult {
                adapter_id: "in-memory-billing-store".to_string(),
                status: if healthy { AdapterHealth::Healthy } else { AdapterHealth::Unhealthy },
                latency_ms: 0,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl SchoolPort for InMemoryBillingStore {
        async fn create_school(&self, school: School) -> Result<School, PortError> {
            let mut tables = self.tables.write().await;
            if tables.schools.iter().any(|s| s.id == school.id) {
                return Err(PortError::conflict(format!("School {} already exists", school.id)));
            }
            tables.schools.push(school.clone());
            Ok(school)
        }

        async fn get_school(&self, id: SchoolId) -> Result<Option<School>, PortError> {
            let tables = self.tables.read().await;
            Ok(tables.schools.iter().find(|s| s.id == id).cloned())
        }

        async fn list_schools(&self, page: PageRequest) -> Result<Vec<School>, PortError> {
            let tables = self.tables.read().await;
            Ok(page.slice(by_creation(&tables.schools, |s| (s.created_at, s.id))))
        }

        async fn update_school(&self, school: School) -> Result<Option<School>, PortError> {
            let mut tables = self.tables.write().await;
            Ok(tables.schools.iter_mut().find(|s| s.id == school.id).map(|existing| {
                *existing = school.clone();
                school
            }))
        }

        async fn delete_school(&self, id: SchoolId) -> Result<bool, PortError> {
            let mut tables = self.tables.write().await;
            if tables.students.iter().any(|s| s.school_id == id) {
                return Err(PortError::conflict(format!("School {id} still has students")));
            }
            let before = tables.schools.len();
            tables.schools.retain(|s| s.id != id);
            Ok(tables.schools.len() != before)
        }
    }

    #[async_trait]
    impl StudentPort for InMemoryBillingStore {
        async fn create_student(&self, student: Student) -> Result<Student, PortError> {
            let mut tables = self.tables.write().await;
            if !tables.schools.iter().any(|s| s.id == student.school_id) {
                return Err(missing_parent("School", student.school_id, "school_id"));
            }
            tables.students.push(student.clone());
            Ok(student)
        }

        async fn get_student(&self, id: StudentId) -> Result<Option<Student>, PortError> {
            let tables = self.tables.read().await;
            Ok(tables.students.iter().find(|s| s.id == id).cloned())
        }

        async fn list_students(&self, page: PageRequest) -> Result<Vec<Student>, PortError> {
            let tables = self.tables.read().await;
            Ok(page.slice(by_creation(&tables.students, |s| (s.created_at, s.id))))
        }

        async fn list_students_by_school(
            &self,
            school_id: SchoolId,
            page: Option<PageRequest>,
        ) -> Result<Vec<Student>, PortError> {
            let tables = self.tables.read().await;
            let mut students: Vec<Student> = tables
                .students
                .iter()
                .filter(|s| s.school_id == school_id)
                .cloned()
                .collect();
            students.sort_by_key(|s| (s.created_at, s.id));

            Ok(match page {
                Some(page) => page.slice(students),
                None => students,
            })
        }

        async fn update_student(&self, student: Student) -> Result<Option<Student>, PortError> {
            let mut tables = self.tables.write().await;
            if !tables.schools.iter().any(|s| s.id == student.school_id) {
                return Err(missing_parent("School", student.school_id, "school_id"));
            }
            Ok(tables.students.iter_mut().find(|s| s.id == student.id).map(|existing| {
                *existing = student.clone();
                student
            }))
        }

        async fn delete_student(&self, id: StudentId) -> Result<bool, PortError> {
            let mut tables = self.tables.write().await;
            if tables.invoices.iter().any(|i| i.student_id == id) {
                return Err(PortError::conflict(format!("Student {id} still has invoices")));
            }
            let before = tables.students.len();
            tables.students.retain(|s| s.id != id);
            Ok(tables.students.len() != before)
        }
    }

    #[async_trait]
    impl InvoicePort for InMemoryBillingStore {
        async fn create_invoice(&self, invoice: Invoice) -> Result<Invoice, PortError> {
            let mut tables = self.tables.write().await;
            if !tables.students.iter().any(|s| s.id == invoice.student_id) {
                return Err(missing_parent("Student", invoice.student_id, "student_id"));
            }
            tables.invoices.push(invoice.clone());
            Ok(invoice)
        }

        async fn get_invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, PortError> {
            let tables = self.tables.read().await;
            Ok(tables.invoices.iter().find(|i| i.id == id).cloned())
        }

        async fn list_invoices(&self, page: PageRequest) -> Result<Vec<Invoice>, PortError> {
            let tables = self.tables.read().await;
            Ok(page.slice(by_creation(&tables.invoices, |i| (i.created_at, i.id))))
        }

        async fn list_invoices_by_student(&self, student_id: StudentId) -> Result<Vec<Invoice>, PortError> {
            self.list_invoices_by_students(&[student_id]).await
        }

        async fn list_invoices_by_students(
            &self,
            student_ids: &[StudentId],
        ) -> Result<Vec<Invoice>, PortError> {
            let tables = self.tables.read().await;
            let mut invoices: Vec<Invoice> = tables
                .invoices
                .iter()
                .filter(|i| student_ids.contains(&i.student_id))
                .cloned()
                .collect();
            invoices.sort_by_key(|i| {
                let rank = student_ids.iter().position(|id| *id == i.student_id);
                (rank, i.issued_at, i.id)
            });
            Ok(invoices)
        }

        async fn update_invoice(&self, invoice: Invoice) -> Result<Option<Invoice>, PortError> {
            let mut tables = self.tables.write().await;
            if !tables.students.iter().any(|s| s.id == invoice.student_id) {
                return Err(missing_parent("Student", invoice.student_id, "student_id"));
            }
            Ok(tables.invoices.iter_mut().find(|i| i.id == invoice.id).map(|existing| {
                *existing = invoice.clone();
                invoice
            }))
        }

        async fn delete_invoice(&self, id: InvoiceId) -> Result<bool, PortError> {
            let mut tables = self.tables.write().await;
            if tables.payments.iter().any(|p| p.invoice_id == id) {
                return Err(PortError::conflict(format!("Invoice {id} still has payments")));
            }
            let before = tables.invoices.len();
            tables.invoices.retain(|i| i.id != id);
            Ok(tables.invoices.len() != before)
        }
    }

    #[async_trait]
    impl PaymentPort for InMemoryBillingStore {
        async fn create_payment(&self, payment: Payment) -> Result<Payment, PortError> {
            let mut tables = self.tables.write().await;
            if !tables.invoices.iter().any(|i| i.id == payment.invoice_id) {
                return Err(missing_parent("Invoice", payment.invoice_id, "invoice_id"));
            }
            tables.payments.push(payment.clone());
            Ok(payment)
        }

        async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, PortError> {
            let tables = self.tables.read().await;
            Ok(tables.payments.iter().find(|p| p.id == id).cloned())
        }

        async fn list_payments(&self, page: PageRequest) -> Result<Vec<Payment>, PortError> {
            let tables = self.tables.read().await;
            Ok(page.slice(by_creation(&tables.payments, |p| (p.created_at, p.id))))
        }

        async fn list_payments_by_invoice(&self, invoice_id: InvoiceId) -> Result<Vec<Payment>, PortError> {
            self.list_payments_by_invoices(&[invoice_id]).await
        }

        async fn list_payments_by_invoices(
            &self,
            invoice_ids: &[InvoiceId],
        ) -> Result<Vec<Payment>, PortError> {
            let tables = self.tables.read().await;
            let mut payments: Vec<Payment> = tables
                .payments
                .iter()
                .filter(|p| invoice_ids.contains(&p.invoice_id))
                .cloned()
                .collect();
            payments.sort_by_key(payment_order);
            Ok(payments)
        }

        async fn update_payment(&self, payment: Payment) -> Result<Option<Payment>, PortError> {
            let mut tables = self.tables.write().await;
            if !tables.invoices.iter().any(|i| i.id == payment.invoice_id) {
                return Err(missing_parent("Invoice", payment.invoice_id, "invoice_id"));
            }
            Ok(tables.payments.iter_mut().find(|p| p.id == payment.id).map(|existing| {
                *existing = payment.clone();
                payment
            }))
        }

        async fn delete_payment(&self, id: PaymentId) -> Result<bool, PortError> {
            let mut tables = self.tables.write().await;
            let before = tables.payments.len();
            tables.payments.retain(|p| p.id != id);
            Ok(tables.payments.len() != before)
        }
    }
}
