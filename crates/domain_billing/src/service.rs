//! Billing application service
//!
//! Orchestrates the storage ports: entity CRUD with not-found detection,
//! amount validation, and statement retrieval. Statements are fetched with
//! one batched call per level (students, invoices, payments) and then built
//! by the pure functions in [`crate::statement`].

use std::sync::Arc;

use tracing::{debug, info, instrument};

use core_kernel::{HealthCheckResult, InvoiceId, PaymentId, SchoolId, StudentId};

use crate::error::BillingError;
use crate::invoice::{CreateInvoiceRequest, Invoice, InvoicePatch};
use crate::payment::{CreatePaymentRequest, Payment, PaymentPatch};
use crate::ports::{BillingStore, InvoicePort, PageRequest, PaymentPort, SchoolPort, StudentPort};
use crate::school::{CreateSchoolRequest, School, SchoolPatch};
use crate::statement::{build_school_statement, build_student_statement, SchoolStatement, StudentStatement};
use crate::student::{CreateStudentRequest, Student, StudentPatch};

/// Service for billing use cases
///
/// Cheap to clone; every port is shared behind an `Arc`.
#[derive(Clone)]
pub struct BillingService {
    schools: Arc<dyn SchoolPort>,
    students: Arc<dyn StudentPort>,
    invoices: Arc<dyn InvoicePort>,
    payments: Arc<dyn PaymentPort>,
}

impl BillingService {
    /// Creates a service from individual ports
    pub fn new(
        schools: Arc<dyn SchoolPort>,
        students: Arc<dyn StudentPort>,
        invoices: Arc<dyn InvoicePort>,
        payments: Arc<dyn PaymentPort>,
    ) -> Self {
        Self {
            schools,
            students,
            invoices,
            payments,
        }
    }

    /// Creates a service backed by a single store implementing every port
    pub fn from_store<S: BillingStore>(store: Arc<S>) -> Self {
        Self::new(store.clone(), store.clone(), store.clone(), store)
    }

    /// Reports the health of the underlying storage
    pub async fn health_check(&self) -> HealthCheckResult {
        self.schools.health_check().await
    }

    // ========================================================================
    // Schools
    // ========================================================================

    #[instrument(skip(self, request))]
    pub async fn create_school(&self, request: CreateSchoolRequest) -> Result<School, BillingError> {
        let school = self.schools.create_school(School::new(request.name)).await?;
        info!(school_id = %school.id, "School created");
        Ok(school)
    }

    pub async fn get_school(&self, id: SchoolId) -> Result<School, BillingError> {
        self.schools
            .get_school(id)
            .await?
            .ok_or_else(|| BillingError::not_found("School", id))
    }

    pub async fn list_schools(&self, page: PageRequest) -> Result<Vec<School>, BillingError> {
        Ok(self.schools.list_schools(page).await?)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_school(&self, id: SchoolId, patch: SchoolPatch) -> Result<School, BillingError> {
        let mut school = self.get_school(id).await?;
        school.apply(patch);
        self.schools
            .update_school(school)
            .await?
            .ok_or_else(|| BillingError::not_found("School", id))
    }

    #[instrument(skip(self))]
    pub async fn delete_school(&self, id: SchoolId) -> Result<(), BillingError> {
        if !self.schools.delete_school(id).await? {
            return Err(BillingError::not_found("School", id));
        }
        info!(school_id = %id, "School deleted");
        Ok(())
    }

    /// Lists a school's students
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the school does not exist
    pub async fn list_students_by_school(
        &self,
        school_id: SchoolId,
        page: PageRequest,
    ) -> Result<Vec<Student>, BillingError> {
        self.get_school(school_id).await?;
        Ok(self.students.list_students_by_school(school_id, Some(page)).await?)
    }

    // ========================================================================
    // Students
    // ========================================================================

    #[instrument(skip(self, request))]
    pub async fn create_student(&self, request: CreateStudentRequest) -> Result<Student, BillingError> {
        let student = Student::new(request.school_id, request.full_name);
        let student = self.students.create_student(student).await?;
        info!(student_id = %student.id, school_id = %student.school_id, "Student created");
        Ok(student)
    }

    pub async fn get_student(&self, id: StudentId) -> Result<Student, BillingError> {
        self.students
            .get_student(id)
            .await?
            .ok_or_else(|| BillingError::not_found("Student", id))
    }

    pub async fn list_students(&self, page: PageRequest) -> Result<Vec<Student>, BillingError> {
        Ok(self.students.list_students(page).await?)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_student(&self, id: StudentId, patch: StudentPatch) -> Result<Student, BillingError> {
        let mut student = self.get_student(id).await?;
        student.apply(patch);
        self.students
            .update_student(student)
            .await?
            .ok_or_else(|| BillingError::not_found("Student", id))
    }

    #[instrument(skip(self))]
    pub async fn delete_student(&self, id: StudentId) -> Result<(), BillingError> {
        if !self.students.delete_student(id).await? {
            return Err(BillingError::not_found("Student", id));
        }
        info!(student_id = %id, "Student deleted");
        Ok(())
    }

    // ========================================================================
    // Invoices
    // ========================================================================

    #[instrument(skip(self, request))]
    pub async fn create_invoice(&self, request: CreateInvoiceRequest) -> Result<Invoice, BillingError> {
        if request.total_amount.is_negative() {
            return Err(BillingError::NegativeInvoiceTotal(request.total_amount));
        }
        let invoice = self.invoices.create_invoice(request.into_invoice()).await?;
        info!(
            invoice_id = %invoice.id,
            student_id = %invoice.student_id,
            total = %invoice.total_amount,
            "Invoice created"
        );
        Ok(invoice)
    }

    pub async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, BillingError> {
        self.invoices
            .get_invoice(id)
            .await?
            .ok_or_else(|| BillingError::not_found("Invoice", id))
    }

    pub async fn list_invoices(&self, page: PageRequest) -> Result<Vec<Invoice>, BillingError> {
        Ok(self.invoices.list_invoices(page).await?)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_invoice(&self, id: InvoiceId, patch: InvoicePatch) -> Result<Invoice, BillingError> {
        if let Some(total) = patch.total_amount.filter(|t| t.is_negative()) {
            return Err(BillingError::NegativeInvoiceTotal(total));
        }
        let mut invoice = self.get_invoice(id).await?;
        invoice.apply(patch);
        self.invoices
            .update_invoice(invoice)
            .await?
            .ok_or_else(|| BillingError::not_found("Invoice", id))
    }

    #[instrument(skip(self))]
    pub async fn delete_invoice(&self, id: InvoiceId) -> Result<(), BillingError> {
        if !self.invoices.delete_invoice(id).await? {
            return Err(BillingError::not_found("Invoice", id));
        }
        info!(invoice_id = %id, "Invoice deleted");
        Ok(())
    }

    /// Lists the payments recorded against an invoice
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice does not exist
    pub async fn list_invoice_payments(&self, invoice_id: InvoiceId) -> Result<Vec<Payment>, BillingError> {
        self.get_invoice(invoice_id).await?;
        Ok(self.payments.list_payments_by_invoice(invoice_id).await?)
    }

    // ========================================================================
    // Payments
    // ========================================================================

    #[instrument(skip(self, request))]
    pub async fn create_payment(&self, request: CreatePaymentRequest) -> Result<Payment, BillingError> {
        if !request.amount.is_positive() {
            return Err(BillingError::NonPositivePayment(request.amount));
        }
        let payment = self.payments.create_payment(request.into_payment()).await?;
        info!(
            payment_id = %payment.id,
            invoice_id = %payment.invoice_id,
            amount = %payment.amount,
            "Payment recorded"
        );
        Ok(payment)
    }

    pub async fn get_payment(&self, id: PaymentId) -> Result<Payment, BillingError> {
        self.payments
            .get_payment(id)
            .await?
            .ok_or_else(|| BillingError::not_found("Payment", id))
    }

    pub async fn list_payments(&self, page: PageRequest) -> Result<Vec<Payment>, BillingError> {
        Ok(self.payments.list_payments(page).await?)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_payment(&self, id: PaymentId, patch: PaymentPatch) -> Result<Payment, BillingError> {
        if let Some(amount) = patch.amount.filter(|a| !a.is_positive()) {
            return Err(BillingError::NonPositivePayment(amount));
        }
        let mut payment = self.get_payment(id).await?;
        payment.apply(patch);
        self.payments
            .update_payment(payment)
            .await?
            .ok_or_else(|| BillingError::not_found("Payment", id))
    }

    #[instrument(skip(self))]
    pub async fn delete_payment(&self, id: PaymentId) -> Result<(), BillingError> {
        if !self.payments.delete_payment(id).await? {
            return Err(BillingError::not_found("Payment", id));
        }
        info!(payment_id = %id, "Payment deleted");
        Ok(())
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Computes a student's statement from current data
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the student does not exist
    #[instrument(skip(self))]
    pub async fn get_student_statement(&self, student_id: StudentId) -> Result<StudentStatement, BillingError> {
        let student = self.get_student(student_id).await?;
        let invoices = self.invoices.list_invoices_by_student(student_id).await?;
        let payments = self.payments_for(&invoices).await?;

        Ok(build_student_statement(&student, &invoices, &payments))
    }

    /// Computes a school's statement across all of its students
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the school does not exist
    #[instrument(skip(self))]
    pub async fn get_school_statement(&self, school_id: SchoolId) -> Result<SchoolStatement, BillingError> {
        let school = self.get_school(school_id).await?;
        let students = self.students.list_students_by_school(school_id, None).await?;

        let student_ids: Vec<StudentId> = students.iter().map(|s| s.id).collect();
        let invoices = if student_ids.is_empty() {
            Vec::new()
        } else {
            self.invoices.list_invoices_by_students(&student_ids).await?
        };
        let payments = self.payments_for(&invoices).await?;

        Ok(build_school_statement(&school, students.len(), &invoices, &payments))
    }

    async fn payments_for(&self, invoices: &[Invoice]) -> Result<Vec<Payment>, BillingError> {
        if invoices.is_empty() {
            debug!("No invoices, skipping payment lookup");
            return Ok(Vec::new());
        }
        let invoice_ids: Vec<InvoiceId> = invoices.iter().map(|i| i.id).collect();
        Ok(self.payments.list_payments_by_invoices(&invoice_ids).await?)
    }
}
