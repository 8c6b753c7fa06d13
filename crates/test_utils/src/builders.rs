//! Test Data Builders
//!
//! Provides builder patterns for constructing billing data with sensible
//! defaults, plus [`LedgerSeeder`] which writes entities into any
//! [`BillingStore`] through its ports.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{Money, PortError, StudentId, InvoiceId};
use domain_billing::{
    BillingStore, Invoice, Payment, School, Student,
};

use crate::fixtures::{MoneyFixtures, NameFixtures, TemporalFixtures};

/// Builder for constructing test invoices
pub struct TestInvoiceBuilder {
    student_id: StudentId,
    total_amount: Money,
    issued_at: DateTime<Utc>,
    due_date: NaiveDate,
    description: Option<String>,
}

impl TestInvoiceBuilder {
    /// Creates a new builder for the given student with default values
    pub fn new(student_id: StudentId) -> Self {
        Self {
            student_id,
            total_amount: MoneyFixtures::hundred(),
            issued_at: TemporalFixtures::issued_at(),
            due_date: TemporalFixtures::due_date(),
            description: None,
        }
    }

    /// Sets the invoice total
    pub fn with_total(mut self, total: Money) -> Self {
        self.total_amount = total;
        self
    }

    /// Sets the issue timestamp
    pub fn with_issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = issued_at;
        self
    }

    /// Sets the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = due_date;
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the invoice
    pub fn build(self) -> Invoice {
        let mut invoice = Invoice::new(self.student_id, self.total_amount, self.due_date)
            .issued_at(self.issued_at);
        invoice.description = self.description;
        invoice
    }
}

/// Builder for constructing test payments
pub struct TestPaymentBuilder {
    invoice_id: InvoiceId,
    amount: Money,
    paid_at: Option<DateTime<Utc>>,
    method: Option<String>,
}

impl TestPaymentBuilder {
    /// Creates a new builder paying `amount` against the invoice
    pub fn new(invoice_id: InvoiceId, amount: Money) -> Self {
        Self {
            invoice_id,
            amount,
            paid_at: Some(TemporalFixtures::paid_at()),
            method: None,
        }
    }

    /// Sets or clears the payment timestamp
    pub fn with_paid_at(mut self, paid_at: Option<DateTime<Utc>>) -> Self {
        self.paid_at = paid_at;
        self
    }

    /// Sets the payment method
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Builds the payment
    pub fn build(self) -> Payment {
        let mut payment = Payment::new(self.invoice_id, self.amount);
        payment.paid_at = self.paid_at;
        payment.method = self.method;
        payment
    }
}

/// Writes test entities into a store through its ports
///
/// Invoices get increasing `issued_at` timestamps so their statement order
/// follows the order they were seeded in.
pub struct LedgerSeeder<'a, S: BillingStore> {
    store: &'a S,
    issued: i64,
}

impl<'a, S: BillingStore> LedgerSeeder<'a, S> {
    /// Creates a seeder writing into `store`
    pub fn new(store: &'a S) -> Self {
        Self { store, issued: 0 }
    }

    /// Creates a school with the standard name
    pub async fn school(&mut self) -> Result<School, PortError> {
        self.store.create_school(School::new(NameFixtures::school())).await
    }

    /// Creates a student with a random name at the given school
    pub async fn student(&mut self, school: &School) -> Result<Student, PortError> {
        self.store
            .create_student(Student::new(school.id, NameFixtures::random_student()))
            .await
    }

    /// Creates an invoice and pays it with the given amounts
    ///
    /// # Arguments
    ///
    /// * `student` - Student being billed
    /// * `total` - Invoice total
    /// * `payments` - Amounts to apply; zero entries are skipped
    pub async fn invoice(
        &mut self,
        student: &Student,
        total: Money,
        payments: &[Money],
    ) -> Result<Invoice, PortError> {
        let invoice = TestInvoiceBuilder::new(student.id)
            .with_total(total)
            .with_issued_at(TemporalFixtures::issued_days_later(self.issued))
            .build();
        self.issued += 1;

        let invoice = self.store.create_invoice(invoice).await?;
        for amount in payments.iter().filter(|a| !a.is_zero()) {
            self.store
                .create_payment(TestPaymentBuilder::new(invoice.id, *amount).build())
                .await?;
        }
        Ok(invoice)
    }
}
