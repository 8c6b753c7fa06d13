//! Invoice management
//!
//! This module handles the invoices charged against students. An invoice
//! carries a fixed total; how much of it has been settled is never stored
//! but derived from its payments when a statement is built.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{InvoiceId, Money, StudentId};

/// A billable charge against a student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Student being billed
    pub student_id: StudentId,
    /// Fixed total amount, never negative
    pub total_amount: Money,
    /// When the invoice was issued
    pub issued_at: DateTime<Utc>,
    /// Payment due date
    pub due_date: NaiveDate,
    /// Free-form description
    pub description: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a new invoice issued now
    ///
    /// # Arguments
    ///
    /// * `student_id` - Student being billed
    /// * `total_amount` - Invoice total
    /// * `due_date` - Payment due date
    pub fn new(student_id: StudentId, total_amount: Money, due_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: InvoiceId::new_v7(),
            student_id,
            total_amount,
            issued_at: now,
            due_date,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Overrides the issue timestamp
    pub fn issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = issued_at;
        self
    }

    /// Applies a sparse update, bumping `updated_at`
    pub fn apply(&mut self, patch: InvoicePatch) {
        if let Some(student_id) = patch.student_id {
            self.student_id = student_id;
        }
        if let Some(total_amount) = patch.total_amount {
            self.total_amount = total_amount;
        }
        if let Some(issued_at) = patch.issued_at {
            self.issued_at = issued_at;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.updated_at = Utc::now();
    }
}

/// Request for creating an invoice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInvoiceRequest {
    pub student_id: StudentId,
    pub total_amount: Money,
    pub due_date: NaiveDate,
    pub description: Option<String>,
    /// Defaults to the creation time when absent
    pub issued_at: Option<DateTime<Utc>>,
}

impl CreateInvoiceRequest {
    /// Builds the invoice this request describes
    pub fn into_invoice(self) -> Invoice {
        let mut invoice = Invoice::new(self.student_id, self.total_amount, self.due_date);
        invoice.description = self.description;
        if let Some(issued_at) = self.issued_at {
            invoice.issued_at = issued_at;
        }
        invoice
    }
}

/// Sparse update for an invoice
///
/// `description` is tri-state: `None` leaves it untouched, `Some(None)`
/// clears it and `Some(Some(_))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoicePatch {
    pub student_id: Option<StudentId>,
    pub total_amount: Option<Money>,
    pub issued_at: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    pub description: Option<Option<String>>,
}
