//! Payment processing
//!
//! Payments are monetary credits applied against a single invoice. Amounts
//! are strictly positive; anything else is rejected before reaching storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{InvoiceId, Money, PaymentId};

/// A payment applied against an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Invoice being paid
    pub invoice_id: InvoiceId,
    /// Amount received, always positive
    pub amount: Money,
    /// When the money was received, if known
    pub paid_at: Option<DateTime<Utc>>,
    /// Payment method, e.g. `card` or `bank_transfer`
    pub method: Option<String>,
    /// External reference (receipt or transfer number)
    pub reference: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new payment against an invoice
    pub fn new(invoice_id: InvoiceId, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: PaymentId::new_v7(),
            invoice_id,
            amount,
            paid_at: None,
            method: None,
            reference: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets when the payment was received
    pub fn paid_at(mut self, paid_at: DateTime<Utc>) -> Self {
        self.paid_at = Some(paid_at);
        self
    }

    /// Sets the payment method
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the external reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Applies a sparse update, bumping `updated_at`
    pub fn apply(&mut self, patch: PaymentPatch) {
        if let Some(invoice_id) = patch.invoice_id {
            self.invoice_id = invoice_id;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(paid_at) = patch.paid_at {
            self.paid_at = paid_at;
        }
        if let Some(method) = patch.method {
            self.method = method;
        }
        if let Some(reference) = patch.reference {
            self.reference = reference;
        }
        self.updated_at = Utc::now();
    }
}

/// Request for recording a payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePaymentRequest {
    pub invoice_id: InvoiceId,
    pub amount: Money,
    pub paid_at: Option<DateTime<Utc>>,
    pub method: Option<String>,
    pub reference: Option<String>,
}

impl CreatePaymentRequest {
    /// Builds the payment this request describes
    pub fn into_payment(self) -> Payment {
        let mut payment = Payment::new(self.invoice_id, self.amount);
        payment.paid_at = self.paid_at;
        payment.method = self.method;
        payment.reference = self.reference;
        payment
    }
}

/// Sparse update for a payment
///
/// The nullable fields are tri-state: outer `None` leaves the value alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentPatch {
    pub invoice_id: Option<InvoiceId>,
    pub amount: Option<Money>,
    pub paid_at: Option<Option<DateTime<Utc>>>,
    pub method: Option<Option<String>>,
    pub reference: Option<Option<String>>,
}
