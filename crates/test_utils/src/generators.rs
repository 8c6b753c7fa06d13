//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating billing data that respects
//! the storage invariants: invoice totals are never negative and payment
//! amounts are always positive.

use core_kernel::{Money, StudentId};
use domain_billing::{Invoice, Payment};
use proptest::prelude::*;

use crate::builders::{TestInvoiceBuilder, TestPaymentBuilder};
use crate::fixtures::TemporalFixtures;

/// Strategy for invoice totals in minor units (0.00 to 10,000.00)
pub fn invoice_total_minor_strategy() -> impl Strategy<Value = i64> {
    0i64..=1_000_000i64
}

/// Strategy for payment amounts in minor units (0.01 to 5,000.00)
pub fn payment_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..=500_000i64
}

/// Strategy for non-negative invoice totals
pub fn invoice_total_strategy() -> impl Strategy<Value = Money> {
    invoice_total_minor_strategy().prop_map(Money::from_minor)
}

/// Strategy for positive payment amounts
pub fn payment_amount_strategy() -> impl Strategy<Value = Money> {
    payment_amount_minor_strategy().prop_map(Money::from_minor)
}

/// Strategy for an invoice total with up to `max_payments` payment amounts
pub fn invoice_with_payments_strategy(
    max_payments: usize,
) -> impl Strategy<Value = (Money, Vec<Money>)> {
    (
        invoice_total_strategy(),
        prop::collection::vec(payment_amount_strategy(), 0..=max_payments),
    )
}

/// Strategy for a student's ledger: invoices with their payments attached
///
/// Every generated invoice belongs to `student_id` and is issued one day
/// after the previous one.
pub fn student_ledger_strategy(
    student_id: StudentId,
    max_invoices: usize,
) -> impl Strategy<Value = (Vec<Invoice>, Vec<Payment>)> {
    prop::collection::vec(invoice_with_payments_strategy(4), 0..=max_invoices).prop_map(
        move |specs| {
            let mut invoices = Vec::with_capacity(specs.len());
            let mut payments = Vec::new();
            for (day, (total, amounts)) in specs.into_iter().enumerate() {
                let invoice = TestInvoiceBuilder::new(student_id)
                    .with_total(total)
                    .with_issued_at(TemporalFixtures::issued_days_later(day as i64))
                    .build();
                payments.extend(
                    amounts
                        .into_iter()
                        .map(|amount| TestPaymentBuilder::new(invoice.id, amount).build()),
                );
                invoices.push(invoice);
            }
            (invoices, payments)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn payment_amounts_are_positive(amount in payment_amount_strategy()) {
            prop_assert!(amount.is_positive());
        }

        #[test]
        fn invoice_totals_are_not_negative(total in invoice_total_strategy()) {
            prop_assert!(!total.is_negative());
        }

        #[test]
        fn ledger_payments_reference_generated_invoices(
            (invoices, payments) in student_ledger_strategy(StudentId::new(), 5)
        ) {
            for payment in &payments {
                prop_assert!(invoices.iter().any(|i| i.id == payment.invoice_id));
            }
        }
    }
}
