//! Invoice classification
//!
//! Derives how far an invoice has been settled from its total and the
//! payments recorded against it. The comparison is exact to the cent.

use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::Money;

use crate::payment::Payment;

/// Settlement status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Nothing paid yet
    Pending,
    /// Paid less than the total
    Partial,
    /// Paid exactly the total
    Paid,
    /// Paid more than the total
    Credit,
}

impl InvoiceStatus {
    /// Returns the wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "PENDING",
            InvoiceStatus::Partial => "PARTIAL",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement figures for a single invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Sum of payment amounts
    pub paid_total: Money,
    /// `total - paid`, negative when overpaid
    pub balance_due: Money,
    /// Overpaid amount, never negative
    pub credit_amount: Money,
    pub status: InvoiceStatus,
}

/// Classifies a paid total against an invoice total
///
/// The rules are evaluated in order: nothing paid is `Pending` even for a
/// zero-total invoice, then `Partial`, `Paid` and `Credit`.
pub fn classify(invoice_total: Money, paid_total: Money) -> InvoiceStatus {
    if paid_total.is_zero() {
        InvoiceStatus::Pending
    } else if paid_total < invoice_total {
        InvoiceStatus::Partial
    } else if paid_total == invoice_total {
        InvoiceStatus::Paid
    } else {
        InvoiceStatus::Credit
    }
}

/// Computes the settlement of an invoice from its payments
///
/// # Arguments
///
/// * `invoice_total` - The invoice's fixed total
/// * `payments` - Payments recorded against the invoice, possibly none
pub fn settle<'a, I>(invoice_total: Money, payments: I) -> Settlement
where
    I: IntoIterator<Item = &'a Payment>,
{
    let paid_total: Money = payments.into_iter().map(|p| p.amount).sum();
    Settlement {
        paid_total,
        balance_due: invoice_total - paid_total,
        credit_amount: (paid_total - invoice_total).clamp_non_negative(),
        status: classify(invoice_total, paid_total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::InvoiceId;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn payments(invoice_id: InvoiceId, amounts: &[Money]) -> Vec<Payment> {
        amounts.iter().map(|a| Payment::new(invoice_id, *a)).collect()
    }

    #[test]
    fn test_no_payments_is_pending() {
        let settlement = settle(Money::new(dec!(100.00)), std::iter::empty());

        assert_eq!(settlement.status, InvoiceStatus::Pending);
        assert_eq!(settlement.paid_total, Money::ZERO);
        assert_eq!(settlement.balance_due, Money::new(dec!(100.00)));
        assert_eq!(settlement.credit_amount, Money::ZERO);
    }

    #[test]
    fn test_zero_total_without_payments_is_pending() {
        assert_eq!(classify(Money::ZERO, Money::ZERO), InvoiceStatus::Pending);
    }

    #[test]
    fn test_boundaries_around_total() {
        let total = Money::new(dec!(100.00));
        assert_eq!(classify(total, Money::new(dec!(99.99))), InvoiceStatus::Partial);
        assert_eq!(classify(total, Money::new(dec!(100.00))), InvoiceStatus::Paid);
        assert_eq!(classify(total, Money::new(dec!(100.01))), InvoiceStatus::Credit);
    }

    #[test]
    fn test_overpayment_keeps_negative_balance() {
        let id = InvoiceId::new();
        let paid = payments(id, &[Money::new(dec!(30)), Money::new(dec!(20))]);

        let settlement = settle(Money::new(dec!(40.00)), &paid);

        assert_eq!(settlement.status, InvoiceStatus::Credit);
        assert_eq!(settlement.paid_total, Money::new(dec!(50.00)));
        assert_eq!(settlement.balance_due, Money::new(dec!(-10.00)));
        assert_eq!(settlement.credit_amount, Money::new(dec!(10.00)));
    }

    #[test]
    fn test_multiple_payments_sum_exactly() {
        let id = InvoiceId::new();
        let paid = payments(id, &[Money::new(dec!(0.10)), Money::new(dec!(0.20))]);

        let settlement = settle(Money::new(dec!(0.30)), &paid);

        assert_eq!(settlement.status, InvoiceStatus::Paid);
        assert!(settlement.balance_due.is_zero());
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&InvoiceStatus::Partial).unwrap();
        assert_eq!(json, "\"PARTIAL\"");
        assert_eq!(InvoiceStatus::Credit.to_string(), "CREDIT");
    }

    proptest! {
        #[test]
        fn credit_is_never_negative(
            total in 0i64..1_000_000,
            amounts in prop::collection::vec(1i64..500_000, 0..6),
        ) {
            let id = InvoiceId::new();
            let paid: Vec<_> = amounts.iter().map(|a| Payment::new(id, Money::from_minor(*a))).collect();
            let settlement = settle(Money::from_minor(total), &paid);

            prop_assert!(!settlement.credit_amount.is_negative());
            prop_assert_eq!(
                settlement.balance_due + settlement.paid_total,
                Money::from_minor(total)
            );
            prop_assert_eq!(
                settlement.credit_amount,
                (-settlement.balance_due).clamp_non_negative()
            );
        }

        #[test]
        fn status_matches_comparison(total in 0i64..100_000, paid in 0i64..200_000) {
            let status = classify(Money::from_minor(total), Money::from_minor(paid));
            let expected = if paid == 0 {
                InvoiceStatus::Pending
            } else if paid < total {
                InvoiceStatus::Partial
            } else if paid == total {
                InvoiceStatus::Paid
            } else {
                InvoiceStatus::Credit
            };
            prop_assert_eq!(status, expected);
        }
    }
}
