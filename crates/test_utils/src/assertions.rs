//! Custom Test Assertions
//!
//! Provides assertion helpers for statements that give more meaningful
//! failure messages than comparing whole structs.

use core_kernel::Money;
use domain_billing::{InvoiceStatus, InvoiceSummary, StatementTotals};

/// Asserts that a Money value renders as the given two-digit string
///
/// # Panics
///
/// Panics if `money` does not display as `expected`
pub fn assert_money_eq(money: Money, expected: &str) {
    assert_eq!(
        money.to_string(),
        expected,
        "Expected {expected}, got {money}"
    );
}

/// Asserts that statement totals are the exact sums of the summaries
///
/// Recomputes each total independently and compares it to the reported
/// value, so a regression in the roll-up is caught field by field.
pub fn assert_totals_additive(totals: &StatementTotals, summaries: &[InvoiceSummary]) {
    let invoiced: Money = summaries.iter().map(|s| s.total_amount).sum();
    let paid: Money = summaries.iter().map(|s| s.paid_total).sum();
    let balance: Money = summaries.iter().map(|s| s.balance_due).sum();
    let credit: Money = summaries.iter().map(|s| s.credit_amount).sum();

    assert_eq!(totals.invoiced_total, invoiced, "invoiced_total is not the sum of totals");
    assert_eq!(totals.paid_total, paid, "paid_total is not the sum of paid amounts");
    assert_eq!(totals.balance_due_total, balance, "balance_due_total is not the sum of balances");
    assert_eq!(totals.credit_total, credit, "credit_total is not the sum of credits");
}

/// Asserts the statuses of a statement's invoices, in order
pub fn assert_statuses(summaries: &[InvoiceSummary], expected: &[InvoiceStatus]) {
    let actual: Vec<InvoiceStatus> = summaries.iter().map(|s| s.status).collect();
    assert_eq!(actual, expected, "Invoice statuses differ");
}

/// Asserts the invariants every invoice summary must satisfy
///
/// # Panics
///
/// Panics if credit is negative, or if balance and paid do not add up to
/// the invoice total
pub fn assert_summary_consistent(summary: &InvoiceSummary) {
    assert!(
        !summary.credit_amount.is_negative(),
        "Invoice {} has negative credit {}",
        summary.id,
        summary.credit_amount
    );
    assert_eq!(
        summary.balance_due + summary.paid_total,
        summary.total_amount,
        "Invoice {} balance and paid do not add up to the total",
        summary.id
    );
}
