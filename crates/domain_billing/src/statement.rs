//! Statement aggregation
//!
//! Statements are computed fresh on every request: payments are grouped by
//! invoice, each invoice is classified, and the summaries are rolled up into
//! totals. Nothing here performs I/O; callers fetch the invoices and payments
//! and hand them over.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{InvoiceId, Money, SchoolId, StudentId};

use crate::invoice::Invoice;
use crate::payment::Payment;
use crate::rules::{settle, InvoiceStatus};
use crate::school::School;
use crate::student::Student;

/// Computed view of one invoice inside a statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub id: InvoiceId,
    pub student_id: StudentId,
    pub total_amount: Money,
    pub due_date: NaiveDate,
    pub description: Option<String>,
    pub paid_total: Money,
    pub balance_due: Money,
    pub credit_amount: Money,
    pub status: InvoiceStatus,
}

/// Sums over a set of invoice summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTotals {
    pub invoiced_total: Money,
    pub paid_total: Money,
    /// Signed; negative when overpayments outweigh what is owed
    pub balance_due_total: Money,
    pub credit_total: Money,
}

impl StatementTotals {
    /// Rolls up the given summaries, starting every sum at zero
    pub fn from_summaries(summaries: &[InvoiceSummary]) -> Self {
        summaries.iter().fold(Self::default(), |mut totals, s| {
            totals.invoiced_total += s.total_amount;
            totals.paid_total += s.paid_total;
            totals.balance_due_total += s.balance_due;
            totals.credit_total += s.credit_amount;
            totals
        })
    }
}

/// Statement for a single student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentStatement {
    pub student_id: StudentId,
    pub school_id: SchoolId,
    pub totals: StatementTotals,
    pub invoices: Vec<InvoiceSummary>,
}

/// Statement across every student of a school
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolStatement {
    pub school_id: SchoolId,
    pub totals: StatementTotals,
    /// Number of students, including those without invoices
    pub students_count: usize,
    pub invoices: Vec<InvoiceSummary>,
}

/// Groups payments by the invoice they were applied to
pub fn group_payments_by_invoice(payments: &[Payment]) -> HashMap<InvoiceId, Vec<&Payment>> {
    let mut grouped: HashMap<InvoiceId, Vec<&Payment>> = HashMap::new();
    for payment in payments {
        grouped.entry(payment.invoice_id).or_default().push(payment);
    }
    grouped
}

/// Classifies each invoice against its payments
///
/// The output follows the input invoice order exactly. Invoices with no
/// matching payments are treated as unpaid, and payments for invoices not
/// in `invoices` are ignored.
pub fn summarize_invoices(invoices: &[Invoice], payments: &[Payment]) -> Vec<InvoiceSummary> {
    let grouped = group_payments_by_invoice(payments);

    invoices
        .iter()
        .map(|invoice| {
            let applied = grouped.get(&invoice.id).map(Vec::as_slice).unwrap_or_default();
            let settlement = settle(invoice.total_amount, applied.iter().copied());

            InvoiceSummary {
                id: invoice.id,
                student_id: invoice.student_id,
                total_amount: invoice.total_amount,
                due_date: invoice.due_date,
                description: invoice.description.clone(),
                paid_total: settlement.paid_total,
                balance_due: settlement.balance_due,
                credit_amount: settlement.credit_amount,
                status: settlement.status,
            }
        })
        .collect()
}

/// Builds a student's statement
///
/// # Arguments
///
/// * `student` - The student, already known to exist
/// * `invoices` - The student's invoices, in display order
/// * `payments` - Payments for those invoices
pub fn build_student_statement(
    student: &Student,
    invoices: &[Invoice],
    payments: &[Payment],
) -> StudentStatement {
    let summaries = summarize_invoices(invoices, payments);
    let totals = StatementTotals::from_summaries(&summaries);

    debug!(
        student_id = %student.id,
        invoices = summaries.len(),
        payments = payments.len(),
        "Built student statement"
    );

    StudentStatement {
        student_id: student.id,
        school_id: student.school_id,
        totals,
        invoices: summaries,
    }
}

/// Builds a school's statement across all of its students
///
/// # Arguments
///
/// * `school` - The school, already known to exist
/// * `students_count` - Number of students enrolled, with or without invoices
/// * `invoices` - Invoices across those students, in display order
/// * `payments` - Payments for those invoices
pub fn build_school_statement(
    school: &School,
    students_count: usize,
    invoices: &[Invoice],
    payments: &[Payment],
) -> SchoolStatement {
    let summaries = summarize_invoices(invoices, payments);
    let totals = StatementTotals::from_summaries(&summaries);

    debug!(
        school_id = %school.id,
        students = students_count,
        invoices = summaries.len(),
        payments = payments.len(),
        "Built school statement"
    );

    SchoolStatement {
        school_id: school.id,
        totals,
        students_count,
        invoices: summaries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
    }

    #[test]
    fn test_empty_statement_is_all_zero() {
        let school = School::new("Springfield Elementary");
        let student = Student::new(school.id, "Maggie Simpson");

        let statement = build_student_statement(&student, &[], &[]);

        assert!(statement.invoices.is_empty());
        assert_eq!(statement.totals, StatementTotals::default());
        assert_eq!(statement.totals.invoiced_total.to_string(), "0.00");
        assert_eq!(statement.school_id, school.id);
    }

    #[test]
    fn test_stray_payments_are_ignored() {
        let student = Student::new(SchoolId::new(), "Bart Simpson");
        let invoice = Invoice::new(student.id, Money::new(dec!(50)), due());
        let stray = Payment::new(InvoiceId::new(), Money::new(dec!(20)));

        let summaries = summarize_invoices(&[invoice], &[stray]);

        assert_eq!(summaries[0].status, InvoiceStatus::Pending);
        assert_eq!(summaries[0].paid_total, Money::ZERO);
    }

    #[test]
    fn test_grouping_keeps_every_payment() {
        let a = InvoiceId::new();
        let b = InvoiceId::new();
        let payments = vec![
            Payment::new(a, Money::from_minor(100)),
            Payment::new(b, Money::from_minor(200)),
            Payment::new(a, Money::from_minor(300)),
        ];

        let grouped = group_payments_by_invoice(&payments);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&a].len(), 2);
        assert_eq!(grouped[&b].len(), 1);
    }

    #[test]
    fn test_school_statement_counts_students_without_invoices() {
        let school = School::new("Springfield Elementary");
        let student = Student::new(school.id, "Lisa Simpson");
        let invoice = Invoice::new(student.id, Money::new(dec!(10)), due());

        let statement = build_school_statement(&school, 3, &[invoice], &[]);

        assert_eq!(statement.students_count, 3);
        assert_eq!(statement.invoices.len(), 1);
        assert_eq!(statement.totals.balance_due_total, Money::new(dec!(10)));
    }

    #[test]
    fn test_summary_serializes_amounts_as_strings() {
        let student = Student::new(SchoolId::new(), "Lisa Simpson");
        let invoice = Invoice::new(student.id, Money::new(dec!(100)), due());

        let statement = build_student_statement(&student, &[invoice], &[]);
        let json = serde_json::to_value(&statement).unwrap();

        assert_eq!(json["totals"]["invoiced_total"], "100.00");
        assert_eq!(json["invoices"][0]["balance_due"], "100.00");
        assert_eq!(json["invoices"][0]["status"], "PENDING");
    }
}
