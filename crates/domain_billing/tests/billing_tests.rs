//! Comprehensive tests for domain_billing
//!
//! Statement scenarios run end to end through `BillingService` over the
//! in-memory store; the statement invariants are checked with proptest.

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::{Money, PortError, SchoolId, StudentId};
use domain_billing::ports::mock::InMemoryBillingStore;
use domain_billing::statement::{build_student_statement, summarize_invoices};
use domain_billing::{
    BillingError, BillingService, CreateInvoiceRequest, CreatePaymentRequest, CreateSchoolRequest,
    CreateStudentRequest, InvoicePatch, InvoiceStatus, PageRequest, PaymentPatch, Student,
    StudentPatch,
};
use test_utils::{
    assert_money_eq, assert_statuses, assert_summary_consistent, assert_totals_additive,
    student_ledger_strategy, LedgerSeeder, MoneyFixtures, TemporalFixtures,
};

fn money(amount: rust_decimal::Decimal) -> Money {
    Money::new(amount)
}

fn service_over(store: &Arc<InMemoryBillingStore>) -> BillingService {
    BillingService::from_store(store.clone())
}

// ============================================================================
// Statement Scenarios
// ============================================================================

mod statement_scenarios {
    use super::*;

    #[tokio::test]
    async fn test_student_with_one_invoice_per_status() {
        let store = Arc::new(InMemoryBillingStore::new());
        let mut seed = LedgerSeeder::new(store.as_ref());
        let school = seed.school().await.unwrap();
        let student = seed.student(&school).await.unwrap();

        seed.invoice(&student, money(dec!(100.00)), &[]).await.unwrap();
        seed.invoice(&student, money(dec!(80.00)), &[money(dec!(50.00))]).await.unwrap();
        seed.invoice(&student, money(dec!(60.00)), &[money(dec!(60.00))]).await.unwrap();
        seed.invoice(&student, money(dec!(40.00)), &[money(dec!(30.00)), money(dec!(20.00))])
            .await
            .unwrap();

        let statement = service_over(&store).get_student_statement(student.id).await.unwrap();

        assert_eq!(statement.student_id, student.id);
        assert_eq!(statement.school_id, school.id);
        assert_statuses(
            &statement.invoices,
            &[
                InvoiceStatus::Pending,
                InvoiceStatus::Partial,
                InvoiceStatus::Paid,
                InvoiceStatus::Credit,
            ],
        );
        assert_money_eq(statement.totals.invoiced_total, "280.00");
        assert_money_eq(statement.totals.paid_total, "160.00");
        assert_money_eq(statement.totals.balance_due_total, "120.00");
        assert_money_eq(statement.totals.credit_total, "10.00");

        let credit = &statement.invoices[3];
        assert_money_eq(credit.balance_due, "-10.00");
        assert_money_eq(credit.credit_amount, "10.00");
    }

    #[tokio::test]
    async fn test_single_student_school_matches_student_totals() {
        let store = Arc::new(InMemoryBillingStore::new());
        let mut seed = LedgerSeeder::new(store.as_ref());
        let school = seed.school().await.unwrap();
        let student = seed.student(&school).await.unwrap();
        seed.invoice(&student, money(dec!(250.00)), &[money(dec!(75.25))]).await.unwrap();
        seed.invoice(&student, money(dec!(19.99)), &[money(dec!(25.00))]).await.unwrap();

        let service = service_over(&store);
        let student_statement = service.get_student_statement(student.id).await.unwrap();
        let school_statement = service.get_school_statement(school.id).await.unwrap();

        assert_eq!(school_statement.students_count, 1);
        assert_eq!(school_statement.totals, student_statement.totals);
        assert_eq!(school_statement.invoices, student_statement.invoices);
    }

    #[tokio::test]
    async fn test_two_student_school() {
        let store = Arc::new(InMemoryBillingStore::new());
        let mut seed = LedgerSeeder::new(store.as_ref());
        let school = seed.school().await.unwrap();
        let first = seed.student(&school).await.unwrap();
        let second = seed.student(&school).await.unwrap();
        seed.invoice(&first, money(dec!(80.00)), &[money(dec!(20.00))]).await.unwrap();
        seed.invoice(&second, money(dec!(120.00)), &[money(dec!(120.00))]).await.unwrap();

        let statement = service_over(&store).get_school_statement(school.id).await.unwrap();

        assert_eq!(statement.students_count, 2);
        assert_statuses(&statement.invoices, &[InvoiceStatus::Partial, InvoiceStatus::Paid]);
        assert_money_eq(statement.totals.invoiced_total, "200.00");
        assert_money_eq(statement.totals.paid_total, "140.00");
        assert_money_eq(statement.totals.balance_due_total, "60.00");
        assert_money_eq(statement.totals.credit_total, "0.00");
    }

    #[tokio::test]
    async fn test_students_without_invoices_are_counted() {
        let store = Arc::new(InMemoryBillingStore::new());
        let mut seed = LedgerSeeder::new(store.as_ref());
        let school = seed.school().await.unwrap();
        seed.student(&school).await.unwrap();
        seed.student(&school).await.unwrap();

        let statement = service_over(&store).get_school_statement(school.id).await.unwrap();

        assert_eq!(statement.students_count, 2);
        assert!(statement.invoices.is_empty());
        assert_money_eq(statement.totals.balance_due_total, "0.00");
    }

    #[tokio::test]
    async fn test_school_balance_can_go_negative() {
        let store = Arc::new(InMemoryBillingStore::new());
        let mut seed = LedgerSeeder::new(store.as_ref());
        let school = seed.school().await.unwrap();
        let student = seed.student(&school).await.unwrap();
        seed.invoice(&student, money(dec!(10.00)), &[money(dec!(50.00))]).await.unwrap();
        seed.invoice(&student, money(dec!(20.00)), &[money(dec!(5.00))]).await.unwrap();

        let statement = service_over(&store).get_school_statement(school.id).await.unwrap();

        assert_money_eq(statement.totals.balance_due_total, "-25.00");
        assert_money_eq(statement.totals.credit_total, "40.00");
    }

    #[tokio::test]
    async fn test_status_boundaries_through_store() {
        let store = Arc::new(InMemoryBillingStore::new());
        let mut seed = LedgerSeeder::new(store.as_ref());
        let school = seed.school().await.unwrap();
        let student = seed.student(&school).await.unwrap();
        for paid in [
            MoneyFixtures::just_under_hundred(),
            MoneyFixtures::hundred(),
            MoneyFixtures::just_over_hundred(),
        ] {
            seed.invoice(&student, MoneyFixtures::hundred(), &[paid]).await.unwrap();
        }

        let statement = service_over(&store).get_student_statement(student.id).await.unwrap();

        assert_statuses(
            &statement.invoices,
            &[InvoiceStatus::Partial, InvoiceStatus::Paid, InvoiceStatus::Credit],
        );
    }

    #[tokio::test]
    async fn test_missing_student_is_not_found() {
        let store = Arc::new(InMemoryBillingStore::new());

        let result = service_over(&store).get_student_statement(StudentId::new()).await;

        assert!(matches!(result, Err(BillingError::NotFound { entity: "Student", .. })));
    }

    #[tokio::test]
    async fn test_missing_school_is_not_found() {
        let store = Arc::new(InMemoryBillingStore::new());

        let result = service_over(&store).get_school_statement(SchoolId::new()).await;

        assert!(result.unwrap_err().is_not_found());
    }
}

// ============================================================================
// Entity CRUD
// ============================================================================

mod crud_tests {
    use super::*;

    async fn school_and_student(service: &BillingService) -> Student {
        let school = service
            .create_school(CreateSchoolRequest { name: "Springfield Elementary".into() })
            .await
            .unwrap();
        service
            .create_student(CreateStudentRequest {
                school_id: school.id,
                full_name: "Lisa Simpson".into(),
            })
            .await
            .unwrap()
    }

    fn invoice_request(student_id: StudentId, total: Money) -> CreateInvoiceRequest {
        CreateInvoiceRequest {
            student_id,
            total_amount: total,
            due_date: TemporalFixtures::due_date(),
            description: Some("Annual tuition".into()),
            issued_at: None,
        }
    }

    #[tokio::test]
    async fn test_student_requires_existing_school() {
        let store = Arc::new(InMemoryBillingStore::new());
        let result = service_over(&store)
            .create_student(CreateStudentRequest {
                school_id: SchoolId::new(),
                full_name: "Nelson Muntz".into(),
            })
            .await;

        assert!(matches!(
            result,
            Err(BillingError::Port(PortError::Validation { .. }))
        ));
    }

    #[tokio::test]
    async fn test_delete_school_with_students_conflicts() {
        let store = Arc::new(InMemoryBillingStore::new());
        let service = service_over(&store);
        let student = school_and_student(&service).await;

        let result = service.delete_school(student.school_id).await;

        assert!(matches!(result, Err(BillingError::Port(PortError::Conflict { .. }))));
    }

    #[tokio::test]
    async fn test_delete_invoice_then_student() {
        let store = Arc::new(InMemoryBillingStore::new());
        let service = service_over(&store);
        let student = school_and_student(&service).await;
        let invoice = service
            .create_invoice(invoice_request(student.id, money(dec!(10))))
            .await
            .unwrap();

        service.delete_invoice(invoice.id).await.unwrap();
        service.delete_student(student.id).await.unwrap();

        assert!(service.get_student(student.id).await.unwrap_err().is_not_found());
        assert!(matches!(
            service.delete_student(student.id).await,
            Err(BillingError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_positive_payment_is_rejected() {
        let store = Arc::new(InMemoryBillingStore::new());
        let service = service_over(&store);
        let student = school_and_student(&service).await;
        let invoice = service
            .create_invoice(invoice_request(student.id, money(dec!(10))))
            .await
            .unwrap();

        let result = service
            .create_payment(CreatePaymentRequest {
                invoice_id: invoice.id,
                amount: Money::ZERO,
                paid_at: None,
                method: None,
                reference: None,
            })
            .await;

        assert!(matches!(result, Err(BillingError::NonPositivePayment(_))));
    }

    #[tokio::test]
    async fn test_patch_invoice_updates_statement() {
        let store = Arc::new(InMemoryBillingStore::new());
        let service = service_over(&store);
        let student = school_and_student(&service).await;
        let invoice = service
            .create_invoice(invoice_request(student.id, money(dec!(100))))
            .await
            .unwrap();
        let payment = service
            .create_payment(CreatePaymentRequest {
                invoice_id: invoice.id,
                amount: money(dec!(60)),
                paid_at: Some(TemporalFixtures::paid_at()),
                method: Some("card".into()),
                reference: None,
            })
            .await
            .unwrap();

        service
            .update_invoice(
                invoice.id,
                InvoicePatch {
                    total_amount: Some(money(dec!(60))),
                    description: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let statement = service.get_student_statement(student.id).await.unwrap();
        assert_statuses(&statement.invoices, &[InvoiceStatus::Paid]);
        assert!(statement.invoices[0].description.is_none());

        let updated = service
            .update_payment(payment.id, PaymentPatch { method: Some(None), ..Default::default() })
            .await
            .unwrap();
        assert!(updated.method.is_none());
        assert_eq!(updated.paid_at, Some(TemporalFixtures::paid_at()));
    }

    #[tokio::test]
    async fn test_move_student_to_missing_school_fails() {
        let store = Arc::new(InMemoryBillingStore::new());
        let service = service_over(&store);
        let student = school_and_student(&service).await;

        let result = service
            .update_student(
                student.id,
                StudentPatch { school_id: Some(SchoolId::new()), ..Default::default() },
            )
            .await;

        assert!(matches!(result, Err(BillingError::Port(PortError::Validation { .. }))));
        assert_eq!(service.get_student(student.id).await.unwrap().school_id, student.school_id);
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let store = Arc::new(InMemoryBillingStore::new());
        let service = service_over(&store);
        for n in 0..5 {
            service
                .create_school(CreateSchoolRequest { name: format!("School {n}") })
                .await
                .unwrap();
        }

        let page = service.list_schools(PageRequest::new(1, 2)).await.unwrap();
        let names: Vec<_> = page.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(names, vec!["School 1", "School 2"]);
    }

    #[tokio::test]
    async fn test_invoice_payments_listing() {
        let store = Arc::new(InMemoryBillingStore::new());
        let service = service_over(&store);
        let student = school_and_student(&service).await;
        let invoice = service
            .create_invoice(invoice_request(student.id, money(dec!(100))))
            .await
            .unwrap();
        for (amount, paid_at) in [
            (dec!(10), None),
            (dec!(20), Some(TemporalFixtures::issued_days_later(5))),
            (dec!(30), Some(TemporalFixtures::issued_days_later(1))),
        ] {
            service
                .create_payment(CreatePaymentRequest {
                    invoice_id: invoice.id,
                    amount: money(amount),
                    paid_at,
                    method: None,
                    reference: None,
                })
                .await
                .unwrap();
        }

        let payments = service.list_invoice_payments(invoice.id).await.unwrap();
        let amounts: Vec<String> = payments.iter().map(|p| p.amount.to_string()).collect();

        assert_eq!(amounts, vec!["30.00", "20.00", "10.00"]);
    }
}

// ============================================================================
// Statement Properties
// ============================================================================

proptest! {
    #[test]
    fn statement_totals_are_additive(
        (invoices, payments) in student_ledger_strategy(StudentId::new(), 8)
    ) {
        let student = Student::new(SchoolId::new(), "Property Student");
        let statement = build_student_statement(&student, &invoices, &payments);

        assert_totals_additive(&statement.totals, &statement.invoices);
        for summary in &statement.invoices {
            assert_summary_consistent(summary);
        }
        prop_assert!(!statement.totals.credit_total.is_negative());
    }

    #[test]
    fn summaries_preserve_invoice_order(
        (invoices, payments) in student_ledger_strategy(StudentId::new(), 8)
    ) {
        let summaries = summarize_invoices(&invoices, &payments);

        let expected: Vec<_> = invoices.iter().map(|i| i.id).collect();
        let actual: Vec<_> = summaries.iter().map(|s| s.id).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn unpaid_invoices_are_pending(
        (invoices, _payments) in student_ledger_strategy(StudentId::new(), 6)
    ) {
        let summaries = summarize_invoices(&invoices, &[]);

        for (summary, invoice) in summaries.iter().zip(&invoices) {
            prop_assert_eq!(summary.status, InvoiceStatus::Pending);
            prop_assert_eq!(summary.balance_due, invoice.total_amount);
            prop_assert!(summary.credit_amount.is_zero());
        }
    }
}

// ============================================================================
// Statement Query Batching
// ============================================================================

mod batching_tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, InvoiceId, PaymentId};
    use domain_billing::{Invoice, InvoicePort, Payment, PaymentPort};

    /// Counts the statement reads that reach the store
    #[derive(Default)]
    struct QueryLog {
        invoices_by_student: AtomicUsize,
        invoices_by_students: AtomicUsize,
        payments_by_invoice: AtomicUsize,
        payments_by_invoices: AtomicUsize,
    }

    impl QueryLog {
        fn counts(&self) -> [usize; 4] {
            [
                self.invoices_by_student.load(Ordering::SeqCst),
                self.invoices_by_students.load(Ordering::SeqCst),
                self.payments_by_invoice.load(Ordering::SeqCst),
                self.payments_by_invoices.load(Ordering::SeqCst),
            ]
        }
    }

    struct CountingStore {
        inner: Arc<InMemoryBillingStore>,
        log: Arc<QueryLog>,
    }

    impl DomainPort for CountingStore {}

    #[async_trait]
    impl HealthCheckable for CountingStore {
        async fn health_check(&self) -> HealthCheckResult {
            self.inner.health_check().await
        }
    }

    #[async_trait]
    impl InvoicePort for CountingStore {
        async fn create_invoice(&self, invoice: Invoice) -> Result<Invoice, PortError> {
            self.inner.create_invoice(invoice).await
        }

        async fn get_invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, PortError> {
            self.inner.get_invoice(id).await
        }

        async fn list_invoices(&self, page: PageRequest) -> Result<Vec<Invoice>, PortError> {
            self.inner.list_invoices(page).await
        }

        async fn list_invoices_by_student(&self, student_id: StudentId) -> Result<Vec<Invoice>, PortError> {
            self.log.invoices_by_student.fetch_add(1, Ordering::SeqCst);
            self.inner.list_invoices_by_student(student_id).await
        }

        async fn list_invoices_by_students(
            &self,
            student_ids: &[StudentId],
        ) -> Result<Vec<Invoice>, PortError> {
            self.log.invoices_by_students.fetch_add(1, Ordering::SeqCst);
            self.inner.list_invoices_by_students(student_ids).await
        }

        async fn update_invoice(&self, invoice: Invoice) -> Result<Option<Invoice>, PortError> {
            self.inner.update_invoice(invoice).await
        }

        async fn delete_invoice(&self, id: InvoiceId) -> Result<bool, PortError> {
            self.inner.delete_invoice(id).await
        }
    }

    #[async_trait]
    impl PaymentPort for CountingStore {
        async fn create_payment(&self, payment: Payment) -> Result<Payment, PortError> {
            self.inner.create_payment(payment).await
        }

        async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, PortError> {
            self.inner.get_payment(id).await
        }

        async fn list_payments(&self, page: PageRequest) -> Result<Vec<Payment>, PortError> {
            self.inner.list_payments(page).await
        }

        async fn list_payments_by_invoice(&self, invoice_id: InvoiceId) -> Result<Vec<Payment>, PortError> {
            self.log.payments_by_invoice.fetch_add(1, Ordering::SeqCst);
            self.inner.list_payments_by_invoice(invoice_id).await
        }

        async fn list_payments_by_invoices(
            &self,
            invoice_ids: &[InvoiceId],
        ) -> Result<Vec<Payment>, PortError> {
            self.log.payments_by_invoices.fetch_add(1, Ordering::SeqCst);
            self.inner.list_payments_by_invoices(invoice_ids).await
        }

        async fn update_payment(&self, payment: Payment) -> Result<Option<Payment>, PortError> {
            self.inner.update_payment(payment).await
        }

        async fn delete_payment(&self, id: PaymentId) -> Result<bool, PortError> {
            self.inner.delete_payment(id).await
        }
    }

    fn counting_service(store: &Arc<InMemoryBillingStore>) -> (BillingService, Arc<QueryLog>) {
        let log = Arc::new(QueryLog::default());
        let counting = Arc::new(CountingStore {
            inner: store.clone(),
            log: log.clone(),
        });
        let service = BillingService::new(store.clone(), store.clone(), counting.clone(), counting);
        (service, log)
    }

    #[tokio::test]
    async fn test_school_statement_batches_each_level() {
        let store = Arc::new(InMemoryBillingStore::new());
        let mut seed = LedgerSeeder::new(store.as_ref());
        let school = seed.school().await.unwrap();
        for _ in 0..3 {
            let student = seed.student(&school).await.unwrap();
            seed.invoice(&student, money(dec!(100)), &[money(dec!(40))]).await.unwrap();
            seed.invoice(&student, money(dec!(20)), &[]).await.unwrap();
        }

        let (service, log) = counting_service(&store);
        let statement = service.get_school_statement(school.id).await.unwrap();

        assert_eq!(statement.students_count, 3);
        assert_eq!(statement.invoices.len(), 6);
        assert_eq!(log.counts(), [0, 1, 0, 1]);
    }

    #[tokio::test]
    async fn test_school_without_students_skips_invoice_and_payment_reads() {
        let store = Arc::new(InMemoryBillingStore::new());
        let school = LedgerSeeder::new(store.as_ref()).school().await.unwrap();

        let (service, log) = counting_service(&store);
        let statement = service.get_school_statement(school.id).await.unwrap();

        assert_eq!(statement.students_count, 0);
        assert!(statement.invoices.is_empty());
        assert_eq!(log.counts(), [0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn test_students_without_invoices_skip_payment_read() {
        let store = Arc::new(InMemoryBillingStore::new());
        let mut seed = LedgerSeeder::new(store.as_ref());
        let school = seed.school().await.unwrap();
        let student = seed.student(&school).await.unwrap();
        seed.student(&school).await.unwrap();

        let (service, log) = counting_service(&store);
        service.get_school_statement(school.id).await.unwrap();
        service.get_student_statement(student.id).await.unwrap();

        assert_eq!(log.counts(), [1, 1, 0, 0]);
    }

    #[tokio::test]
    async fn test_student_statement_reads_payments_once() {
        let store = Arc::new(InMemoryBillingStore::new());
        let mut seed = LedgerSeeder::new(store.as_ref());
        let school = seed.school().await.unwrap();
        let student = seed.student(&school).await.unwrap();
        for _ in 0..4 {
            seed.invoice(&student, money(dec!(50)), &[money(dec!(10)), money(dec!(5))])
                .await
                .unwrap();
        }

        let (service, log) = counting_service(&store);
        let statement = service.get_student_statement(student.id).await.unwrap();

        assert_eq!(statement.invoices.len(), 4);
        assert_eq!(log.counts(), [1, 0, 0, 1]);
    }
}
