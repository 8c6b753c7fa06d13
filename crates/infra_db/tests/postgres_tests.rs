//! PostgreSQL adapter integration tests
//!
//! These need Docker (or `TEST_DATABASE_URL`) and are ignored by default:
//!
//! ```bash
//! cargo test -p infra_db --test postgres_tests -- --ignored
//! ```
//!
//! One PostgreSQL container serves the whole binary. Every test creates its
//! own school, so they can share it.

use std::sync::Arc;

use core_kernel::{HealthCheckable, Money, PortError};
use domain_billing::{
    BillingError, BillingService, InvoicePort, InvoiceStatus, PaymentPort, SchoolPort, StudentPort,
};
use infra_db::{run_migrations, seed::DEMO_SCHOOL, seed_demo_data, PostgresBillingAdapter};
use infra_db::repositories::SchoolRepository;
use rust_decimal_macros::dec;
use test_utils::database::test_pool;
use test_utils::{LedgerSeeder, TestPaymentBuilder};

async fn adapter() -> Arc<PostgresBillingAdapter> {
    let pool = test_pool().await.expect("start test database");
    run_migrations(&pool).await.expect("migrate");
    Arc::new(PostgresBillingAdapter::new(pool))
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_health_check_round_trips() {
    let adapter = adapter().await;
    assert!(adapter.health_check().await.is_healthy());
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_student_statement_from_database() {
    let adapter = adapter().await;
    let mut seeder = LedgerSeeder::new(adapter.as_ref());

    let school = seeder.school().await.unwrap();
    let student = seeder.student(&school).await.unwrap();
    seeder
        .invoice(&student, Money::new(dec!(100)), &[Money::new(dec!(40))])
        .await
        .unwrap();
    seeder
        .invoice(&student, Money::new(dec!(50)), &[Money::new(dec!(50))])
        .await
        .unwrap();

    let service = BillingService::from_store(adapter.clone());
    let statement = service.get_student_statement(student.id).await.unwrap();

    assert_eq!(statement.totals.invoiced_total, Money::new(dec!(150)));
    assert_eq!(statement.totals.paid_total, Money::new(dec!(90)));
    assert_eq!(statement.totals.balance_due_total, Money::new(dec!(60)));
    let statuses: Vec<_> = statement.invoices.iter().map(|s| s.status).collect();
    assert_eq!(statuses, vec![InvoiceStatus::Partial, InvoiceStatus::Paid]);
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_school_statement_counts_students_without_invoices() {
    let adapter = adapter().await;
    let mut seeder = LedgerSeeder::new(adapter.as_ref());

    let school = seeder.school().await.unwrap();
    let billed = seeder.student(&school).await.unwrap();
    seeder.student(&school).await.unwrap();
    seeder
        .invoice(&billed, Money::new(dec!(100)), &[Money::new(dec!(150))])
        .await
        .unwrap();

    let service = BillingService::from_store(adapter.clone());
    let statement = service.get_school_statement(school.id).await.unwrap();

    assert_eq!(statement.students_count, 2);
    assert_eq!(statement.invoices.len(), 1);
    assert_eq!(statement.totals.credit_total, Money::new(dec!(50)));
    assert_eq!(statement.totals.balance_due_total, Money::new(dec!(-50)));
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_missing_parent_is_validation_error() {
    let adapter = adapter().await;

    let orphan = domain_billing::Student::new(core_kernel::SchoolId::new_v7(), "Nobody");
    let error = adapter.create_student(orphan).await.unwrap_err();

    assert!(matches!(error, PortError::Validation { .. }));
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_delete_with_dependants_is_conflict() {
    let adapter = adapter().await;
    let mut seeder = LedgerSeeder::new(adapter.as_ref());

    let school = seeder.school().await.unwrap();
    let student = seeder.student(&school).await.unwrap();
    let invoice = seeder
        .invoice(&student, Money::new(dec!(10)), &[Money::new(dec!(5))])
        .await
        .unwrap();

    assert!(matches!(adapter.delete_school(school.id).await, Err(PortError::Conflict { .. })));
    assert!(matches!(adapter.delete_student(student.id).await, Err(PortError::Conflict { .. })));
    assert!(matches!(adapter.delete_invoice(invoice.id).await, Err(PortError::Conflict { .. })));
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_payments_without_date_sort_last() {
    let adapter = adapter().await;
    let mut seeder = LedgerSeeder::new(adapter.as_ref());

    let school = seeder.school().await.unwrap();
    let student = seeder.student(&school).await.unwrap();
    let invoice = seeder
        .invoice(&student, Money::new(dec!(100)), &[])
        .await
        .unwrap();

    let undated = adapter
        .create_payment(TestPaymentBuilder::new(invoice.id, Money::new(dec!(1))).build())
        .await
        .unwrap();
    let dated = adapter
        .create_payment(
            TestPaymentBuilder::new(invoice.id, Money::new(dec!(2)))
                .with_paid_at(Some(test_utils::TemporalFixtures::paid_at()))
                .build(),
        )
        .await
        .unwrap();

    let ids: Vec<_> = adapter
        .list_payments_by_invoice(invoice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![dated.id, undated.id]);
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_get_missing_invoice_is_none() {
    let adapter = adapter().await;

    let found = adapter.get_invoice(core_kernel::InvoiceId::new_v7()).await.unwrap();
    assert!(found.is_none());

    let service = BillingService::from_store(adapter.clone());
    let error = service
        .get_student_statement(core_kernel::StudentId::new_v7())
        .await
        .unwrap_err();
    assert!(matches!(error, BillingError::NotFound { entity: "Student", .. }));
}

#[tokio::test]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn test_demo_seed_is_idempotent() {
    let adapter = adapter().await;

    seed_demo_data(adapter.pool()).await.unwrap();
    seed_demo_data(adapter.pool()).await.unwrap();

    let school = SchoolRepository::new(adapter.pool().clone())
        .find_by_name(DEMO_SCHOOL)
        .await
        .unwrap()
        .expect("demo school");

    let service = BillingService::from_store(adapter.clone());
    let statement = service.get_school_statement(school.id.into()).await.unwrap();

    assert_eq!(statement.students_count, 2);
    assert_eq!(statement.invoices.len(), 2);
    assert_eq!(statement.totals.invoiced_total, Money::new(dec!(1800)));
    assert_eq!(statement.totals.paid_total, Money::new(dec!(1300)));
    assert_eq!(statement.totals.balance_due_total, Money::new(dec!(500)));
}
