//! Demo data for local development
//!
//! Seeds one school with a fully paid and a partially paid student. Every
//! row is looked up before it is inserted, so running the seed repeatedly
//! leaves exactly one copy of each record.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::pool::DatabasePool;
use crate::repositories::{
    InvoiceRepository, InvoiceRow, PaymentRepository, PaymentRow, SchoolRepository, SchoolRow,
    StudentRepository, StudentRow,
};

pub const DEMO_SCHOOL: &str = "Springfield Elementary";

const TUITION: &str = "Annual tuition";

struct DemoPayment {
    amount: Decimal,
    paid_at: DateTime<Utc>,
    method: &'static str,
    reference: &'static str,
}

/// Inserts the demo records that are not present yet
///
/// # Errors
///
/// Returns the first `DatabaseError` raised by a lookup or insert
#[instrument(skip(pool))]
pub async fn seed_demo_data(pool: &DatabasePool) -> Result<(), DatabaseError> {
    let schools = SchoolRepository::new(pool.clone());
    let students = StudentRepository::new(pool.clone());
    let invoices = InvoiceRepository::new(pool.clone());
    let payments = PaymentRepository::new(pool.clone());

    let school = match schools.find_by_name(DEMO_SCHOOL).await? {
        Some(existing) => existing,
        None => {
            let now = Utc::now();
            schools
                .insert(&SchoolRow {
                    id: Uuid::now_v7(),
                    name: DEMO_SCHOOL.to_string(),
                    created_at: now,
                    updated_at: now,
                })
                .await?
        }
    };

    let due = NaiveDate::from_ymd_opt(2026, 2, 28).ok_or_else(|| {
        DatabaseError::QueryFailed("invalid demo due date".to_string())
    })?;

    let lisa = ensure_student(&students, school.id, "Lisa Simpson").await?;
    let lisa_invoice =
        ensure_invoice(&invoices, lisa.id, Decimal::new(100_000, 2), due).await?;
    ensure_payment(
        &payments,
        lisa_invoice.id,
        DemoPayment {
            amount: Decimal::new(60_000, 2),
            paid_at: demo_time(2026, 1, 10, 13)?,
            method: "bank_transfer",
            reference: "DEMO-PAID-1",
        },
    )
    .await?;
    ensure_payment(
        &payments,
        lisa_invoice.id,
        DemoPayment {
            amount: Decimal::new(40_000, 2),
            paid_at: demo_time(2026, 1, 20, 13)?,
            method: "card",
            reference: "DEMO-PAID-2",
        },
    )
    .await?;

    let bart = ensure_student(&students, school.id, "Bart Simpson").await?;
    let bart_invoice = ensure_invoice(&invoices, bart.id, Decimal::new(80_000, 2), due).await?;
    ensure_payment(
        &payments,
        bart_invoice.id,
        DemoPayment {
            amount: Decimal::new(30_000, 2),
            paid_at: demo_time(2026, 1, 15, 13)?,
            method: "cash",
            reference: "DEMO-PARTIAL-1",
        },
    )
    .await?;

    info!(school_id = %school.id, "Demo data seeded");
    Ok(())
}

async fn ensure_student(
    students: &StudentRepository,
    school_id: Uuid,
    full_name: &str,
) -> Result<StudentRow, DatabaseError> {
    if let Some(existing) = students.find_by_name(school_id, full_name).await? {
        return Ok(existing);
    }
    let now = Utc::now();
    students
        .insert(&StudentRow {
            id: Uuid::now_v7(),
            school_id,
            full_name: full_name.to_string(),
            created_at: now,
            updated_at: now,
        })
        .await
}

async fn ensure_invoice(
    invoices: &InvoiceRepository,
    student_id: Uuid,
    total_amount: Decimal,
    due_date: NaiveDate,
) -> Result<InvoiceRow, DatabaseError> {
    if let Some(existing) = invoices
        .find_matching(student_id, total_amount, due_date, TUITION)
        .await?
    {
        return Ok(existing);
    }
    let now = Utc::now();
    invoices
        .insert(&InvoiceRow {
            id: Uuid::now_v7(),
            student_id,
            total_amount,
            issued_at: now,
            due_date,
            description: Some(TUITION.to_string()),
            created_at: now,
            updated_at: now,
        })
        .await
}

async fn ensure_payment(
    payments: &PaymentRepository,
    invoice_id: Uuid,
    demo: DemoPayment,
) -> Result<PaymentRow, DatabaseError> {
    if let Some(existing) = payments.find_by_reference(invoice_id, demo.reference).await? {
        return Ok(existing);
    }
    let now = Utc::now();
    payments
        .insert(&PaymentRow {
            id: Uuid::now_v7(),
            invoice_id,
            amount: demo.amount,
            paid_at: Some(demo.paid_at),
            method: Some(demo.method.to_string()),
            reference: Some(demo.reference.to_string()),
            created_at: now,
            updated_at: now,
        })
        .await
}

fn demo_time(year: i32, month: u32, day: u32, hour: u32) -> Result<DateTime<Utc>, DatabaseError> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .ok_or_else(|| DatabaseError::QueryFailed("invalid demo timestamp".to_string()))
}
