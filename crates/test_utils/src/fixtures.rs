//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the billing entities. These fixtures
//! are consistent and predictable so assertions can use literal values.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{InvoiceId, Money, SchoolId, StudentId};
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Annual tuition charged in the demo data
    pub fn tuition() -> Money {
        Money::new(dec!(1000.00))
    }

    /// A round invoice total for boundary tests
    pub fn hundred() -> Money {
        Money::new(dec!(100.00))
    }

    /// One cent short of [`MoneyFixtures::hundred`]
    pub fn just_under_hundred() -> Money {
        Money::new(dec!(99.99))
    }

    /// One cent over [`MoneyFixtures::hundred`]
    pub fn just_over_hundred() -> Money {
        Money::new(dec!(100.01))
    }

    /// Zero amount
    pub fn zero() -> Money {
        Money::ZERO
    }
}

/// Fixture for date and time test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard invoice due date (Feb 28, 2026)
    pub fn due_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
    }

    /// Standard issue timestamp (Jan 1, 2026)
    pub fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap()
    }

    /// Issue timestamp `days` after [`TemporalFixtures::issued_at`]
    pub fn issued_days_later(days: i64) -> DateTime<Utc> {
        Self::issued_at() + chrono::Duration::days(days)
    }

    /// Standard payment timestamp (Jan 10, 2026)
    pub fn paid_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 13, 0, 0).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic school ID for testing
    pub fn school_id() -> SchoolId {
        SchoolId::from_uuid(Uuid::parse_str("01890a5d-ac96-774b-bcce-b302099a8057").unwrap())
    }

    /// Creates a deterministic student ID for testing
    pub fn student_id() -> StudentId {
        StudentId::from_uuid(Uuid::parse_str("01890a5d-ac96-774b-bcce-b302099a8058").unwrap())
    }

    /// Creates a deterministic invoice ID for testing
    pub fn invoice_id() -> InvoiceId {
        InvoiceId::from_uuid(Uuid::parse_str("01890a5d-ac96-774b-bcce-b302099a8059").unwrap())
    }
}

/// Fixture for name test data
pub struct NameFixtures;

impl NameFixtures {
    /// Standard school name
    pub fn school() -> &'static str {
        "Shelbyville Academy"
    }

    /// A random person's name
    pub fn random_student() -> String {
        Name().fake()
    }
}
