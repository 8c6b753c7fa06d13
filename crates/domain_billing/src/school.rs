//! School entity
//!
//! A school is the root of the billing hierarchy: students belong to a
//! school, invoices to a student and payments to an invoice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::SchoolId;

/// A school that bills its students
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    /// Unique identifier
    pub id: SchoolId,
    /// Display name
    pub name: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl School {
    /// Creates a new school with a fresh time-ordered identifier
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: SchoolId::new_v7(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a sparse update, bumping `updated_at`
    pub fn apply(&mut self, patch: SchoolPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        self.updated_at = Utc::now();
    }
}

/// Request for creating a school
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSchoolRequest {
    pub name: String,
}

/// Sparse update for a school; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchoolPatch {
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_patch_renames() {
        let mut school = School::new("Springfield Elementary");
        let created = school.created_at;

        school.apply(SchoolPatch { name: Some("Shelbyville Elementary".into()) });

        assert_eq!(school.name, "Shelbyville Elementary");
        assert_eq!(school.created_at, created);
        assert!(school.updated_at >= created);
    }

    #[test]
    fn test_empty_patch_keeps_name() {
        let mut school = School::new("Springfield Elementary");
        school.apply(SchoolPatch::default());
        assert_eq!(school.name, "Springfield Elementary");
    }
}
