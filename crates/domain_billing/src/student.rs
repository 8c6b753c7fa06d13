//! Student entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{SchoolId, StudentId};

/// A student enrolled at a school
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier
    pub id: StudentId,
    /// Owning school
    pub school_id: SchoolId,
    /// Display name
    pub full_name: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Creates a new student
    ///
    /// # Arguments
    ///
    /// * `school_id` - School the student is enrolled at
    /// * `full_name` - Display name
    pub fn new(school_id: SchoolId, full_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: StudentId::new_v7(),
            school_id,
            full_name: full_name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a sparse update, bumping `updated_at`
    pub fn apply(&mut self, patch: StudentPatch) {
        if let Some(school_id) = patch.school_id {
            self.school_id = school_id;
        }
        if let Some(full_name) = patch.full_name {
            self.full_name = full_name;
        }
        self.updated_at = Utc::now();
    }
}

/// Request for creating a student
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStudentRequest {
    pub school_id: SchoolId,
    pub full_name: String,
}

/// Sparse update for a student
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    /// Moves the student to another school
    pub school_id: Option<SchoolId>,
    pub full_name: Option<String>,
}
