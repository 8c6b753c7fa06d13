//! Student DTOs

use core_kernel::SchoolId;
use domain_billing::{CreateStudentRequest, StudentPatch};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewStudentRequest {
    pub school_id: SchoolId,
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
}

impl From<NewStudentRequest> for CreateStudentRequest {
    fn from(request: NewStudentRequest) -> Self {
        CreateStudentRequest {
            school_id: request.school_id,
            full_name: request.full_name,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateStudentRequest {
    pub school_id: Option<SchoolId>,
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,
}

impl From<UpdateStudentRequest> for StudentPatch {
    fn from(request: UpdateStudentRequest) -> Self {
        StudentPatch {
            school_id: request.school_id,
            full_name: request.full_name,
        }
    }
}
