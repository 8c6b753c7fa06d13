//! School DTOs

use domain_billing::{CreateSchoolRequest, SchoolPatch};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewSchoolRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

impl From<NewSchoolRequest> for CreateSchoolRequest {
    fn from(request: NewSchoolRequest) -> Self {
        CreateSchoolRequest { name: request.name }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateSchoolRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

impl From<UpdateSchoolRequest> for SchoolPatch {
    fn from(request: UpdateSchoolRequest) -> Self {
        SchoolPatch { name: request.name }
    }
}
