use moveminds_dto::{Enrollment, EnrollmentStatus, Page};
use reqwest::Method;
use serde_json::json;

use super::{ApiClient, QueryParams, page_params, push_param};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrollmentQuery {
    pub page: usize,
    pub size: usize,
    pub status: Option<EnrollmentStatus>,
}

impl EnrollmentQuery {
    pub(crate) fn params(&self) -> QueryParams {
        let mut params = page_params(self.page, self.size);
        push_param(
            &mut params,
            "status",
            self.status.as_ref().map(EnrollmentStatus::as_param),
        );
        params
    }
}

impl ApiClient {
    pub async fn my_enrollments(&self, query: &EnrollmentQuery) -> Result<Page<Enrollment>> {
        let page: Page<Enrollment> = self.get("/user-programs/me", &query.params()).await?;
        Ok(page.checked(query.size)?)
    }

    pub async fn enroll(&self, program_id: i64) -> Result<Enrollment> {
        self.send_json(
            Method::POST,
            "/user-programs",
            &json!({ "programId": program_id }),
        )
        .await
    }

    pub async fn update_enrollment_status(
        &self,
        enrollment_id: i64,
        status: EnrollmentStatus,
    ) -> Result<()> {
        self.send_unit(
            Method::PATCH,
            &format!("/user-programs/{enrollment_id}/status"),
            Some(&json!({ "status": status })),
        )
        .await
    }

    /// Everyone enrolled in one program; used by the instructor dashboard.
    pub async fn program_enrollments(&self, program_id: i64) -> Result<Vec<Enrollment>> {
        self.get(&format!("/user-programs/program/{program_id}"), &Vec::new())
            .await
    }
}
