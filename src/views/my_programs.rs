//! The signed-in user's enrollments.

use moveminds_dto::{Enrollment, EnrollmentStatus, Page};

use crate::api::{ApiClient, EnrollmentQuery};
use crate::collection::{
    CollectionSource, FilterSet, FilterState, RemoteCollection, search_matches,
};
use crate::error::{MoveMindsError, Result};
use crate::notices::Notices;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrollmentFilter {
    pub status: Option<EnrollmentStatus>,
}

impl FilterSet<Enrollment> for EnrollmentFilter {
    fn matches(&self, enrollment: &Enrollment, search: &str) -> bool {
        self.status.is_none_or(|s| enrollment.status == s)
            && search_matches(search, &[enrollment.program_name.as_deref()])
    }
}

pub struct EnrollmentSource {
    api: ApiClient,
}

impl CollectionSource for EnrollmentSource {
    type Item = Enrollment;
    type Filter = EnrollmentFilter;

    async fn fetch(&self, request: &FilterState<EnrollmentFilter>) -> Result<Page<Enrollment>> {
        self.api
            .my_enrollments(&EnrollmentQuery {
                page: request.current_page,
                size: request.page_size,
                status: request.filters.status,
            })
            .await
    }
}

pub struct MyProgramsView {
    api: ApiClient,
    enrollments: RemoteCollection<EnrollmentSource>,
}

impl MyProgramsView {
    pub fn new(api: ApiClient, page_size: usize, notices: Notices) -> Self {
        let source = EnrollmentSource { api: api.clone() };
        Self {
            api,
            enrollments: RemoteCollection::with_notices(source, page_size, notices),
        }
    }

    pub fn enrollments(&self) -> &RemoteCollection<EnrollmentSource> {
        &self.enrollments
    }

    pub async fn update_status(&self, enrollment_id: i64, status: EnrollmentStatus) -> Result<()> {
        let current = self
            .enrollments
            .locate(enrollment_id)
            .await?
            .ok_or_else(|| MoveMindsError::NotFound(format!("enrollment {enrollment_id}")))?;
        if !can_transition(current.status, status) {
            return Err(MoveMindsError::InvalidArgument(format!(
                "cannot move a {} enrollment to {}",
                current.status, status
            )));
        }
        self.enrollments
            .apply_and_commit(
                enrollment_id,
                || self.api.update_enrollment_status(enrollment_id, status),
                |enrollment| Enrollment {
                    status,
                    progress_percent: match status {
                        EnrollmentStatus::Completed => Some(100),
                        _ => enrollment.progress_percent,
                    },
                    ..enrollment.clone()
                },
            )
            .await?;
        self.enrollments
            .notices()
            .success(format!("Enrollment marked {status}"));
        Ok(())
    }

    pub async fn cancel(&self, enrollment_id: i64) -> Result<()> {
        self.update_status(enrollment_id, EnrollmentStatus::Cancelled)
            .await
    }

    pub async fn complete(&self, enrollment_id: i64) -> Result<()> {
        self.update_status(enrollment_id, EnrollmentStatus::Completed)
            .await
    }
}

/// Finished enrollments stay finished.
fn can_transition(from: EnrollmentStatus, to: EnrollmentStatus) -> bool {
    !matches!(
        from,
        EnrollmentStatus::Completed | EnrollmentStatus::Cancelled
    ) && from != to
}
