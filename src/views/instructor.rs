//! Instructor dashboard: own programs with enrollment counts.

use futures::future::try_join_all;
use moveminds_dto::{Enrollment, EnrollmentStatus, Program};

use crate::api::ApiClient;
use crate::error::{MoveMindsError, Result};
use crate::forms::FormValues;
use crate::notices::Notices;

use super::programs::program_draft;

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramStats {
    pub program: Program,
    pub enrolled: usize,
    pub active: usize,
    pub completed: usize,
}

impl ProgramStats {
    fn new(program: Program, enrollments: &[Enrollment]) -> Self {
        let count =
            |status: EnrollmentStatus| enrollments.iter().filter(|e| e.status == status).count();
        Self {
            enrolled: enrollments
                .iter()
                .filter(|e| e.status != EnrollmentStatus::Cancelled)
                .count(),
            active: count(EnrollmentStatus::Active),
            completed: count(EnrollmentStatus::Completed),
            program,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructorDashboard {
    pub programs: Vec<ProgramStats>,
}

impl InstructorDashboard {
    pub fn total_students(&self) -> usize {
        self.programs.iter().map(|p| p.enrolled).sum()
    }

    pub fn active_programs(&self) -> usize {
        self.programs.iter().filter(|p| p.program.is_active).count()
    }

    /// Revenue from non-cancelled enrollments at list price.
    pub fn estimated_revenue(&self) -> f64 {
        self.programs
            .iter()
            .map(|p| p.program.price * p.enrolled as f64)
            .sum()
    }
}

pub struct InstructorView {
    api: ApiClient,
    notices: Notices,
}

impl InstructorView {
    pub fn new(api: ApiClient, notices: Notices) -> Self {
        Self { api, notices }
    }

    fn instructor_id(&self) -> Result<i64> {
        self.api
            .session()
            .session()
            .map(|s| s.user_id)
            .ok_or(MoveMindsError::NotSignedIn)
    }

    /// Load the signed-in instructor's programs and their enrollments.
    pub async fn dashboard(&self) -> Result<InstructorDashboard> {
        let instructor_id = self.instructor_id()?;
        let programs = self.api.instructor_programs(instructor_id).await?;
        let enrollments = try_join_all(
            programs
                .iter()
                .map(|program| self.api.program_enrollments(program.id)),
        )
        .await?;
        tracing::debug!(
            instructor_id,
            programs = programs.len(),
            "loaded instructor dashboard"
        );
        Ok(InstructorDashboard {
            programs: programs
                .into_iter()
                .zip(enrollments)
                .map(|(program, enrollments)| ProgramStats::new(program, &enrollments))
                .collect(),
        })
    }

    pub async fn create_program(&self, values: &FormValues) -> Result<Program> {
        let draft = program_draft(values)?;
        let program = self.api.create_program(&draft).await?;
        self.notices
            .success(format!("Created program '{}'", program.name));
        Ok(program)
    }

    pub async fn update_program(&self, program_id: i64, values: &FormValues) -> Result<Program> {
        let draft = program_draft(values)?;
        let program = self.api.update_program(program_id, &draft).await?;
        self.notices
            .success(format!("Updated program '{}'", program.name));
        Ok(program)
    }

    pub async fn upload_image(&self, program_id: i64, path: &std::path::Path) -> Result<Program> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                MoveMindsError::InvalidArgument(format!("not a file: {}", path.display()))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        self.api
            .upload_program_image(program_id, &file_name, bytes)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moveminds_dto::DifficultyLevel;

    fn enrollment(status: EnrollmentStatus) -> Enrollment {
        Enrollment {
            id: 1,
            program_id: 1,
            program_name: None,
            user_id: None,
            username: None,
            status,
            payment_status: None,
            progress_percent: None,
            enrolled_at: None,
        }
    }

    fn program(price: f64, active: bool) -> Program {
        Program {
            id: 1,
            name: "Core Strength".to_string(),
            description: None,
            category: None,
            difficulty_level: DifficultyLevel::Intermediate,
            price,
            duration_weeks: None,
            instructor_id: Some(9),
            instructor_name: None,
            is_active: active,
            image_url: None,
            location: None,
        }
    }

    #[test]
    fn test_stats_ignore_cancelled_enrollments() {
        let stats = ProgramStats::new(
            program(1000.0, true),
            &[
                enrollment(EnrollmentStatus::Active),
                enrollment(EnrollmentStatus::Active),
                enrollment(EnrollmentStatus::Completed),
                enrollment(EnrollmentStatus::Cancelled),
            ],
        );
        assert_eq!(stats.enrolled, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.completed, 1);
    }

    #[test]
    fn test_dashboard_totals() {
        let dashboard = InstructorDashboard {
            programs: vec![
                ProgramStats::new(
                    program(1000.0, true),
                    &[enrollment(EnrollmentStatus::Active)],
                ),
                ProgramStats::new(
                    program(500.0, false),
                    &[
                        enrollment(EnrollmentStatus::Pending),
                        enrollment(EnrollmentStatus::Completed),
                    ],
                ),
            ],
        };
        assert_eq!(dashboard.total_students(), 3);
        assert_eq!(dashboard.active_programs(), 1);
        assert_eq!(dashboard.estimated_revenue(), 2000.0);
    }

    #[tokio::test]
    async fn test_dashboard_requires_sign_in() {
        let api = ApiClient::with_client(
            reqwest::Client::new(),
            "http://localhost:1",
            crate::session::SessionContext::in_memory(Default::default()),
        );
        let view = InstructorView::new(api, Notices::new());
        assert!(matches!(
            view.dashboard().await,
            Err(MoveMindsError::NotSignedIn)
        ));
    }
}
