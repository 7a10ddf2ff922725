//! Admin program moderation. Every filter maps to a query parameter.

use moveminds_dto::{DifficultyLevel, Page, Program};

use crate::api::{AdminProgramQuery, ApiClient};
use crate::collection::{
    CollectionSource, DeleteDialog, DeleteTarget, FilterSet, FilterState, RemoteCollection,
    same_text, search_matches,
};
use crate::error::{MoveMindsError, Result};
use crate::notices::Notices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminProgramFilter {
    pub category: Option<String>,
    pub difficulty: Option<DifficultyLevel>,
    pub status: Option<ProgramStatus>,
}

impl FilterSet<Program> for AdminProgramFilter {
    fn matches(&self, program: &Program, search: &str) -> bool {
        self.category.as_deref().is_none_or(|wanted| {
            program
                .category
                .as_deref()
                .is_some_and(|c| same_text(c, wanted))
        }) && self
            .difficulty
            .is_none_or(|d| program.difficulty_level == d)
            && self.status.is_none_or(|s| match s {
                ProgramStatus::Active => program.is_active,
                ProgramStatus::Inactive => !program.is_active,
            })
            && search_matches(
                search,
                &[Some(&program.name), program.instructor_name.as_deref()],
            )
    }
}

pub struct AdminProgramsSource {
    api: ApiClient,
}

impl CollectionSource for AdminProgramsSource {
    type Item = Program;
    type Filter = AdminProgramFilter;

    async fn fetch(&self, request: &FilterState<AdminProgramFilter>) -> Result<Page<Program>> {
        let filters = &request.filters;
        self.api
            .admin_programs(&AdminProgramQuery {
                page: request.current_page,
                size: request.page_size,
                category: filters.category.clone(),
                difficulty: filters.difficulty,
                active: filters.status.map(|s| s == ProgramStatus::Active),
                search: super::search_param(&request.search_term),
            })
            .await
    }
}

pub struct AdminProgramsView {
    api: ApiClient,
    programs: RemoteCollection<AdminProgramsSource>,
    delete: DeleteDialog,
}

impl AdminProgramsView {
    pub fn new(api: ApiClient, page_size: usize, notices: Notices) -> Self {
        let source = AdminProgramsSource { api: api.clone() };
        Self {
            api,
            programs: RemoteCollection::with_notices(source, page_size, notices),
            delete: DeleteDialog::new(),
        }
    }

    pub fn programs(&self) -> &RemoteCollection<AdminProgramsSource> {
        &self.programs
    }

    pub async fn set_active(&self, program_id: i64, active: bool) -> Result<()> {
        self.programs
            .apply_and_commit(
                program_id,
                || self.api.set_program_active(program_id, active),
                |program| Program {
                    is_active: active,
                    ..program.clone()
                },
            )
            .await?;
        self.programs.notices().success(if active {
            "Program activated"
        } else {
            "Program deactivated"
        });
        Ok(())
    }

    /// Start deleting a program; its name must be typed back to confirm.
    pub async fn request_delete(&mut self, program_id: i64) -> Result<&DeleteTarget> {
        let program = self
            .programs
            .locate(program_id)
            .await?
            .ok_or_else(|| MoveMindsError::NotFound(format!("program {program_id}")))?;
        self.delete.open(program.id, program.name.clone(), "program");
        self.delete
            .target()
            .ok_or_else(|| MoveMindsError::Other("delete dialog did not open".to_string()))
    }

    pub async fn confirm_delete(&mut self, typed_name: &str) -> Result<()> {
        let api = &self.api;
        self.delete
            .confirm(&self.programs, typed_name, |id| api.admin_delete_program(id))
            .await
    }

    pub fn delete_dialog(&self) -> &DeleteDialog {
        &self.delete
    }
}
