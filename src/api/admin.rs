use moveminds_dto::{DifficultyLevel, Page, Program, Role, User};
use reqwest::Method;
use serde_json::json;

use super::{ApiClient, QueryParams, page_params, push_param};
use crate::error::Result;

/// Filters the admin user listing understands. Verification status is
/// deliberately absent: the endpoint has no parameter for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminUserQuery {
    pub page: usize,
    pub size: usize,
    pub role: Option<Role>,
    pub search: Option<String>,
}

impl AdminUserQuery {
    pub(crate) fn params(&self) -> QueryParams {
        let mut params = page_params(self.page, self.size);
        push_param(&mut params, "role", self.role.as_ref().map(Role::as_param));
        push_param(&mut params, "search", self.search.as_deref());
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminProgramQuery {
    pub page: usize,
    pub size: usize,
    pub category: Option<String>,
    pub difficulty: Option<DifficultyLevel>,
    /// `Some(true)` for active programs only, `Some(false)` for inactive.
    pub active: Option<bool>,
    pub search: Option<String>,
}

impl AdminProgramQuery {
    pub(crate) fn params(&self) -> QueryParams {
        let mut params = page_params(self.page, self.size);
        push_param(&mut params, "category", self.category.as_deref());
        push_param(
            &mut params,
            "difficulty",
            self.difficulty.as_ref().map(DifficultyLevel::as_param),
        );
        push_param(
            &mut params,
            "status",
            self.active.map(|a| if a { "ACTIVE" } else { "INACTIVE" }),
        );
        push_param(&mut params, "search", self.search.as_deref());
        params
    }
}

impl ApiClient {
    pub async fn admin_users(&self, query: &AdminUserQuery) -> Result<Page<User>> {
        let page: Page<User> = self.get("/admin/users", &query.params()).await?;
        Ok(page.checked(query.size)?)
    }

    /// Mark a user verified or unverified.
    pub async fn update_user_status(&self, user_id: i64, verified: bool) -> Result<()> {
        self.send_unit(
            Method::PATCH,
            &format!("/admin/users/{user_id}/status"),
            Some(&json!({ "isVerified": verified })),
        )
        .await
    }

    pub async fn set_user_active(&self, user_id: i64, active: bool) -> Result<()> {
        self.send_unit(
            Method::PATCH,
            &format!("/admin/users/{user_id}/active"),
            Some(&json!({ "isActive": active })),
        )
        .await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<()> {
        self.delete(&format!("/admin/users/{user_id}")).await
    }

    pub async fn admin_programs(&self, query: &AdminProgramQuery) -> Result<Page<Program>> {
        let page: Page<Program> = self.get("/admin/programs", &query.params()).await?;
        Ok(page.checked(query.size)?)
    }

    pub async fn set_program_active(&self, program_id: i64, active: bool) -> Result<()> {
        self.send_unit(
            Method::PATCH,
            &format!("/admin/programs/{program_id}/status"),
            Some(&json!({ "isActive": active })),
        )
        .await
    }

    pub async fn admin_delete_program(&self, program_id: i64) -> Result<()> {
        self.delete(&format!("/admin/programs/{program_id}")).await
    }
}
