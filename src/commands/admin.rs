//! Admin dashboards: users and program moderation.

use moveminds_dto::Role;
use owo_colors::OwoColorize;
use tabled::Tabled;

use super::{Context, finish_listing, page_index};
use crate::cli::{OutputOptions, ProgramFilterArgs};
use crate::display::{
    format_active_colored, format_difficulty_colored, format_role_colored,
    format_verification_colored, print_json, print_table,
};
use crate::error::Result;
use crate::views::admin_programs::{AdminProgramFilter, AdminProgramsView, ProgramStatus};
use crate::views::admin_users::{AdminUsersView, UserFilter, Verification};
use crate::views::programs::price_label;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Verification")]
    verification: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct ProgramRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Program")]
    name: String,
    #[tabled(rename = "Instructor")]
    instructor: String,
    #[tabled(rename = "Level")]
    difficulty: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Status")]
    status: String,
}

pub struct UserListArgs {
    pub role: Option<Role>,
    pub verified: bool,
    pub unverified: bool,
    pub search: Option<String>,
    pub page: usize,
}

fn admin_users_view(ctx: &Context) -> Result<AdminUsersView> {
    ctx.require_role(&[Role::Admin])?;
    Ok(AdminUsersView::new(
        ctx.api.clone(),
        ctx.page_size(),
        ctx.notices.clone(),
    ))
}

fn admin_programs_view(ctx: &Context) -> Result<AdminProgramsView> {
    ctx.require_role(&[Role::Admin])?;
    Ok(AdminProgramsView::new(
        ctx.api.clone(),
        ctx.page_size(),
        ctx.notices.clone(),
    ))
}

pub async fn cmd_admin_users(
    ctx: &Context,
    args: UserListArgs,
    output: OutputOptions,
) -> Result<()> {
    let view = admin_users_view(ctx)?;
    let users = view.users();
    let verification = match (args.verified, args.unverified) {
        (true, _) => Some(Verification::Verified),
        (_, true) => Some(Verification::Unverified),
        _ => None,
    };
    users.set_search(args.search.unwrap_or_default());
    users.set_filters(UserFilter {
        role: args.role,
        verification,
    });
    users.set_page(page_index(args.page));
    users.refresh().await?;

    if !output.json {
        let rows: Vec<UserRow> = users
            .items()
            .iter()
            .map(|user| UserRow {
                id: user.id,
                username: user.username.clone(),
                name: user.display_name(),
                email: user.email.clone().unwrap_or_default(),
                role: format_role_colored(user.role),
                verification: format_verification_colored(user),
                status: format_active_colored(user.is_active),
            })
            .collect();
        print_table(rows, "No users match these filters.");
    }
    finish_listing(users, output.json)
}

pub async fn cmd_admin_verify(
    ctx: &Context,
    id: i64,
    revoke: bool,
    output: OutputOptions,
) -> Result<()> {
    let view = admin_users_view(ctx)?;
    view.set_verified(id, !revoke).await?;
    report(output, id, if revoke { "Not Verified" } else { "Verified" })
}

pub async fn cmd_admin_user_active(
    ctx: &Context,
    id: i64,
    deactivate: bool,
    output: OutputOptions,
) -> Result<()> {
    let view = admin_users_view(ctx)?;
    view.set_active(id, !deactivate).await?;
    report(output, id, if deactivate { "Inactive" } else { "Active" })
}

pub async fn cmd_admin_delete_user(
    ctx: &Context,
    id: i64,
    confirm: &str,
    output: OutputOptions,
) -> Result<()> {
    let mut view = admin_users_view(ctx)?;
    let target = view.request_delete(id).await?;
    tracing::debug!(id, name = %target.display_name, "confirming user delete");
    view.confirm_delete(confirm).await?;
    report(output, id, "Deleted")
}

pub async fn cmd_admin_programs(
    ctx: &Context,
    filters: ProgramFilterArgs,
    active: bool,
    inactive: bool,
    output: OutputOptions,
) -> Result<()> {
    let view = admin_programs_view(ctx)?;
    let programs = view.programs();
    let status = match (active, inactive) {
        (true, _) => Some(ProgramStatus::Active),
        (_, true) => Some(ProgramStatus::Inactive),
        _ => None,
    };
    programs.set_search(filters.search.unwrap_or_default());
    programs.set_filters(AdminProgramFilter {
        category: filters.category,
        difficulty: filters.difficulty,
        status,
    });
    programs.set_page(page_index(filters.page));
    programs.refresh().await?;

    if !output.json {
        let rows: Vec<ProgramRow> = programs
            .items()
            .iter()
            .map(|program| ProgramRow {
                id: program.id,
                name: program.name.clone(),
                instructor: program.instructor_name.clone().unwrap_or_default(),
                difficulty: format_difficulty_colored(program.difficulty_level),
                price: price_label(program.price),
                status: format_active_colored(program.is_active),
            })
            .collect();
        print_table(rows, "No programs match these filters.");
    }
    finish_listing(programs, output.json)
}

pub async fn cmd_admin_program_active(
    ctx: &Context,
    id: i64,
    deactivate: bool,
    output: OutputOptions,
) -> Result<()> {
    let view = admin_programs_view(ctx)?;
    view.set_active(id, !deactivate).await?;
    report(output, id, if deactivate { "Inactive" } else { "Active" })
}

pub async fn cmd_admin_delete_program(
    ctx: &Context,
    id: i64,
    confirm: &str,
    output: OutputOptions,
) -> Result<()> {
    let mut view = admin_programs_view(ctx)?;
    view.request_delete(id).await?;
    view.confirm_delete(confirm).await?;
    report(output, id, "Deleted")
}

fn report(output: OutputOptions, id: i64, outcome: &str) -> Result<()> {
    if output.json {
        return print_json(&serde_json::json!({ "id": id, "result": outcome }));
    }
    println!("{} {}", id.to_string().cyan(), outcome);
    Ok(())
}
