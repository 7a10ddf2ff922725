//! Enrollments of the signed-in user and checkout.

use std::path::Path;

use moveminds_dto::EnrollmentStatus;
use owo_colors::OwoColorize;
use serde_json::json;
use tabled::Tabled;

use super::{Context, finish_listing, page_index};
use crate::cli::OutputOptions;
use crate::display::{
    format_enrollment_status_colored, format_payment_status_colored, print_json, print_table,
};
use crate::error::{MoveMindsError, Result};
use crate::views::my_programs::{EnrollmentFilter, MyProgramsView};
use crate::views::payment::start_checkout;

#[derive(Tabled)]
struct EnrollmentRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Program")]
    program: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Payment")]
    payment: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Enrolled")]
    enrolled_at: String,
}

fn view(ctx: &Context) -> Result<MyProgramsView> {
    ctx.require_session()?;
    Ok(MyProgramsView::new(
        ctx.api.clone(),
        ctx.page_size(),
        ctx.notices.clone(),
    ))
}

pub async fn cmd_my_programs(
    ctx: &Context,
    status: Option<EnrollmentStatus>,
    page: usize,
    output: OutputOptions,
) -> Result<()> {
    let view = view(ctx)?;
    let enrollments = view.enrollments();
    enrollments.set_filters(EnrollmentFilter { status });
    enrollments.set_page(page_index(page));
    enrollments.refresh().await?;

    if !output.json {
        let rows: Vec<EnrollmentRow> = enrollments
            .items()
            .iter()
            .map(|e| EnrollmentRow {
                id: e.id,
                program: e
                    .program_name
                    .clone()
                    .unwrap_or_else(|| format!("program {}", e.program_id)),
                status: format_enrollment_status_colored(e.status),
                payment: format_payment_status_colored(e.payment_status),
                progress: e.progress_percent.map(|p| format!("{p}%")).unwrap_or_default(),
                enrolled_at: e.enrolled_at.clone().unwrap_or_default(),
            })
            .collect();
        print_table(rows, "You are not enrolled in any programs.");
    }
    finish_listing(enrollments, output.json)
}

pub async fn cmd_my_programs_status(
    ctx: &Context,
    id: i64,
    status: EnrollmentStatus,
    output: OutputOptions,
) -> Result<()> {
    let view = view(ctx)?;
    view.update_status(id, status).await?;
    if output.json {
        return print_json(&json!({ "id": id, "status": status }));
    }
    println!(
        "Enrollment {} is now {}",
        id.to_string().cyan(),
        format_enrollment_status_colored(status)
    );
    Ok(())
}

pub async fn cmd_pay(
    ctx: &Context,
    enrollment_id: i64,
    html: Option<&Path>,
    output: OutputOptions,
) -> Result<()> {
    let view = view(ctx)?;
    let enrollment = view
        .enrollments()
        .locate(enrollment_id)
        .await?
        .ok_or_else(|| MoveMindsError::NotFound(format!("enrollment {enrollment_id}")))?;
    let checkout = start_checkout(&ctx.api, &ctx.config.payment, &enrollment).await?;

    if let Some(path) = html {
        tokio::fs::write(path, checkout.to_html()?).await?;
        ctx.notices
            .info(format!("Open {} in a browser to pay", path.display()));
    }

    if output.json {
        let fields: serde_json::Map<String, serde_json::Value> = checkout
            .fields
            .iter()
            .map(|(name, value)| (name.to_string(), json!(value)))
            .collect();
        return print_json(&json!({ "action": checkout.action, "fields": fields }));
    }
    if html.is_none() {
        println!(
            "POST {}",
            checkout.action.as_deref().unwrap_or("(no checkout URL)").cyan()
        );
        for (name, value) in &checkout.fields {
            println!("  {name} = {value}");
        }
    }
    Ok(())
}
