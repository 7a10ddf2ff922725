//! Instructor dashboard and program authoring.

use std::path::Path;

use moveminds_dto::Role;
use owo_colors::OwoColorize;
use serde_json::json;
use tabled::Tabled;

use super::Context;
use crate::cli::OutputOptions;
use crate::display::{format_active_colored, print_json, print_table};
use crate::error::Result;
use crate::forms::FormValues;
use crate::views::instructor::InstructorView;
use crate::views::programs::price_label;

#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Program")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Enrolled")]
    enrolled: usize,
    #[tabled(rename = "Active")]
    active: usize,
    #[tabled(rename = "Completed")]
    completed: usize,
    #[tabled(rename = "Status")]
    status: String,
}

pub struct ProgramArgs {
    pub name: String,
    pub description: String,
    pub price: String,
    pub difficulty: String,
    pub weeks: Option<String>,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
}

impl ProgramArgs {
    fn into_values(self) -> FormValues {
        let mut values = FormValues::new()
            .with("name", self.name)
            .with("description", self.description)
            .with("price", self.price)
            .with("difficultyLevel", self.difficulty);
        if let Some(weeks) = self.weeks {
            values.set("durationWeeks", weeks);
        }
        if let Some(id) = self.category_id {
            values.set("categoryId", id.to_string());
        }
        if let Some(id) = self.location_id {
            values.set("locationId", id.to_string());
        }
        values
    }
}

fn view(ctx: &Context) -> Result<InstructorView> {
    ctx.require_role(&[Role::Instructor])?;
    Ok(InstructorView::new(ctx.api.clone(), ctx.notices.clone()))
}

pub async fn cmd_instructor_dashboard(ctx: &Context, output: OutputOptions) -> Result<()> {
    let dashboard = view(ctx)?.dashboard().await?;

    if output.json {
        let programs: Vec<_> = dashboard
            .programs
            .iter()
            .map(|stats| {
                json!({
                    "program": stats.program,
                    "enrolled": stats.enrolled,
                    "active": stats.active,
                    "completed": stats.completed,
                })
            })
            .collect();
        return print_json(&json!({
            "programs": programs,
            "totalStudents": dashboard.total_students(),
            "activePrograms": dashboard.active_programs(),
            "estimatedRevenue": dashboard.estimated_revenue(),
        }));
    }

    let rows: Vec<StatsRow> = dashboard
        .programs
        .iter()
        .map(|stats| StatsRow {
            id: stats.program.id,
            name: stats.program.name.clone(),
            price: price_label(stats.program.price),
            enrolled: stats.enrolled,
            active: stats.active,
            completed: stats.completed,
            status: format_active_colored(stats.program.is_active),
        })
        .collect();
    print_table(rows, "You have not created any programs yet.");
    println!(
        "{} students across {} active programs, {} estimated revenue",
        dashboard.total_students().to_string().bold(),
        dashboard.active_programs().to_string().bold(),
        price_label(dashboard.estimated_revenue()).green()
    );
    Ok(())
}

pub async fn cmd_instructor_create_program(
    ctx: &Context,
    args: ProgramArgs,
    output: OutputOptions,
) -> Result<()> {
    let program = view(ctx)?.create_program(&args.into_values()).await?;
    if output.json {
        return print_json(&program);
    }
    println!(
        "Program {} created: {}",
        program.id.to_string().cyan(),
        program.name
    );
    Ok(())
}

pub async fn cmd_instructor_upload_image(
    ctx: &Context,
    program_id: i64,
    file: &Path,
    output: OutputOptions,
) -> Result<()> {
    let program = view(ctx)?.upload_image(program_id, file).await?;
    if output.json {
        return print_json(&program);
    }
    println!(
        "Image uploaded for {}: {}",
        program.name.cyan(),
        program.image_url.as_deref().unwrap_or_default()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_args_fill_form_fields() {
        let values = ProgramArgs {
            name: "Yoga Basics".to_string(),
            description: "Gentle mornings".to_string(),
            price: "1500".to_string(),
            difficulty: "beginner".to_string(),
            weeks: Some("6".to_string()),
            category_id: Some(3),
            location_id: None,
        }
        .into_values();
        assert_eq!(values.text("difficultyLevel").as_deref(), Some("beginner"));
        assert_eq!(values.text("durationWeeks").as_deref(), Some("6"));
        assert_eq!(values.text("categoryId").as_deref(), Some("3"));
        assert_eq!(values.text("locationId"), None);
    }
}
