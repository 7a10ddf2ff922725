//! Activity log commands.

use owo_colors::OwoColorize;
use tabled::Tabled;

use super::{Context, finish_listing, page_index};
use crate::cli::OutputOptions;
use crate::display::{print_json, print_table};
use crate::error::Result;
use crate::forms::FormValues;
use crate::views::activities::{ActivitiesView, ActivityFilter};

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    activity_type: String,
    #[tabled(rename = "Minutes")]
    minutes: String,
    #[tabled(rename = "Calories")]
    calories: String,
    #[tabled(rename = "Notes")]
    notes: String,
}

pub struct LogArgs {
    pub activity_type: String,
    pub duration: String,
    pub calories: Option<String>,
    pub notes: Option<String>,
    pub date: Option<String>,
    pub program: Option<i64>,
}

fn view(ctx: &Context) -> Result<ActivitiesView> {
    ctx.require_session()?;
    Ok(ActivitiesView::new(
        ctx.api.clone(),
        ctx.page_size(),
        ctx.notices.clone(),
    ))
}

pub async fn cmd_activities_list(
    ctx: &Context,
    activity_type: Option<String>,
    page: usize,
    output: OutputOptions,
) -> Result<()> {
    let view = view(ctx)?;
    let activities = view.activities();
    activities.set_filters(ActivityFilter { activity_type });
    activities.set_page(page_index(page));
    activities.refresh().await?;

    if !output.json {
        let rows: Vec<ActivityRow> = activities
            .items()
            .iter()
            .map(|a| ActivityRow {
                id: a.id,
                date: a
                    .activity_date
                    .clone()
                    .or_else(|| a.created_at.clone())
                    .unwrap_or_default(),
                activity_type: a.activity_type.clone(),
                minutes: a.duration_minutes.map(|m| m.to_string()).unwrap_or_default(),
                calories: a.calories_burned.map(|c| c.to_string()).unwrap_or_default(),
                notes: a.notes.clone().unwrap_or_default(),
            })
            .collect();
        print_table(rows, "No activities logged yet.");
    }
    finish_listing(activities, output.json)
}

pub async fn cmd_activities_log(ctx: &Context, args: LogArgs, output: OutputOptions) -> Result<()> {
    let view = view(ctx)?;
    let mut values = FormValues::new()
        .with("activityType", args.activity_type)
        .with("durationMinutes", args.duration);
    if let Some(calories) = args.calories {
        values.set("caloriesBurned", calories);
    }
    if let Some(notes) = args.notes {
        values.set("notes", notes);
    }
    if let Some(date) = args.date {
        values.set("activityDate", date);
    }
    if let Some(program) = args.program {
        values.set("programId", program.to_string());
    }

    let activity = view.log(&values).await?;
    if output.json {
        return print_json(&activity);
    }
    println!(
        "Logged {} ({})",
        activity.activity_type.cyan(),
        activity.id
    );
    Ok(())
}

pub async fn cmd_activities_delete(
    ctx: &Context,
    id: i64,
    confirm: &str,
    output: OutputOptions,
) -> Result<()> {
    let mut view = view(ctx)?;
    view.request_delete(id).await?;
    view.confirm_delete(confirm).await?;
    if output.json {
        return print_json(&serde_json::json!({ "id": id, "result": "Deleted" }));
    }
    println!("Deleted activity {}", id.to_string().cyan());
    Ok(())
}
