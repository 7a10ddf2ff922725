//! Public program catalogue commands.

use moveminds_dto::NewComment;
use owo_colors::OwoColorize;
use serde_json::json;
use tabled::Tabled;

use super::{Context, finish_listing, page_index};
use crate::cli::{OutputOptions, ProgramFilterArgs};
use crate::display::{format_difficulty_colored, print_json, print_table};
use crate::error::{MoveMindsError, Result};
use crate::forms::{FormValues, comment_form};
use crate::views::programs::{CatalogueView, ProgramCard, ProgramFilter, price_label};

#[derive(Tabled)]
struct ProgramRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Program")]
    name: String,
    #[tabled(rename = "Instructor")]
    instructor: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Level")]
    difficulty: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<ProgramCard> for ProgramRow {
    fn from(card: ProgramCard) -> Self {
        Self {
            id: card.id,
            name: card.name,
            instructor: card.instructor,
            category: card.category,
            difficulty: card.difficulty.to_string(),
            price: card.price,
        }
    }
}

pub async fn cmd_programs_list(
    ctx: &Context,
    args: ProgramFilterArgs,
    output: OutputOptions,
) -> Result<()> {
    let view = CatalogueView::new(ctx.api.clone(), ctx.page_size(), ctx.notices.clone());
    let programs = view.programs();
    programs.set_search(args.search.unwrap_or_default());
    programs.set_filters(ProgramFilter {
        category: args.category,
        difficulty: args.difficulty,
    });
    programs.set_page(page_index(args.page));
    programs.refresh().await?;

    if !output.json {
        let rows: Vec<ProgramRow> = view.cards().into_iter().map(ProgramRow::from).collect();
        print_table(rows, "No programs match these filters.");
    }
    finish_listing(programs, output.json)
}

pub async fn cmd_programs_show(ctx: &Context, id: i64, output: OutputOptions) -> Result<()> {
    let view = CatalogueView::new(ctx.api.clone(), ctx.page_size(), ctx.notices.clone());
    let program = view.details(id).await?;
    // Comments are optional on this page; a failure only produces a notice.
    let comments = match ctx.api.program_comments(id).await {
        Ok(comments) => comments,
        Err(e) => {
            tracing::warn!(program_id = id, "Failed to load comments: {e}");
            ctx.notices.warning("Comments are unavailable right now");
            Vec::new()
        }
    };

    if output.json {
        return print_json(&json!({ "program": program, "comments": comments }));
    }

    println!("{}", program.name.bold());
    println!(
        "{}  {}  {}",
        format_difficulty_colored(program.difficulty_level),
        price_label(program.price).green(),
        program.category.as_deref().unwrap_or_default().dimmed()
    );
    if let Some(instructor) = &program.instructor_name {
        println!("Instructor: {instructor}");
    }
    if let Some(weeks) = program.duration_weeks {
        println!("Duration: {weeks} weeks");
    }
    if let Some(location) = &program.location {
        println!("Location: {location}");
    }
    if let Some(description) = &program.description {
        println!("\n{description}");
    }
    if !comments.is_empty() {
        println!("\n{}", "Comments".cyan().bold());
        for comment in &comments {
            let rating = comment
                .rating
                .map(|r| format!(" {}", "★".repeat(r as usize).yellow()))
                .unwrap_or_default();
            println!(
                "  {}{}: {}",
                comment.username.as_deref().unwrap_or("anonymous").cyan(),
                rating,
                comment.content
            );
        }
    }
    Ok(())
}

pub async fn cmd_programs_enroll(ctx: &Context, id: i64, output: OutputOptions) -> Result<()> {
    ctx.require_session()?;
    let view = CatalogueView::new(ctx.api.clone(), ctx.page_size(), ctx.notices.clone());
    let enrollment = view.enroll(id).await?;
    if output.json {
        return print_json(&enrollment);
    }
    println!(
        "Enrollment {} created. Pay with `moveminds pay {}`.",
        enrollment.id.to_string().cyan(),
        enrollment.id
    );
    Ok(())
}

pub async fn cmd_programs_comment(
    ctx: &Context,
    id: i64,
    text: &str,
    rating: Option<u8>,
    output: OutputOptions,
) -> Result<()> {
    ctx.require_session()?;
    let mut values = FormValues::new().with("content", text);
    if let Some(rating) = rating {
        values.set("rating", rating.to_string());
    }
    comment_form().validate(&values)?;

    let comment = ctx
        .api
        .add_comment(
            id,
            &NewComment {
                content: values.text("content").unwrap_or_default(),
                rating,
            },
        )
        .await
        .map_err(|e| match e {
            MoveMindsError::Api { status: 404, .. } => {
                MoveMindsError::NotFound(format!("program {id}"))
            }
            other => other,
        })?;
    if output.json {
        return print_json(&comment);
    }
    println!("Comment {} posted", comment.id.to_string().cyan());
    Ok(())
}

pub async fn cmd_programs_delete_comment(
    ctx: &Context,
    comment_id: i64,
    output: OutputOptions,
) -> Result<()> {
    ctx.require_session()?;
    ctx.api
        .delete_comment(comment_id)
        .await
        .map_err(|e| match e {
            MoveMindsError::Api { status: 404, .. } => {
                MoveMindsError::NotFound(format!("comment {comment_id}"))
            }
            other => other,
        })?;
    if output.json {
        return print_json(&json!({ "deleted": comment_id }));
    }
    println!("Comment {} deleted", comment_id.to_string().cyan());
    Ok(())
}
