//! Program content editing for instructors.

use std::path::Path;

use moveminds_dto::Role;
use owo_colors::OwoColorize;
use serde_json::json;

use super::Context;
use crate::cli::OutputOptions;
use crate::display::print_json;
use crate::error::Result;
use crate::forms::FormValues;
use crate::views::content::{ContentEditor, ContentTree};

async fn editor(ctx: &Context, program_id: i64) -> Result<ContentEditor> {
    ctx.require_role(&[Role::Instructor, Role::Admin])?;
    ContentEditor::load(ctx.api.clone(), program_id, ctx.notices.clone()).await
}

fn print_tree(tree: &ContentTree) {
    if tree.modules.is_empty() {
        println!("{}", "No modules yet.".dimmed());
        return;
    }
    for module in &tree.modules {
        println!(
            "{} {} {}",
            format!("[{}]", module.id).dimmed(),
            module.title.bold(),
            format!("({} lessons)", module.lessons.len()).dimmed()
        );
        for lesson in &module.lessons {
            let video = if lesson.video_url.is_some() { " ▶" } else { "" };
            println!(
                "    {} {}{}",
                format!("[{}]", lesson.id).dimmed(),
                lesson.title,
                video.cyan()
            );
            for resource in &lesson.resources {
                println!(
                    "        {} {} {}",
                    format!("[{}]", resource.id).dimmed(),
                    resource.title,
                    resource.url.dimmed()
                );
            }
        }
    }
    println!(
        "{}",
        format!(
            "{} modules, {} lessons",
            tree.modules.len(),
            tree.lesson_count()
        )
        .dimmed()
    );
}

fn report(output: OutputOptions, kind: &str, id: i64, outcome: &str) -> Result<()> {
    if output.json {
        return print_json(&json!({ "kind": kind, "id": id, "result": outcome }));
    }
    println!("{kind} {} {outcome}", id.to_string().cyan());
    Ok(())
}

pub async fn cmd_content_show(ctx: &Context, program_id: i64, output: OutputOptions) -> Result<()> {
    let editor = editor(ctx, program_id).await?;
    if output.json {
        return print_json(&editor.tree().modules);
    }
    print_tree(editor.tree());
    Ok(())
}

pub async fn cmd_content_add_module(
    ctx: &Context,
    program_id: i64,
    title: String,
    description: Option<String>,
    order: Option<String>,
    output: OutputOptions,
) -> Result<()> {
    let mut editor = editor(ctx, program_id).await?;
    let mut values = FormValues::new().with("title", title);
    if let Some(description) = description {
        values.set("description", description);
    }
    if let Some(order) = order {
        values.set("orderIndex", order);
    }
    let module = editor.add_module(&values).await?;
    if output.json {
        return print_json(module);
    }
    println!(
        "Module {} added at position {}",
        module.id.to_string().cyan(),
        module.order_index
    );
    Ok(())
}

pub struct LessonArgs {
    pub title: String,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub order: Option<String>,
}

pub async fn cmd_content_add_lesson(
    ctx: &Context,
    program_id: i64,
    module_id: i64,
    args: LessonArgs,
    output: OutputOptions,
) -> Result<()> {
    let mut editor = editor(ctx, program_id).await?;
    let mut values = FormValues::new().with("title", args.title);
    for (field, value) in [
        ("content", args.content),
        ("videoUrl", args.video_url),
        ("orderIndex", args.order),
    ] {
        if let Some(value) = value {
            values.set(field, value);
        }
    }
    editor.add_lesson(module_id, &values).await?;
    if output.json {
        return print_json(&editor.tree().module(module_id));
    }
    print_tree(editor.tree());
    Ok(())
}

pub async fn cmd_content_upload(
    ctx: &Context,
    program_id: i64,
    lesson_id: i64,
    file: &Path,
    title: Option<String>,
    output: OutputOptions,
) -> Result<()> {
    let mut editor = editor(ctx, program_id).await?;
    let title = title.unwrap_or_else(|| {
        file.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("resource")
            .to_string()
    });
    let resource = editor.upload_resource(lesson_id, &title, file).await?;
    if output.json {
        return print_json(&resource);
    }
    println!(
        "Resource {} available at {}",
        resource.id.to_string().cyan(),
        resource.url
    );
    Ok(())
}

pub async fn cmd_content_delete_module(
    ctx: &Context,
    program_id: i64,
    module_id: i64,
    output: OutputOptions,
) -> Result<()> {
    let mut editor = editor(ctx, program_id).await?;
    editor.delete_module(module_id).await?;
    report(output, "Module", module_id, "deleted")
}

pub async fn cmd_content_delete_lesson(
    ctx: &Context,
    program_id: i64,
    lesson_id: i64,
    output: OutputOptions,
) -> Result<()> {
    let mut editor = editor(ctx, program_id).await?;
    editor.delete_lesson(lesson_id).await?;
    report(output, "Lesson", lesson_id, "deleted")
}

pub async fn cmd_content_delete_resource(
    ctx: &Context,
    program_id: i64,
    resource_id: i64,
    output: OutputOptions,
) -> Result<()> {
    let mut editor = editor(ctx, program_id).await?;
    editor.delete_resource(resource_id).await?;
    report(output, "Resource", resource_id, "deleted")
}
