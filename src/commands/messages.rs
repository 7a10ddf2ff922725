//! Messaging commands.

use owo_colors::OwoColorize;
use serde_json::json;
use tabled::Tabled;

use super::{Context, finish_listing, page_index};
use crate::cli::OutputOptions;
use crate::display::{print_json, print_table};
use crate::error::Result;
use crate::forms::FormValues;
use crate::views::messages::{ConversationFilter, MessagesView};

#[derive(Tabled)]
struct ConversationRow {
    #[tabled(rename = "User")]
    id: i64,
    #[tabled(rename = "With")]
    name: String,
    #[tabled(rename = "Last message")]
    last_message: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Unread")]
    unread: String,
}

fn view(ctx: &Context) -> Result<MessagesView> {
    ctx.require_session()?;
    Ok(MessagesView::new(
        ctx.api.clone(),
        ctx.page_size(),
        ctx.notices.clone(),
    ))
}

fn preview(text: &str) -> String {
    const MAX: usize = 40;
    if text.chars().count() <= MAX {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX - 1).collect();
    format!("{cut}…")
}

pub async fn cmd_messages_list(
    ctx: &Context,
    search: Option<String>,
    unread_only: bool,
    page: usize,
    output: OutputOptions,
) -> Result<()> {
    let view = view(ctx)?;
    let conversations = view.conversations();
    conversations.set_search(search.unwrap_or_default());
    conversations.set_filters(ConversationFilter { unread_only });
    conversations.set_page(page_index(page));
    conversations.refresh().await?;

    if !output.json {
        let rows: Vec<ConversationRow> = conversations
            .items()
            .iter()
            .map(|c| ConversationRow {
                id: c.id,
                name: c.participant_name.clone(),
                last_message: preview(c.last_message.as_deref().unwrap_or_default()),
                when: c.last_message_at.clone().unwrap_or_default(),
                unread: match c.unread_count {
                    0 => String::new(),
                    n => n.to_string().yellow().bold().to_string(),
                },
            })
            .collect();
        print_table(rows, "No conversations.");
        if view.unread_total() > 0 {
            println!("{} unread", view.unread_total().to_string().yellow());
        }
    }
    finish_listing(conversations, output.json)
}

pub async fn cmd_messages_read(ctx: &Context, user_id: i64, output: OutputOptions) -> Result<()> {
    let view = view(ctx)?;
    let session = ctx.require_session()?;
    let thread = view.thread(user_id).await?;
    view.mark_read(user_id, &thread).await?;

    if output.json {
        return print_json(&json!({ "messages": thread }));
    }
    for message in &thread {
        let who = if message.sender_id == session.user_id {
            "you".green().to_string()
        } else {
            message.sender_id.to_string().cyan().to_string()
        };
        println!(
            "{} {}: {}",
            message.sent_at.as_deref().unwrap_or_default().dimmed(),
            who,
            message.content
        );
    }
    if thread.is_empty() {
        println!("{}", "No messages yet.".dimmed());
    }
    Ok(())
}

pub async fn cmd_messages_send(
    ctx: &Context,
    user_id: i64,
    text: &[String],
    output: OutputOptions,
) -> Result<()> {
    let view = view(ctx)?;
    let values = FormValues::new().with("content", text.join(" "));
    let message = view.send(user_id, &values).await?;
    if output.json {
        return print_json(&message);
    }
    println!("Sent message {}", message.id.to_string().cyan());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_messages() {
        assert_eq!(preview("short"), "short");
        let long = "a".repeat(60);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), 40);
        assert!(cut.ends_with('…'));
    }
}
