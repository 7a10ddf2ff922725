//! Terminal rendering: colored badges, JSON output, notices.

use moveminds_dto::{DifficultyLevel, EnrollmentStatus, PaymentStatus, Role, User};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use tabled::Table;
use tabled::settings::Style;

use crate::collection::{PageResult, PageSource};
use crate::error::Result;
use crate::notices::{NoticeLevel, Notices};
use crate::views::admin_users::verification_badge;

pub fn format_role_colored(role: Role) -> String {
    let badge = format!("[{role}]");
    match role {
        Role::Admin => badge.red().to_string(),
        Role::Instructor => badge.magenta().to_string(),
        Role::User => badge.cyan().to_string(),
    }
}

pub fn format_verification_colored(user: &User) -> String {
    let badge = verification_badge(user);
    if user.is_verified {
        badge.green().to_string()
    } else {
        badge.yellow().to_string()
    }
}

pub fn format_difficulty_colored(level: DifficultyLevel) -> String {
    let badge = level.label();
    match level {
        DifficultyLevel::Beginner => badge.green().to_string(),
        DifficultyLevel::Intermediate => badge.yellow().to_string(),
        DifficultyLevel::Advanced => badge.red().to_string(),
    }
}

pub fn format_enrollment_status_colored(status: EnrollmentStatus) -> String {
    let badge = format!("[{status}]");
    match status {
        EnrollmentStatus::Pending => badge.yellow().to_string(),
        EnrollmentStatus::Active => badge.cyan().to_string(),
        EnrollmentStatus::Completed => badge.green().to_string(),
        EnrollmentStatus::Cancelled => badge.dimmed().to_string(),
    }
}

pub fn format_payment_status_colored(status: Option<PaymentStatus>) -> String {
    match status {
        Some(PaymentStatus::Paid) => "Paid".green().to_string(),
        Some(PaymentStatus::Pending) | None => "Unpaid".yellow().to_string(),
        Some(PaymentStatus::Failed) => "Failed".red().to_string(),
        Some(PaymentStatus::Refunded) => "Refunded".dimmed().to_string(),
    }
}

pub fn format_active_colored(active: bool) -> String {
    if active {
        "Active".green().to_string()
    } else {
        "Inactive".dimmed().to_string()
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print rows as a rounded table, or a placeholder when there are none.
pub fn print_table<R: tabled::Tabled>(rows: Vec<R>, empty: &str) {
    if rows.is_empty() {
        println!("{}", empty.dimmed());
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

/// "Page 2 of 5 (48 total)" under a listing.
pub fn format_page_footer<T>(page: &PageResult<T>, current_page: usize) -> String {
    let pages = page.total_pages.max(1);
    let mut footer = format!(
        "Page {} of {} ({} total)",
        current_page + 1,
        pages,
        page.total_elements
    );
    if page.source == PageSource::ClientFallback {
        footer.push_str(", filtered locally");
    }
    footer
}

/// Drain pending notices to stderr.
pub fn print_notices(notices: &Notices) {
    for notice in notices.drain() {
        let message = notice.message.as_str();
        let line = match notice.level {
            NoticeLevel::Info => message.to_string(),
            NoticeLevel::Success => format!(
                "{} {message}",
                "✓".if_supports_color(Stream::Stderr, |t| t.green())
            ),
            NoticeLevel::Warning => format!(
                "{} {message}",
                "!".if_supports_color(Stream::Stderr, |t| t.yellow())
            ),
            NoticeLevel::Error => format!(
                "{} {}",
                "✗".if_supports_color(Stream::Stderr, |t| t.red()),
                message.if_supports_color(Stream::Stderr, |t| t.red())
            ),
        };
        eprintln!("{line}");
    }
}
