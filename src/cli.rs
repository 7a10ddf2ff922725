use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use moveminds_dto::{DifficultyLevel, EnrollmentStatus, Role};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "moveminds")]
#[command(about = "MoveMinds fitness marketplace from the terminal")]
#[command(version)]
pub struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output flags shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        username: String,

        /// Password (read from stdin if not provided)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create a new account
    Register(RegisterArgs),

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Keep running and report sign-ins and sign-outs from other shells
        #[arg(long)]
        follow: bool,
    },

    /// Browse the program catalogue
    Programs {
        #[command(subcommand)]
        action: ProgramsAction,
    },

    /// Administration (admin role required)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Personal activity log
    Activities {
        #[command(subcommand)]
        action: ActivitiesAction,
    },

    /// Conversations with instructors and members
    Messages {
        #[command(subcommand)]
        action: MessagesAction,
    },

    /// Programs you are enrolled in
    MyPrograms {
        #[command(subcommand)]
        action: Option<MyProgramsAction>,

        /// Filter by status: pending, active, completed, cancelled
        #[arg(long, value_parser = parse_enrollment_status)]
        status: Option<EnrollmentStatus>,

        /// Page number, starting at 1
        #[arg(long, default_value = "1", value_parser = parse_page)]
        page: usize,
    },

    /// Start checkout for an unpaid enrollment
    Pay {
        enrollment_id: i64,

        /// Write a self-submitting checkout form to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Program content (modules, lessons, resources)
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },

    /// Instructor tools
    Instructor {
        #[command(subcommand)]
        action: InstructorAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// Account type: user or instructor
    #[arg(long, default_value = "user", value_parser = parse_role)]
    pub role: Role,

    /// Password; when omitted, the password and its confirmation are read from stdin
    #[arg(long)]
    pub password: Option<String>,
}

/// Filters shared by the program listings.
#[derive(Args)]
pub struct ProgramFilterArgs {
    /// Search names and descriptions
    #[arg(long)]
    pub search: Option<String>,

    /// Category name
    #[arg(long)]
    pub category: Option<String>,

    /// Difficulty: beginner, intermediate, advanced
    #[arg(long, value_parser = parse_difficulty)]
    pub difficulty: Option<DifficultyLevel>,

    /// Page number, starting at 1
    #[arg(long, default_value = "1", value_parser = parse_page)]
    pub page: usize,
}

#[derive(Subcommand)]
pub enum ProgramsAction {
    /// List programs
    #[command(visible_alias = "ls")]
    List(ProgramFilterArgs),

    /// Show program details and comments
    Show { id: i64 },

    /// Enroll in a program
    Enroll { id: i64 },

    /// Comment on a program
    Comment {
        id: i64,

        text: String,

        /// Rating from 1 to 5
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,
    },

    /// Delete one of your comments
    DeleteComment { comment_id: i64 },
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// List users
    Users {
        /// Role: user, instructor, admin
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,

        /// Only verified users
        #[arg(long, conflicts_with = "unverified")]
        verified: bool,

        /// Only users awaiting verification
        #[arg(long)]
        unverified: bool,

        /// Search username, email and name
        #[arg(long)]
        search: Option<String>,

        /// Page number, starting at 1
        #[arg(long, default_value = "1", value_parser = parse_page)]
        page: usize,
    },

    /// Verify a user (or revoke verification)
    Verify {
        id: i64,

        #[arg(long)]
        revoke: bool,
    },

    /// Activate a user account (or deactivate it)
    Activate {
        id: i64,

        #[arg(long)]
        deactivate: bool,
    },

    /// Delete a user; the username must be repeated to confirm
    DeleteUser {
        id: i64,

        #[arg(long)]
        confirm: String,
    },

    /// List programs for moderation
    Programs {
        #[command(flatten)]
        filters: ProgramFilterArgs,

        /// Only active programs
        #[arg(long, conflicts_with = "inactive")]
        active: bool,

        /// Only inactive programs
        #[arg(long)]
        inactive: bool,
    },

    /// Activate a program (or deactivate it)
    ActivateProgram {
        id: i64,

        #[arg(long)]
        deactivate: bool,
    },

    /// Delete a program; the program name must be repeated to confirm
    DeleteProgram {
        id: i64,

        #[arg(long)]
        confirm: String,
    },
}

#[derive(Subcommand)]
pub enum ActivitiesAction {
    /// List logged activities, newest first
    #[command(visible_alias = "ls")]
    List {
        /// Only this activity type
        #[arg(long = "type")]
        activity_type: Option<String>,

        /// Page number, starting at 1
        #[arg(long, default_value = "1", value_parser = parse_page)]
        page: usize,
    },

    /// Log an activity
    Log {
        /// Activity type, e.g. Running
        #[arg(long = "type")]
        activity_type: String,

        /// Duration in minutes
        #[arg(long)]
        duration: String,

        #[arg(long)]
        calories: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Date of the activity (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Program the activity belongs to
        #[arg(long)]
        program: Option<i64>,
    },

    /// Delete an activity; its label must be repeated to confirm
    Delete {
        id: i64,

        #[arg(long)]
        confirm: String,
    },
}

#[derive(Subcommand)]
pub enum MessagesAction {
    /// List conversations
    #[command(visible_alias = "ls")]
    List {
        /// Search participant names and last messages
        #[arg(long)]
        search: Option<String>,

        /// Only conversations with unread messages
        #[arg(long)]
        unread: bool,

        /// Page number, starting at 1
        #[arg(long, default_value = "1", value_parser = parse_page)]
        page: usize,
    },

    /// Show a conversation and mark it read
    Read { user_id: i64 },

    /// Send a message
    Send {
        user_id: i64,

        /// Message text
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum MyProgramsAction {
    /// Cancel an enrollment
    Cancel { id: i64 },

    /// Mark an enrollment completed
    Complete { id: i64 },
}

#[derive(Subcommand)]
pub enum ContentAction {
    /// Show modules, lessons and resources of a program
    Show { program_id: i64 },

    /// Add a module
    AddModule {
        program_id: i64,

        #[arg(long)]
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// Position (defaults to the end)
        #[arg(long)]
        order: Option<String>,
    },

    /// Add a lesson to a module
    AddLesson {
        program_id: i64,
        module_id: i64,

        #[arg(long)]
        title: String,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        video_url: Option<String>,

        /// Position (defaults to the end)
        #[arg(long)]
        order: Option<String>,
    },

    /// Upload a file to a lesson
    Upload {
        program_id: i64,
        lesson_id: i64,
        file: PathBuf,

        #[arg(long)]
        title: Option<String>,
    },

    /// Delete a module with its lessons
    DeleteModule { program_id: i64, module_id: i64 },

    /// Delete a lesson
    DeleteLesson { program_id: i64, lesson_id: i64 },

    /// Delete a lesson resource
    DeleteResource { program_id: i64, resource_id: i64 },
}

#[derive(Subcommand)]
pub enum InstructorAction {
    /// Your programs with enrollment counts
    Dashboard,

    /// Create a program
    CreateProgram {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        price: String,

        /// Difficulty: beginner, intermediate, advanced
        #[arg(long)]
        difficulty: String,

        /// Duration in weeks
        #[arg(long)]
        weeks: Option<String>,

        #[arg(long)]
        category_id: Option<i64>,

        #[arg(long)]
        location_id: Option<i64>,
    },

    /// Upload a cover image for a program
    UploadImage { program_id: i64, file: PathBuf },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Config key: api_base_url, request_timeout, page_size,
        /// username_check_debounce_ms, payment.return_url, payment.cancel_url
        key: String,

        value: String,
    },

    /// Get a configuration value
    Get { key: String },
}

fn parse_with_validation<T>(
    s: &str,
    parser: impl Fn(&str) -> Result<T, String>,
    kind: &str,
    valid_values: &[&str],
) -> Result<T, String> {
    parser(s).map_err(|_| {
        format!(
            "Invalid {kind} '{s}'. Must be one of: {}",
            valid_values.join(", ")
        )
    })
}

fn parse_role(s: &str) -> Result<Role, String> {
    parse_with_validation(
        s,
        |v| Role::from_str(v).map_err(|e| e.to_string()),
        "role",
        &["user", "instructor", "admin"],
    )
}

fn parse_difficulty(s: &str) -> Result<DifficultyLevel, String> {
    parse_with_validation(
        s,
        |v| DifficultyLevel::from_str(v).map_err(|e| e.to_string()),
        "difficulty",
        &["beginner", "intermediate", "advanced"],
    )
}

fn parse_enrollment_status(s: &str) -> Result<EnrollmentStatus, String> {
    parse_with_validation(
        s,
        |v| EnrollmentStatus::from_str(v).map_err(|e| e.to_string()),
        "status",
        &["pending", "active", "completed", "cancelled"],
    )
}

/// Pages are 1-based on the command line.
fn parse_page(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("Invalid page '{s}'. Pages start at 1")),
        Ok(n) => Ok(n),
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "moveminds", &mut io::stdout());
}
