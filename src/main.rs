use clap::Parser;
use owo_colors::{OwoColorize, Stream};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use moveminds::cli::{
    ActivitiesAction, AdminAction, Cli, Commands, ConfigAction, ContentAction, InstructorAction,
    MessagesAction, MyProgramsAction, OutputOptions, ProgramsAction, generate_completions,
};
use moveminds::commands::{
    Context, LessonArgs, LogArgs, ProgramArgs, UserListArgs, cmd_activities_delete,
    cmd_activities_list, cmd_activities_log, cmd_admin_delete_program, cmd_admin_delete_user,
    cmd_admin_program_active, cmd_admin_programs, cmd_admin_user_active, cmd_admin_users,
    cmd_admin_verify, cmd_config_get, cmd_config_set, cmd_config_show, cmd_content_add_lesson,
    cmd_content_add_module, cmd_content_delete_lesson, cmd_content_delete_module,
    cmd_content_delete_resource, cmd_content_show, cmd_content_upload,
    cmd_instructor_create_program, cmd_instructor_dashboard, cmd_instructor_upload_image,
    cmd_login, cmd_logout, cmd_messages_list, cmd_messages_read, cmd_messages_send,
    cmd_my_programs, cmd_my_programs_status, cmd_pay, cmd_programs_comment,
    cmd_programs_delete_comment, cmd_programs_enroll, cmd_programs_list, cmd_programs_show,
    cmd_register, cmd_whoami,
};
use moveminds::display::print_notices;
use moveminds::{MoveMindsError, Result};
use moveminds_dto::EnrollmentStatus;

const LOG_ENV: &str = "MOVEMINDS_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(ctx: &Context, command: Commands, output: OutputOptions) -> Result<()> {
    match command {
        Commands::Login { username, password } => {
            cmd_login(ctx, &username, password, output).await
        }
        Commands::Register(args) => cmd_register(ctx, args, output).await,
        Commands::Logout => cmd_logout(ctx, output).await,
        Commands::Whoami { follow } => cmd_whoami(ctx, follow, output).await,

        Commands::Programs { action } => match action {
            ProgramsAction::List(filters) => cmd_programs_list(ctx, filters, output).await,
            ProgramsAction::Show { id } => cmd_programs_show(ctx, id, output).await,
            ProgramsAction::Enroll { id } => cmd_programs_enroll(ctx, id, output).await,
            ProgramsAction::Comment { id, text, rating } => {
                cmd_programs_comment(ctx, id, &text, rating, output).await
            }
            ProgramsAction::DeleteComment { comment_id } => {
                cmd_programs_delete_comment(ctx, comment_id, output).await
            }
        },

        Commands::Admin { action } => match action {
            AdminAction::Users {
                role,
                verified,
                unverified,
                search,
                page,
            } => {
                let args = UserListArgs {
                    role,
                    verified,
                    unverified,
                    search,
                    page,
                };
                cmd_admin_users(ctx, args, output).await
            }
            AdminAction::Verify { id, revoke } => cmd_admin_verify(ctx, id, revoke, output).await,
            AdminAction::Activate { id, deactivate } => {
                cmd_admin_user_active(ctx, id, deactivate, output).await
            }
            AdminAction::DeleteUser { id, confirm } => {
                cmd_admin_delete_user(ctx, id, &confirm, output).await
            }
            AdminAction::Programs {
                filters,
                active,
                inactive,
            } => cmd_admin_programs(ctx, filters, active, inactive, output).await,
            AdminAction::ActivateProgram { id, deactivate } => {
                cmd_admin_program_active(ctx, id, deactivate, output).await
            }
            AdminAction::DeleteProgram { id, confirm } => {
                cmd_admin_delete_program(ctx, id, &confirm, output).await
            }
        },

        Commands::Activities { action } => match action {
            ActivitiesAction::List {
                activity_type,
                page,
            } => cmd_activities_list(ctx, activity_type, page, output).await,
            ActivitiesAction::Log {
                activity_type,
                duration,
                calories,
                notes,
                date,
                program,
            } => {
                let args = LogArgs {
                    activity_type,
                    duration,
                    calories,
                    notes,
                    date,
                    program,
                };
                cmd_activities_log(ctx, args, output).await
            }
            ActivitiesAction::Delete { id, confirm } => {
                cmd_activities_delete(ctx, id, &confirm, output).await
            }
        },

        Commands::Messages { action } => match action {
            MessagesAction::List {
                search,
                unread,
                page,
            } => cmd_messages_list(ctx, search, unread, page, output).await,
            MessagesAction::Read { user_id } => cmd_messages_read(ctx, user_id, output).await,
            MessagesAction::Send { user_id, text } => {
                cmd_messages_send(ctx, user_id, &text, output).await
            }
        },

        Commands::MyPrograms {
            action,
            status,
            page,
        } => match action {
            None => cmd_my_programs(ctx, status, page, output).await,
            Some(MyProgramsAction::Cancel { id }) => {
                cmd_my_programs_status(ctx, id, EnrollmentStatus::Cancelled, output).await
            }
            Some(MyProgramsAction::Complete { id }) => {
                cmd_my_programs_status(ctx, id, EnrollmentStatus::Completed, output).await
            }
        },
        Commands::Pay {
            enrollment_id,
            html,
        } => cmd_pay(ctx, enrollment_id, html.as_deref(), output).await,

        Commands::Content { action } => match action {
            ContentAction::Show { program_id } => cmd_content_show(ctx, program_id, output).await,
            ContentAction::AddModule {
                program_id,
                title,
                description,
                order,
            } => cmd_content_add_module(ctx, program_id, title, description, order, output).await,
            ContentAction::AddLesson {
                program_id,
                module_id,
                title,
                content,
                video_url,
                order,
            } => {
                let args = LessonArgs {
                    title,
                    content,
                    video_url,
                    order,
                };
                cmd_content_add_lesson(ctx, program_id, module_id, args, output).await
            }
            ContentAction::Upload {
                program_id,
                lesson_id,
                file,
                title,
            } => cmd_content_upload(ctx, program_id, lesson_id, &file, title, output).await,
            ContentAction::DeleteModule {
                program_id,
                module_id,
            } => cmd_content_delete_module(ctx, program_id, module_id, output).await,
            ContentAction::DeleteLesson {
                program_id,
                lesson_id,
            } => cmd_content_delete_lesson(ctx, program_id, lesson_id, output).await,
            ContentAction::DeleteResource {
                program_id,
                resource_id,
            } => cmd_content_delete_resource(ctx, program_id, resource_id, output).await,
        },

        Commands::Instructor { action } => match action {
            InstructorAction::Dashboard => cmd_instructor_dashboard(ctx, output).await,
            InstructorAction::CreateProgram {
                name,
                description,
                price,
                difficulty,
                weeks,
                category_id,
                location_id,
            } => {
                let args = ProgramArgs {
                    name,
                    description,
                    price,
                    difficulty,
                    weeks,
                    category_id,
                    location_id,
                };
                cmd_instructor_create_program(ctx, args, output).await
            }
            InstructorAction::UploadImage { program_id, file } => {
                cmd_instructor_upload_image(ctx, program_id, &file, output).await
            }
        },

        Commands::Config { .. } | Commands::Completions { .. } => Err(MoveMindsError::Other(
            "config and completions run without a session".to_string(),
        )),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let output = OutputOptions { json: cli.json };

    let result = match cli.command {
        // These work without a readable session or a reachable backend.
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(output),
            ConfigAction::Set { key, value } => cmd_config_set(&key, &value, output),
            ConfigAction::Get { key } => cmd_config_get(&key, output),
        },
        command => match Context::load() {
            Ok(ctx) => {
                let result = run(&ctx, command, output).await;
                print_notices(&ctx.notices);
                result
            }
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{} {}",
                "error:".if_supports_color(Stream::Stderr, |text| text.style(owo_colors::Style::new().red().bold())),
                e
            );
            ExitCode::FAILURE
        }
    }
}
