//! Sign-in, registration and session inspection.

use moveminds_dto::RegisterRequest;
use owo_colors::OwoColorize;
use serde_json::json;

use super::{Context, read_line};
use crate::cli::{OutputOptions, RegisterArgs};
use crate::display::{format_role_colored, print_json};
use crate::error::{MoveMindsError, Result};
use crate::forms::{FormValues, SubmitGate, UsernameCheck, UsernameState, registration_form};
use crate::session::{SessionState, SessionWatcher};

pub async fn cmd_login(
    ctx: &Context,
    username: &str,
    password: Option<String>,
    output: OutputOptions,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_line("Password: ")?,
    };
    let session = ctx.api.login(username, &password).await?;

    if output.json {
        return print_json(&json!({
            "username": session.username,
            "userId": session.user_id,
            "role": session.role,
        }));
    }
    println!(
        "Signed in as {} {}",
        session.username.cyan(),
        format_role_colored(session.role)
    );
    Ok(())
}

pub async fn cmd_register(ctx: &Context, args: RegisterArgs, output: OutputOptions) -> Result<()> {
    // A password given on the command line is its own confirmation.
    let (password, confirm) = match args.password {
        Some(p) => (p.clone(), p),
        None => (
            read_line("Password: ")?,
            read_line("Confirm password: ")?,
        ),
    };

    let values = FormValues::new()
        .with("username", args.username.as_str())
        .with("email", args.email.as_str())
        .with("firstName", args.first_name.as_str())
        .with("lastName", args.last_name.as_str())
        .with("password", password.as_str())
        .with("confirmPassword", confirm)
        .with("role", args.role.as_param());
    let schema_result = registration_form().validate(&values);

    let check = UsernameCheck::new(ctx.api.clone(), ctx.config.username_debounce());
    check.input(&args.username);
    let username_state = check
        .subscribe()
        .wait_for(|state| *state != UsernameState::Checking)
        .await
        .map(|state| *state)
        .unwrap_or(UsernameState::Idle);

    if !SubmitGate::can_submit(&schema_result, Some(username_state)) {
        schema_result?;
        return Err(MoveMindsError::InvalidArgument(format!(
            "username '{}' is already taken",
            args.username
        )));
    }

    let user = ctx
        .api
        .register(&RegisterRequest {
            username: args.username,
            email: args.email,
            password,
            first_name: args.first_name,
            last_name: args.last_name,
            role: args.role,
        })
        .await?;

    if output.json {
        return print_json(&user);
    }
    println!(
        "Registered {} {}. Sign in with `moveminds login {}`.",
        user.username.cyan(),
        format_role_colored(user.role),
        user.username
    );
    Ok(())
}

pub async fn cmd_logout(ctx: &Context, output: OutputOptions) -> Result<()> {
    ctx.api.logout().await?;
    if output.json {
        return print_json(&json!({ "signedIn": false }));
    }
    println!("Signed out");
    Ok(())
}

pub async fn cmd_whoami(ctx: &Context, follow: bool, output: OutputOptions) -> Result<()> {
    print_session_state(&ctx.session().current(), output)?;
    if !follow {
        return Ok(());
    }

    let _watcher = SessionWatcher::start(ctx.session().clone())?;
    let mut rx = ctx.session().subscribe();
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let state = rx.borrow_and_update().clone();
                print_session_state(&state, output)?;
            }
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

fn print_session_state(state: &SessionState, output: OutputOptions) -> Result<()> {
    if output.json {
        let value = match state {
            SessionState::SignedIn(session) => json!({
                "signedIn": true,
                "username": session.username,
                "userId": session.user_id,
                "role": session.role,
            }),
            SessionState::SignedOut => json!({ "signedIn": false }),
            SessionState::Expired { redirect_to } => {
                json!({ "signedIn": false, "expired": true, "redirectTo": redirect_to })
            }
        };
        return print_json(&value);
    }
    match state {
        SessionState::SignedIn(session) => println!(
            "{} {} (id {})",
            session.username.cyan(),
            format_role_colored(session.role),
            session.user_id
        ),
        SessionState::SignedOut => println!("{}", "Not signed in".dimmed()),
        SessionState::Expired { .. } => {
            println!("{}", "Session expired, sign in again".yellow())
        }
    }
    Ok(())
}
