//! Command implementations behind the `moveminds` binary.

mod activities;
mod admin;
mod auth;
mod config;
mod content;
mod instructor;
mod messages;
mod my_programs;
mod programs;

pub use activities::{LogArgs, cmd_activities_delete, cmd_activities_list, cmd_activities_log};
pub use admin::{
    UserListArgs, cmd_admin_delete_program, cmd_admin_delete_user, cmd_admin_program_active,
    cmd_admin_programs, cmd_admin_user_active, cmd_admin_users, cmd_admin_verify,
};
pub use auth::{cmd_login, cmd_logout, cmd_register, cmd_whoami};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use content::{
    LessonArgs, cmd_content_add_lesson, cmd_content_add_module, cmd_content_delete_lesson,
    cmd_content_delete_module, cmd_content_delete_resource, cmd_content_show,
    cmd_content_upload,
};
pub use instructor::{
    ProgramArgs, cmd_instructor_create_program, cmd_instructor_dashboard,
    cmd_instructor_upload_image,
};
pub use messages::{cmd_messages_list, cmd_messages_read, cmd_messages_send};
pub use my_programs::{cmd_my_programs, cmd_my_programs_status, cmd_pay};
pub use programs::{
    cmd_programs_comment, cmd_programs_delete_comment, cmd_programs_enroll, cmd_programs_list,
    cmd_programs_show,
};

use std::io::{self, BufRead, Write};

use moveminds_dto::Role;
use serde_json::json;

use crate::api::ApiClient;
use crate::collection::{CollectionSource, RemoteCollection};
use crate::config::Config;
use crate::display::{format_page_footer, print_json};
use crate::error::{MoveMindsError, Result};
use crate::notices::Notices;
use crate::session::{Session, SessionContext, SessionStore};

/// Everything a command needs: configuration, an API client bound to the
/// stored session, and the notice queue printed after the command.
pub struct Context {
    pub config: Config,
    pub api: ApiClient,
    pub notices: Notices,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = Config::load()?;
        let session = SessionContext::with_store(SessionStore::default_location()?)?;
        let api = ApiClient::new(&config, session)?;
        Ok(Self {
            config,
            api,
            notices: Notices::new(),
        })
    }

    pub fn session(&self) -> &SessionContext {
        self.api.session()
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size.max(1)
    }

    pub fn require_session(&self) -> Result<Session> {
        self.session().session().ok_or(MoveMindsError::NotSignedIn)
    }

    /// The signed-in session, if its role is one of `roles`.
    pub fn require_role(&self, roles: &[Role]) -> Result<Session> {
        let session = self.require_session()?;
        if roles.contains(&session.role) {
            Ok(session)
        } else {
            let names: Vec<String> = roles.iter().map(Role::to_string).collect();
            Err(MoveMindsError::PermissionDenied(names.join(" or ")))
        }
    }
}

/// Read one line from stdin, showing `prompt` on stderr when interactive.
pub(crate) fn read_line(prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Command-line pages are 1-based; collections are 0-based.
pub(crate) fn page_index(page: usize) -> usize {
    page.saturating_sub(1)
}

/// Print the current page of a collection as JSON, or the page footer.
pub(crate) fn finish_listing<S: CollectionSource>(
    collection: &RemoteCollection<S>,
    json: bool,
) -> Result<()>
where
    S::Item: serde::Serialize,
{
    let Some(page) = collection.page() else {
        return Ok(());
    };
    let current_page = collection.filters().current_page;
    if json {
        let content: Vec<&S::Item> = page.content.iter().map(|item| item.as_ref()).collect();
        return print_json(&json!({
            "content": content,
            "page": current_page + 1,
            "totalPages": page.total_pages,
            "totalElements": page.total_elements,
        }));
    }
    println!("{}", format_page_footer(&page, current_page));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_index() {
        assert_eq!(page_index(1), 0);
        assert_eq!(page_index(4), 3);
        assert_eq!(page_index(0), 0);
    }

    #[test]
    fn test_require_role() {
        let session = SessionContext::in_memory(crate::session::SessionState::SignedIn(
            Session::new("token", 7, "nimal", Role::User),
        ));
        let context = Context {
            config: Config::default(),
            api: ApiClient::with_client(reqwest::Client::new(), "http://localhost:1", session),
            notices: Notices::new(),
        };
        assert!(context.require_role(&[Role::User, Role::Admin]).is_ok());
        assert!(matches!(
            context.require_role(&[Role::Admin]),
            Err(MoveMindsError::PermissionDenied(role)) if role == "admin"
        ));
    }
}
