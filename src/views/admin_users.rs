//! Admin user management.
//!
//! Role and search are evaluated by the backend. Verification status has no
//! query parameter, so filtering on it switches the collection to its
//! client-side fallback.

use moveminds_dto::{Page, Role, User};

use crate::api::{AdminUserQuery, ApiClient};
use crate::collection::{
    CollectionSource, DeleteDialog, DeleteTarget, FilterSet, FilterState, RemoteCollection,
    search_matches,
};
use crate::error::{MoveMindsError, Result};
use crate::notices::Notices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    Unverified,
}

impl Verification {
    fn matches(&self, verified: bool) -> bool {
        match self {
            Verification::Verified => verified,
            Verification::Unverified => !verified,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub verification: Option<Verification>,
}

impl FilterSet<User> for UserFilter {
    fn matches(&self, user: &User, search: &str) -> bool {
        self.role.is_none_or(|role| user.role == role)
            && self
                .verification
                .is_none_or(|v| v.matches(user.is_verified))
            && search_matches(
                search,
                &[
                    Some(&user.username),
                    user.email.as_deref(),
                    user.first_name.as_deref(),
                    user.last_name.as_deref(),
                ],
            )
    }
}

pub struct AdminUsersSource {
    api: ApiClient,
}

impl CollectionSource for AdminUsersSource {
    type Item = User;
    type Filter = UserFilter;

    async fn fetch(&self, request: &FilterState<UserFilter>) -> Result<Page<User>> {
        self.api
            .admin_users(&AdminUserQuery {
                page: request.current_page,
                size: request.page_size,
                role: request.filters.role,
                search: super::search_param(&request.search_term),
            })
            .await
    }

    fn supports(&self, filters: &UserFilter) -> bool {
        filters.verification.is_none()
    }
}

/// Badge text for the verification column.
pub fn verification_badge(user: &User) -> &'static str {
    if user.is_verified {
        "Verified"
    } else {
        "Not Verified"
    }
}

pub struct AdminUsersView {
    api: ApiClient,
    users: RemoteCollection<AdminUsersSource>,
    delete: DeleteDialog,
}

impl AdminUsersView {
    pub fn new(api: ApiClient, page_size: usize, notices: Notices) -> Self {
        let source = AdminUsersSource { api: api.clone() };
        Self {
            api,
            users: RemoteCollection::with_notices(source, page_size, notices),
            delete: DeleteDialog::new(),
        }
    }

    pub fn users(&self) -> &RemoteCollection<AdminUsersSource> {
        &self.users
    }

    pub async fn set_verified(&self, user_id: i64, verified: bool) -> Result<()> {
        self.users
            .apply_and_commit(
                user_id,
                || self.api.update_user_status(user_id, verified),
                |user| User {
                    is_verified: verified,
                    ..user.clone()
                },
            )
            .await?;
        self.users.notices().success(if verified {
            "User verified"
        } else {
            "Verification revoked"
        });
        Ok(())
    }

    pub async fn set_active(&self, user_id: i64, active: bool) -> Result<()> {
        self.users
            .apply_and_commit(
                user_id,
                || self.api.set_user_active(user_id, active),
                |user| User {
                    is_active: active,
                    ..user.clone()
                },
            )
            .await?;
        self.users.notices().success(if active {
            "User activated"
        } else {
            "User deactivated"
        });
        Ok(())
    }

    /// Start deleting a user; the username must be typed back to confirm.
    pub async fn request_delete(&mut self, user_id: i64) -> Result<&DeleteTarget> {
        let user = self
            .users
            .locate(user_id)
            .await?
            .ok_or_else(|| MoveMindsError::NotFound(format!("user {user_id}")))?;
        self.delete.open(user.id, user.username.clone(), "user");
        self.delete
            .target()
            .ok_or_else(|| MoveMindsError::Other("delete dialog did not open".to_string()))
    }

    pub async fn confirm_delete(&mut self, typed_name: &str) -> Result<()> {
        let api = &self.api;
        self.delete
            .confirm(&self.users, typed_name, |id| api.delete_user(id))
            .await
    }

    pub fn delete_dialog(&self) -> &DeleteDialog {
        &self.delete
    }

    pub fn cancel_delete(&mut self) {
        self.delete.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, username: &str, role: Role, verified: bool) -> User {
        User {
            id,
            username: username.to_string(),
            email: Some(format!("{username}@moveminds.lk")),
            first_name: None,
            last_name: None,
            role,
            is_verified: verified,
            is_active: true,
            city: None,
            created_at: None,
        }
    }

    #[test]
    fn test_verification_filter_forces_client_fallback() {
        let source = AdminUsersSource {
            api: ApiClient::with_client(
                reqwest::Client::new(),
                "http://localhost:1",
                crate::session::SessionContext::in_memory(Default::default()),
            ),
        };
        assert!(source.supports(&UserFilter::default()));
        assert!(source.supports(&UserFilter {
            role: Some(Role::Instructor),
            verification: None,
        }));
        assert!(!source.supports(&UserFilter {
            role: None,
            verification: Some(Verification::Unverified),
        }));
    }

    #[test]
    fn test_filter_matches() {
        let coach = user(1, "coach_nuwan", Role::Instructor, false);
        let filter = UserFilter {
            role: Some(Role::Instructor),
            verification: Some(Verification::Unverified),
        };
        assert!(filter.matches(&coach, ""));
        assert!(filter.matches(&coach, "NUWAN"));
        assert!(!filter.matches(&coach, "kasun"));

        let verified = user(2, "coach_ruwan", Role::Instructor, true);
        assert!(!filter.matches(&verified, ""));
        assert!(!filter.matches(&user(3, "member", Role::User, false), ""));
    }

    #[test]
    fn test_verification_badge() {
        assert_eq!(verification_badge(&user(1, "a", Role::User, true)), "Verified");
        assert_eq!(
            verification_badge(&user(1, "a", Role::User, false)),
            "Not Verified"
        );
    }
}
