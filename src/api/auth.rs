use moveminds_dto::{
    AuthResponse, LoginRequest, PasswordChange, ProfileUpdate, RegisterRequest, User,
    UsernameAvailability,
};
use reqwest::Method;

use super::ApiClient;
use crate::error::Result;
use crate::session::Session;

impl ApiClient {
    /// Exchange credentials for a token and make it the current session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self
            .send_json(Method::POST, "/auth/login", &request)
            .await?;
        let session = Session::from(auth);
        self.session().sign_in(session.clone())?;
        Ok(session)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        self.send_json(Method::POST, "/auth/register", request).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.session().sign_out()
    }

    pub async fn check_username(&self, username: &str) -> Result<bool> {
        let availability: UsernameAvailability = self
            .get(
                "/auth/check-username",
                &vec![("username", username.to_string())],
            )
            .await?;
        Ok(availability.available)
    }

    pub async fn current_user(&self) -> Result<User> {
        self.get("/users/me", &Vec::new()).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.send_json(Method::PUT, "/users/me", update).await
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        self.send_unit(Method::PUT, "/users/me/password", Some(change))
            .await
    }
}
