//! Typed access to the MoveMinds REST API.
//!
//! All requests go through [`ApiClient`], which attaches the bearer token,
//! classifies failures into [`MoveMindsError`] variants and decodes response
//! bodies at the boundary. A 401 is the one cross-cutting policy: it tears
//! down the session and points the user back at the login route, unless the
//! request opted out through [`RequestOptions::skip_auth_redirect`].

mod activities;
mod admin;
mod auth;
mod catalog;
mod content;
mod enrollments;
mod error;
mod messages;
mod payments;
mod programs;

use std::time::Instant;

use reqwest::{Client, Method, RequestBuilder};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{MoveMindsError, Result};
use crate::session::{LOGIN_ROUTE, SessionContext};

pub use activities::ActivityQuery;
pub use admin::{AdminProgramQuery, AdminUserQuery};
pub use enrollments::EnrollmentQuery;
pub use programs::ProgramQuery;

/// Per-request behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Report a 401 as a plain API error instead of ending the session.
    /// Used for non-critical calls whose failure must not disrupt the page.
    pub skip_auth_redirect: bool,
}

impl RequestOptions {
    pub fn quiet_auth() -> Self {
        Self {
            skip_auth_redirect: true,
        }
    }
}

/// Query parameters shared by every paginated endpoint.
pub type QueryParams = Vec<(&'static str, String)>;

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(config: &Config, session: SessionContext) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("moveminds/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MoveMindsError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self::with_client(http, config.api_base_url(), session))
    }

    pub fn with_client(
        http: Client,
        base_url: impl Into<String>,
        session: SessionContext,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<T> {
        self.get_with(path, query, RequestOptions::default()).await
    }

    pub(crate) async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
        options: RequestOptions,
    ) -> Result<T> {
        let builder = self.request(Method::GET, path).query(query);
        let body = self.execute(Method::GET, path, builder, options).await?;
        Ok(moveminds_dto::decode(&body)?)
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.request(method.clone(), path).json(body);
        let bytes = self
            .execute(method, path, builder, RequestOptions::default())
            .await?;
        Ok(moveminds_dto::decode(&bytes)?)
    }

    /// Send a request whose response body is irrelevant (204, echo, etc.).
    pub(crate) async fn send_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<()> {
        let mut builder = self.request(method.clone(), path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(method, path, builder, RequestOptions::default())
            .await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.send_unit::<()>(Method::DELETE, path, None).await
    }

    pub(crate) async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let builder = self.request(Method::POST, path).multipart(form);
        let bytes = self
            .execute(Method::POST, path, builder, RequestOptions::default())
            .await?;
        Ok(moveminds_dto::decode(&bytes)?)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
        options: RequestOptions,
    ) -> Result<Vec<u8>> {
        let started = Instant::now();
        let response = builder.send().await.map_err(error::from_transport)?;
        let status = response.status();
        tracing::debug!(
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "api request"
        );

        if status == reqwest::StatusCode::UNAUTHORIZED {
            let body = response.bytes().await.unwrap_or_default();
            if options.skip_auth_redirect {
                return Err(MoveMindsError::Api {
                    status: status.as_u16(),
                    message: error::extract_message(&body),
                });
            }
            self.session.expire(LOGIN_ROUTE);
            return Err(MoveMindsError::Unauthorized);
        }

        let body = response.bytes().await.map_err(error::from_transport)?;
        if !status.is_success() {
            return Err(MoveMindsError::Api {
                status: status.as_u16(),
                message: error::extract_message(&body),
            });
        }
        Ok(body.to_vec())
    }
}

/// Append the common `page`/`size` parameters.
pub(crate) fn page_params(page: usize, size: usize) -> QueryParams {
    vec![("page", page.to_string()), ("size", size.to_string())]
}

/// Append `key=value` unless the value is empty.
pub(crate) fn push_param(params: &mut QueryParams, key: &'static str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim)
        && !value.is_empty()
    {
        params.push((key, value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_param_skips_blank_values() {
        let mut params = page_params(0, 10);
        push_param(&mut params, "search", Some("  "));
        push_param(&mut params, "role", None);
        push_param(&mut params, "category", Some(" Yoga "));
        assert_eq!(
            params,
            vec![
                ("page", "0".to_string()),
                ("size", "10".to_string()),
                ("category", "Yoga".to_string()),
            ]
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::with_client(
            Client::new(),
            "http://localhost:8080/api/",
            SessionContext::in_memory(Default::default()),
        );
        assert_eq!(client.url("/programs"), "http://localhost:8080/api/programs");
    }
}
