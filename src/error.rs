use moveminds_dto::DtoError;
use thiserror::Error;

use crate::forms::ValidationErrors;

#[derive(Error, Debug)]
pub enum MoveMindsError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    #[error("API error ({status}){}", message_suffix(.message))]
    Api { status: u16, message: Option<String> },

    /// The backend answered 401; the stored session has already been cleared.
    #[error("session expired, please log in again")]
    Unauthorized,

    #[error("unexpected response: {0}")]
    Decode(#[from] DtoError),

    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("'{0}' was not confirmed")]
    NotConfirmed(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("not signed in, run `moveminds login` first")]
    NotSignedIn,

    #[error("this command requires the {0} role")]
    PermissionDenied(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl MoveMindsError {
    /// Text for a notice shown to the user.
    ///
    /// Prefers the backend's own message for API errors so a rejected
    /// request reads the way the server phrased it.
    pub fn user_message(&self) -> String {
        match self {
            MoveMindsError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            MoveMindsError::Api {
                status,
                message: None,
            } => format!("Request failed with status {status}"),
            MoveMindsError::Network(_) => {
                "Could not reach the server. Check your connection.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            MoveMindsError::Api { status, .. } => Some(*status),
            MoveMindsError::Unauthorized => Some(401),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for MoveMindsError {
    fn from(errors: ValidationErrors) -> Self {
        MoveMindsError::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, MoveMindsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = MoveMindsError::Api {
            status: 409,
            message: Some("Username already exists".to_string()),
        };
        assert_eq!(err.to_string(), "API error (409): Username already exists");
        assert_eq!(err.user_message(), "Username already exists");

        let bare = MoveMindsError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(bare.to_string(), "API error (500)");
        assert_eq!(bare.user_message(), "Request failed with status 500");
    }

    #[test]
    fn test_status() {
        assert_eq!(MoveMindsError::Unauthorized.status(), Some(401));
        assert_eq!(MoveMindsError::Network("refused".into()).status(), None);
    }
}
