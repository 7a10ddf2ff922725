//! Wire types for the MoveMinds REST API.
//!
//! Every payload the backend sends is decoded into one of these types at the
//! network boundary. Missing required fields or values of the wrong shape
//! are reported as [`DtoError`] instead of leaking half-populated objects
//! into the rest of the client.

mod auth;
mod content;
mod enrollment;
mod messaging;
mod page;
mod payment;
mod program;
mod user;

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use auth::{
    AuthResponse, LoginRequest, PasswordChange, ProfileUpdate, RegisterRequest,
    UsernameAvailability,
};
pub use content::{Lesson, LessonDraft, ModuleDraft, ProgramModule, Resource, ResourceType};
pub use enrollment::{Enrollment, EnrollmentStatus, PaymentStatus};
pub use messaging::{Comment, Conversation, Message, NewComment, NewMessage};
pub use page::Page;
pub use payment::{PaymentInitiation, PaymentItem};
pub use program::{
    Activity, Category, City, DifficultyLevel, Location, NewActivity, Program, ProgramDraft,
};
pub use user::{Role, User};

/// Errors produced while turning response bytes into typed payloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DtoError {
    #[error("malformed {type_name} payload: {message}")]
    Malformed {
        type_name: &'static str,
        message: String,
    },

    #[error("inconsistent page: {0}")]
    InconsistentPage(String),

    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Decode a response body into `T`.
///
/// The short type name is kept in the error so a log line says which
/// endpoint sent the bad payload.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DtoError> {
    serde_json::from_slice(bytes).map_err(|e| DtoError::Malformed {
        type_name: short_type_name::<T>(),
        message: e.to_string(),
    })
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    // `moveminds_dto::page::Page<moveminds_dto::user::User>` -> `Page`
    let head = full.split('<').next().unwrap_or(full);
    head.rsplit("::").next().unwrap_or(head)
}
