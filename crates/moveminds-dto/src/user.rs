use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DtoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    Instructor,
    Admin,
}

impl Role {
    /// The value the backend expects in `?role=` query parameters.
    pub fn as_param(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Instructor => "INSTRUCTOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Instructor => write!(f, "instructor"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = DtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            _ => Err(DtoError::UnknownVariant {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Name shown in lists and confirmation dialogs.
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() || !last.is_empty() => {
                format!("{first} {last}").trim().to_string()
            }
            (Some(first), None) if !first.is_empty() => first.to_string(),
            _ => self.username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;

    #[test]
    fn test_role_wire_format() {
        let role: Role = serde_json::from_str("\"INSTRUCTOR\"").unwrap();
        assert_eq!(role, Role::Instructor);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_defaults() {
        let user: User = decode(br#"{"id": 42, "username": "kasun"}"#).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!user.is_verified);
        assert!(user.is_active);
        assert_eq!(user.display_name(), "kasun");
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        let user: User = decode(
            br#"{"id": 1, "username": "nim", "firstName": "Nimali", "lastName": "Perera"}"#,
        )
        .unwrap();
        assert_eq!(user.display_name(), "Nimali Perera");
    }
}
