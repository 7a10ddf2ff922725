use std::fs;
use std::path::{Path, PathBuf};

use moveminds_dto::Role;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::Session;
use crate::config::Config;
use crate::error::{MoveMindsError, Result};

/// On-disk shape of `session.json`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    token: String,
    user_id: i64,
    username: String,
    role: Role,
}

/// Persists the signed-in session as JSON.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store next to the config file.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(Config::dir()?.join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<StoredSession>(&content) {
            Ok(stored) => Ok(Some(Session::new(
                stored.token,
                stored.user_id,
                stored.username,
                stored.role,
            ))),
            Err(e) => {
                // A corrupt file is treated as signed out rather than fatal.
                tracing::warn!("Ignoring unreadable session file {}: {e}", self.path.display());
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredSession {
            token: session.token.expose_secret().to_string(),
            user_id: session.user_id,
            username: session.username.clone(),
            role: session.role,
        };
        let content = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, content).map_err(|e| {
            MoveMindsError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write session at {}: {}", self.path.display(), e),
            ))
        })?;

        // Set restrictive permissions on Unix (owner read/write only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));
        let session = Session::new("abc.def", 9, "ruwan", Role::Instructor);

        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));
    }

    #[test]
    fn test_missing_and_corrupt_files_are_signed_out() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(store.load().unwrap().is_none());

        fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.clear().unwrap();
        store
            .save(&Session::new("t", 1, "u", Role::User))
            .unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
    }
}
