//! Signed-in session state.
//!
//! The bearer token and the signed-in user's role live in a single
//! [`SessionContext`] that is handed to everything that needs them. Every
//! change (sign in, sign out, forced expiry after a 401, or a change made by
//! another process) is published to all subscribers.

mod store;
mod watcher;

use std::fmt;
use std::sync::Arc;

use moveminds_dto::{AuthResponse, Role};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;

use crate::error::Result;

pub use store::SessionStore;
pub use watcher::SessionWatcher;

/// Where the user is sent after the backend rejects their token.
pub const LOGIN_ROUTE: &str = "/login";

/// Credentials of the signed-in user.
pub struct Session {
    pub token: SecretString,
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn new(
        token: impl Into<String>,
        user_id: i64,
        username: impl Into<String>,
        role: Role,
    ) -> Self {
        let token: String = token.into();
        Self {
            token: SecretString::from(token),
            user_id,
            username: username.into(),
            role,
        }
    }
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Session::new(auth.token, auth.user_id, auth.username, auth.role)
    }
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Session::new(
            self.token.expose_secret(),
            self.user_id,
            self.username.clone(),
            self.role,
        )
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id
            && self.username == other.username
            && self.role == other.role
            && self.token.expose_secret() == other.token.expose_secret()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    SignedOut,
    SignedIn(Session),
    /// The backend rejected the stored token; credentials are gone and the
    /// user has to sign in again at `redirect_to`.
    Expired { redirect_to: String },
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::SignedIn(session) => Some(session),
            _ => None,
        }
    }
}

/// Observable handle to the current session. Cheap to clone.
#[derive(Clone)]
pub struct SessionContext {
    sender: Arc<watch::Sender<SessionState>>,
    store: Option<Arc<SessionStore>>,
}

impl SessionContext {
    /// Context backed by a session file; starts from whatever is on disk.
    pub fn with_store(store: SessionStore) -> Result<Self> {
        let initial = match store.load()? {
            Some(session) => SessionState::SignedIn(session),
            None => SessionState::SignedOut,
        };
        let (sender, _) = watch::channel(initial);
        Ok(Self {
            sender: Arc::new(sender),
            store: Some(Arc::new(store)),
        })
    }

    /// Context that is never persisted.
    pub fn in_memory(initial: SessionState) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
            store: None,
        }
    }

    pub fn current(&self) -> SessionState {
        self.sender.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.sender.borrow().session().cloned()
    }

    pub fn token(&self) -> Option<SecretString> {
        self.sender
            .borrow()
            .session()
            .map(|s| SecretString::from(s.token.expose_secret().to_string()))
    }

    pub fn role(&self) -> Option<Role> {
        self.sender.borrow().session().map(|s| s.role)
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.sender.subscribe()
    }

    pub fn store(&self) -> Option<&SessionStore> {
        self.store.as_deref()
    }

    pub fn sign_in(&self, session: Session) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(&session)?;
        }
        tracing::debug!(username = %session.username, role = %session.role, "signed in");
        self.publish(SessionState::SignedIn(session));
        Ok(())
    }

    pub fn sign_out(&self) -> Result<()> {
        if let Some(store) = &self.store {
            store.clear()?;
        }
        self.publish(SessionState::SignedOut);
        Ok(())
    }

    /// Drop the credentials after the backend rejected them.
    ///
    /// Called from the HTTP layer, which has no way to surface a storage
    /// error, so a failed delete is logged instead of returned.
    pub fn expire(&self, redirect_to: &str) {
        if let Some(store) = &self.store
            && let Err(e) = store.clear()
        {
            tracing::warn!("Failed to clear stored session: {e}");
        }
        tracing::info!("session expired, redirecting to {redirect_to}");
        self.publish(SessionState::Expired {
            redirect_to: redirect_to.to_string(),
        });
    }

    /// Re-read the session file and publish it if it differs from memory.
    ///
    /// Returns true when subscribers were notified.
    pub fn reload(&self) -> Result<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        let on_disk = store.load()?;
        let changed = self.sender.send_if_modified(|state| {
            let same = match (&*state, &on_disk) {
                (SessionState::SignedIn(current), Some(disk)) => current == disk,
                (SessionState::SignedIn(_), None) => false,
                (_, Some(_)) => false,
                (_, None) => true,
            };
            if same {
                return false;
            }
            *state = match &on_disk {
                Some(session) => SessionState::SignedIn(session.clone()),
                None => SessionState::SignedOut,
            };
            true
        });
        Ok(changed)
    }

    fn publish(&self, state: SessionState) {
        self.sender.send_replace(state);
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("state", &*self.sender.borrow())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn admin() -> Session {
        Session::new("tok-admin", 1, "amaya", Role::Admin)
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let debug = format!("{:?}", admin());
        assert!(!debug.contains("tok-admin"));
        assert!(debug.contains("amaya"));
    }

    #[test]
    fn test_in_memory_sign_in_notifies_subscribers() {
        let ctx = SessionContext::in_memory(SessionState::SignedOut);
        let mut rx = ctx.subscribe();
        assert!(!rx.has_changed().unwrap());

        ctx.sign_in(admin()).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().session().unwrap().username, "amaya");
        assert_eq!(ctx.role(), Some(Role::Admin));
    }

    #[test]
    fn test_expire_clears_store_and_publishes_redirect() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&admin()).unwrap();

        let ctx = SessionContext::with_store(store).unwrap();
        assert!(ctx.session().is_some());
        let mut rx = ctx.subscribe();

        ctx.expire(LOGIN_ROUTE);

        assert!(rx.has_changed().unwrap());
        assert_eq!(
            *rx.borrow_and_update(),
            SessionState::Expired {
                redirect_to: "/login".to_string()
            }
        );
        assert!(ctx.token().is_none());
        assert!(ctx.store().unwrap().load().unwrap().is_none());
    }

    #[test]
    fn test_reload_picks_up_other_process_sign_in() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let ctx = SessionContext::with_store(SessionStore::new(&path)).unwrap();
        assert_eq!(ctx.current(), SessionState::SignedOut);

        // Another process writes the file.
        SessionStore::new(&path).save(&admin()).unwrap();

        assert!(ctx.reload().unwrap());
        assert_eq!(ctx.session(), Some(admin()));
        // Nothing changed the second time.
        assert!(!ctx.reload().unwrap());
    }

    #[test]
    fn test_reload_picks_up_other_process_sign_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        SessionStore::new(&path).save(&admin()).unwrap();
        let ctx = SessionContext::with_store(SessionStore::new(&path)).unwrap();

        SessionStore::new(&path).clear().unwrap();

        assert!(ctx.reload().unwrap());
        assert_eq!(ctx.current(), SessionState::SignedOut);
    }
}
