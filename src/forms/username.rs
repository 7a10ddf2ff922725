//! Debounced username availability check.
//!
//! Every keystroke restarts a quiet-period timer. Only a timer that runs to
//! completion sends a request, and requests already sent are never
//! cancelled: whichever response arrives last sets the state, even if it
//! answers for an older input.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::error::Result;

/// Names shorter than this are never checked.
pub const MIN_CHECK_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsernameState {
    #[default]
    Idle,
    Checking,
    Available,
    Taken,
}

impl UsernameState {
    pub fn blocks_submission(&self) -> bool {
        matches!(self, UsernameState::Checking | UsernameState::Taken)
    }
}

/// Answers whether a username is still free.
pub trait AvailabilityChecker: Send + Sync + 'static {
    fn is_available(&self, username: &str) -> impl Future<Output = Result<bool>> + Send;
}

impl AvailabilityChecker for ApiClient {
    async fn is_available(&self, username: &str) -> Result<bool> {
        self.check_username(username).await
    }
}

pub struct UsernameCheck<C: AvailabilityChecker> {
    checker: Arc<C>,
    debounce: Duration,
    state: Arc<watch::Sender<UsernameState>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<C: AvailabilityChecker> UsernameCheck<C> {
    pub fn new(checker: C, debounce: Duration) -> Self {
        Self::with_shared(Arc::new(checker), debounce)
    }

    pub fn with_shared(checker: Arc<C>, debounce: Duration) -> Self {
        let (sender, _) = watch::channel(UsernameState::Idle);
        Self {
            checker,
            debounce,
            state: Arc::new(sender),
            timer: Mutex::new(None),
        }
    }

    pub fn state(&self) -> UsernameState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<UsernameState> {
        self.state.subscribe()
    }

    pub fn blocks_submission(&self) -> bool {
        self.state().blocks_submission()
    }

    /// Feed the current contents of the username field.
    ///
    /// Must be called from within a tokio runtime.
    pub fn input(&self, username: &str) {
        let mut timer = self.timer.lock();
        if let Some(pending) = timer.take() {
            // Harmless once the timer has fired: the request runs in its own task.
            pending.abort();
        }

        let username = username.trim().to_string();
        if username.chars().count() < MIN_CHECK_LENGTH {
            self.state.send_replace(UsernameState::Idle);
            return;
        }

        self.state.send_replace(UsernameState::Checking);
        let checker = Arc::clone(&self.checker);
        let state = Arc::clone(&self.state);
        let debounce = self.debounce;
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            tokio::spawn(async move {
                let next = match checker.is_available(&username).await {
                    Ok(true) => UsernameState::Available,
                    Ok(false) => UsernameState::Taken,
                    Err(e) => {
                        tracing::warn!(%username, "Username availability check failed: {e}");
                        UsernameState::Idle
                    }
                };
                tracing::debug!(%username, ?next, "username check resolved");
                state.send_replace(next);
            });
        }));
    }
}

impl<C: AvailabilityChecker> Drop for UsernameCheck<C> {
    fn drop(&mut self) {
        if let Some(pending) = self.timer.lock().take() {
            pending.abort();
        }
    }
}
