//! Cross-process session synchronisation.
//!
//! Watches the directory holding `session.json` and reloads the
//! [`SessionContext`] whenever another process signs in or out, so every
//! open client observes the same session.

use std::ffi::OsString;
use std::time::Duration;

use notify::{EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::SessionContext;
use crate::error::{MoveMindsError, Result};

/// Quiet period after the last file event before the session is re-read.
/// Editors and `fs::write` produce several events per save.
const DEBOUNCE_DURATION: Duration = Duration::from_millis(100);

const CHANNEL_CAPACITY: usize = 64;

/// Keeps the OS watch alive; dropping it stops synchronisation.
pub struct SessionWatcher {
    _watcher: notify::RecommendedWatcher,
    task: JoinHandle<()>,
}

impl SessionWatcher {
    /// Start watching the session file behind `context`.
    pub fn start(context: SessionContext) -> Result<Self> {
        let store = context.store().cloned().ok_or_else(|| {
            MoveMindsError::Config("session is not backed by a file".to_string())
        })?;
        let path = store.path().to_path_buf();
        let dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| MoveMindsError::Config("session path has no parent".to_string()))?;
        std::fs::create_dir_all(&dir)?;
        let file_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();

        let (tx, rx) = mpsc::channel::<notify::Event>(CHANNEL_CAPACITY);
        let mut watcher = notify::RecommendedWatcher::new(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    // A full channel already guarantees a pending reload.
                    let _ = tx.try_send(event);
                }
                Err(e) => tracing::warn!("session watcher error: {e}"),
            },
            notify::Config::default(),
        )
        .map_err(|e| MoveMindsError::Other(format!("failed to create session watcher: {e}")))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| MoveMindsError::Other(format!("failed to watch {}: {e}", dir.display())))?;

        let task = tokio::spawn(run_event_loop(rx, context, file_name));

        Ok(Self {
            _watcher: watcher,
            task,
        })
    }
}

impl Drop for SessionWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_event_loop(
    mut rx: mpsc::Receiver<notify::Event>,
    context: SessionContext,
    file_name: OsString,
) {
    while let Some(event) = rx.recv().await {
        let mut relevant = is_session_event(&event, &file_name);

        // Drain the burst that follows a single save.
        loop {
            match tokio::time::timeout(DEBOUNCE_DURATION, rx.recv()).await {
                Ok(Some(more)) => relevant |= is_session_event(&more, &file_name),
                Ok(None) => return,
                Err(_) => break,
            }
        }

        if !relevant {
            continue;
        }
        match context.reload() {
            Ok(true) => tracing::debug!("session changed by another process"),
            Ok(false) => {}
            Err(e) => tracing::warn!("Failed to reload session: {e}"),
        }
    }
}

fn is_session_event(event: &notify::Event, file_name: &OsString) -> bool {
    let kind_matters = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    kind_matters
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}
