//! Two-phase delete: open a confirmation, then confirm by name.

use std::future::Future;

use super::{CollectionSource, RemoteCollection};
use crate::error::{MoveMindsError, Result};

/// The item awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub id: i64,
    /// Shown to the user and typed back to confirm.
    pub display_name: String,
    /// "user", "program", "activity", ...
    pub kind: &'static str,
}

#[derive(Debug, Default)]
pub struct DeleteDialog {
    target: Option<DeleteTarget>,
    error: Option<String>,
}

impl DeleteDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, id: i64, display_name: impl Into<String>, kind: &'static str) {
        self.target = Some(DeleteTarget {
            id,
            display_name: display_name.into(),
            kind,
        });
        self.error = None;
    }

    pub fn cancel(&mut self) {
        self.target = None;
        self.error = None;
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&DeleteTarget> {
        self.target.as_ref()
    }

    /// Error from the last failed attempt, shown inside the dialog.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn prompt(&self) -> Option<String> {
        self.target.as_ref().map(|t| {
            format!(
                "Delete {} '{}'? This cannot be undone.",
                t.kind, t.display_name
            )
        })
    }

    /// Run the remote delete if the dialog is open and `confirmed_name`
    /// matches the displayed name.
    ///
    /// On success the item leaves the collection and the dialog closes. On
    /// failure the dialog stays open with the error and the item stays.
    pub async fn confirm<S, Fut>(
        &mut self,
        collection: &RemoteCollection<S>,
        confirmed_name: &str,
        remote: impl FnOnce(i64) -> Fut,
    ) -> Result<()>
    where
        S: CollectionSource,
        Fut: Future<Output = Result<()>>,
    {
        let Some(target) = self.target.clone() else {
            return Err(MoveMindsError::NotConfirmed(
                "no deletion is pending".to_string(),
            ));
        };
        if confirmed_name != target.display_name {
            return Err(MoveMindsError::NotConfirmed(format!(
                "type '{}' to delete this {}",
                target.display_name, target.kind
            )));
        }

        match remote(target.id).await {
            Ok(()) => {
                collection.remove_local(target.id);
                collection
                    .notices()
                    .success(format!("Deleted {} '{}'", target.kind, target.display_name));
                self.cancel();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(id = target.id, kind = target.kind, "Delete failed: {e}");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}
