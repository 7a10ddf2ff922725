//! Optimistic local updates after a mutation.

use std::future::Future;
use std::sync::Arc;

use super::{CollectionSource, ListItem, RemoteCollection};
use crate::error::Result;

/// What to do with a local patch when the remote call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Leave the patched item on display until the next refresh.
    #[default]
    KeepPatch,
    /// Put the pre-patch item back.
    Revert,
}

impl<S: CollectionSource> RemoteCollection<S> {
    /// Patch the item with `id` locally, then run the remote call.
    ///
    /// The patched item is a fresh `Arc`; the original value is never
    /// touched. Returns the remote result. An item that is not on the
    /// current page is not patched, but the remote call still runs.
    pub async fn apply_and_commit<R, Fut>(
        &self,
        id: i64,
        remote: impl FnOnce() -> Fut,
        patch: impl FnOnce(&S::Item) -> S::Item,
    ) -> Result<R>
    where
        Fut: Future<Output = Result<R>>,
    {
        let swapped = self.replace(id, patch);

        match remote().await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(id, "Mutation failed: {e}");
                self.notices.error(e.user_message());
                if self.failure_policy == FailurePolicy::Revert
                    && let Some((original, patched)) = swapped
                {
                    self.restore(original, &patched);
                }
                Err(e)
            }
        }
    }

    /// Patch an item without a remote call, e.g. to reflect a response.
    pub fn patch_local(&self, id: i64, patch: impl FnOnce(&S::Item) -> S::Item) -> bool {
        self.replace(id, patch).is_some()
    }

    /// Drop an item from the current page and shrink the totals.
    pub fn remove_local(&self, id: i64) -> bool {
        let mut state = self.state.lock();
        let page_size = state.filters.page_size.max(1) as u64;
        let Some(page) = state.page.as_mut() else {
            return false;
        };
        let before = page.content.len();
        page.content.retain(|item| item.id() != id);
        let removed = page.content.len() < before;
        if removed {
            page.total_elements = page.total_elements.saturating_sub(1);
            page.total_pages = page.total_elements.div_ceil(page_size) as u32;
        }
        removed
    }

    /// Swap in the patched item; returns the original and patched `Arc`s.
    fn replace(
        &self,
        id: i64,
        patch: impl FnOnce(&S::Item) -> S::Item,
    ) -> Option<(Arc<S::Item>, Arc<S::Item>)> {
        let mut state = self.state.lock();
        let slot = state
            .page
            .as_mut()?
            .content
            .iter_mut()
            .find(|item| item.id() == id)?;
        let patched = Arc::new(patch(slot.as_ref()));
        let original = std::mem::replace(slot, Arc::clone(&patched));
        Some((original, patched))
    }

    /// Restore `original` only if nothing replaced the patched item since.
    fn restore(&self, original: Arc<S::Item>, patched: &Arc<S::Item>) {
        let mut state = self.state.lock();
        if let Some(slot) = state
            .page
            .as_mut()
            .and_then(|page| page.content.iter_mut().find(|item| Arc::ptr_eq(item, patched)))
        {
            *slot = original;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::error::MoveMindsError;

    async fn loaded(policy: FailurePolicy) -> RemoteCollection<StaticSource> {
        let collection = RemoteCollection::new(
            StaticSource::new(vec![member(1, "Amaya", false), member(2, "Bimal", false)]),
            10,
        )
        .with_failure_policy(policy);
        collection.refresh().await.unwrap();
        collection
    }

    #[tokio::test]
    async fn test_patch_creates_new_value() {
        let collection = loaded(FailurePolicy::KeepPatch).await;
        let before = collection.item(1).unwrap();

        collection
            .apply_and_commit(
                1,
                || async { Ok(()) },
                |m| Member {
                    verified: true,
                    ..m.clone()
                },
            )
            .await
            .unwrap();

        let after = collection.item(1).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(!before.verified);
        assert!(after.verified);
        // Untouched items keep their identity.
        assert_eq!(collection.items().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_keeps_patch_by_default() {
        let collection = loaded(FailurePolicy::KeepPatch).await;

        let result: Result<()> = collection
            .apply_and_commit(
                1,
                || async { Err(MoveMindsError::Network("offline".to_string())) },
                |m| Member {
                    verified: true,
                    ..m.clone()
                },
            )
            .await;

        assert!(result.is_err());
        assert!(collection.item(1).unwrap().verified);
        assert_eq!(
            collection.notices().latest().unwrap().level,
            crate::notices::NoticeLevel::Error
        );
    }

    #[tokio::test]
    async fn test_failure_reverts_when_configured() {
        let collection = loaded(FailurePolicy::Revert).await;
        let before = collection.item(1).unwrap();

        let _ = collection
            .apply_and_commit::<(), _>(
                1,
                || async { Err(MoveMindsError::Network("offline".to_string())) },
                |m| Member {
                    verified: true,
                    ..m.clone()
                },
            )
            .await;

        let after = collection.item(1).unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert!(!after.verified);
    }

    #[tokio::test]
    async fn test_missing_item_still_calls_remote() {
        let collection = loaded(FailurePolicy::KeepPatch).await;
        let value = collection
            .apply_and_commit(99, || async { Ok(7) }, |m| m.clone())
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_remove_local_updates_totals() {
        let collection = loaded(FailurePolicy::KeepPatch).await;
        assert!(collection.remove_local(2));
        assert!(!collection.remove_local(2));

        let page = collection.page().unwrap();
        assert_eq!(page.total_elements, 1);
        assert!(collection.item(2).is_none());
    }

    #[tokio::test]
    async fn test_removing_last_item_of_last_page_drops_a_page() {
        let collection = RemoteCollection::new(
            StaticSource::new(vec![
                member(1, "Amaya", false),
                member(2, "Bimal", false),
                member(3, "Chathu", false),
            ]),
            2,
        );
        collection.set_page(1);
        collection.refresh().await.unwrap();
        assert_eq!(collection.page().unwrap().total_pages, 2);

        assert!(collection.remove_local(3));

        let page = collection.page().unwrap();
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.total_pages, 1);
        assert!(page.content.is_empty());
    }
}
