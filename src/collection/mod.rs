//! Remote-backed, filterable, paginated collections.
//!
//! [`RemoteCollection`] is the single list controller behind every
//! dashboard: it owns the filter state, issues fetches through a
//! [`CollectionSource`], guards against out-of-order responses with a
//! monotonic epoch and applies optimistic local patches after mutations.
//!
//! When the backend cannot evaluate every active filter, the collection
//! falls back to fetching one oversized unfiltered page and filtering and
//! paginating it locally. Pagination metadata is then computed from that
//! snapshot and is only approximate once the backend holds more than
//! [`OVERSIZED_PAGE_SIZE`] items.

mod delete;
mod matching;
mod mutator;

use std::future::Future;
use std::sync::Arc;

use moveminds_dto::Page;
use parking_lot::Mutex;

use crate::error::{MoveMindsError, Result};
use crate::notices::Notices;

pub use delete::{DeleteDialog, DeleteTarget};
pub use matching::{same_text, search_matches};
pub use mutator::FailurePolicy;

/// Page size used for the client-side filtering fallback.
pub const OVERSIZED_PAGE_SIZE: usize = 1000;

/// Anything a collection can hold.
pub trait ListItem: Clone + Send + Sync + 'static {
    /// Server-assigned identifier.
    fn id(&self) -> i64;
}

/// A set of filter values for one item type.
///
/// `Default` must mean "no filter"; an unset dimension never excludes an
/// item.
pub trait FilterSet<T>: Clone + Default + PartialEq + Send + Sync + 'static {
    /// Client-side predicate, used when the backend cannot filter.
    fn matches(&self, item: &T, search: &str) -> bool;

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Filters with nothing to filter on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFilter;

impl<T> FilterSet<T> for NoFilter {
    fn matches(&self, _item: &T, _search: &str) -> bool {
        true
    }
}

/// Everything that decides which page is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState<F> {
    /// Free-text search; empty means no search.
    pub search_term: String,
    pub filters: F,
    /// Zero-based page index.
    pub current_page: usize,
    pub page_size: usize,
}

impl<F: Default> FilterState<F> {
    pub fn new(page_size: usize) -> Self {
        Self {
            search_term: String::new(),
            filters: F::default(),
            current_page: 0,
            page_size: page_size.max(1),
        }
    }
}

/// Whether pagination metadata came from the backend or was computed locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    Server,
    ClientFallback,
}

/// The page currently on display.
///
/// Items are reference counted; a mutation swaps in a fresh `Arc` rather
/// than editing the shared value, so identity comparison tells a renderer
/// exactly which rows changed.
#[derive(Debug, Clone)]
pub struct PageResult<T> {
    pub content: Vec<Arc<T>>,
    pub total_pages: u32,
    pub total_elements: u64,
    pub source: PageSource,
}

impl<T> PageResult<T> {
    fn from_server(page: Page<T>) -> Self {
        Self {
            content: page.content.into_iter().map(Arc::new).collect(),
            total_pages: page.total_pages,
            total_elements: page.total_elements,
            source: PageSource::Server,
        }
    }
}

/// Slice an already filtered list into one page.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> PageResult<T> {
    let size = page_size.max(1);
    let total = items.len();
    let start = page.saturating_mul(size).min(total);
    let end = start.saturating_add(size).min(total);
    let content = items
        .into_iter()
        .skip(start)
        .take(end - start)
        .map(Arc::new)
        .collect();
    PageResult {
        content,
        total_pages: total.div_ceil(size) as u32,
        total_elements: total as u64,
        source: PageSource::ClientFallback,
    }
}

/// Where a collection gets its pages from.
pub trait CollectionSource: Send + Sync + 'static {
    type Item: ListItem;
    type Filter: FilterSet<Self::Item>;

    fn fetch(
        &self,
        request: &FilterState<Self::Filter>,
    ) -> impl Future<Output = Result<Page<Self::Item>>> + Send;

    /// Whether the backend has a query parameter for every active filter.
    fn supports(&self, _filters: &Self::Filter) -> bool {
        true
    }

    /// Reorder fetched items before they are shown. Backend order by default.
    fn arrange(&self, _items: &mut [Self::Item]) {}
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was issued while this one was in flight; its result
    /// was discarded.
    Stale,
}

#[derive(Debug)]
pub(crate) struct CollectionState<T, F> {
    pub(crate) filters: FilterState<F>,
    pub(crate) page: Option<PageResult<T>>,
    pub(crate) loading: bool,
    pub(crate) error: Option<String>,
    /// Epoch of the most recently issued fetch.
    pub(crate) epoch: u64,
}

pub struct RemoteCollection<S: CollectionSource> {
    source: Arc<S>,
    state: Arc<Mutex<CollectionState<S::Item, S::Filter>>>,
    notices: Notices,
    failure_policy: FailurePolicy,
}

impl<S: CollectionSource> Clone for RemoteCollection<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
            notices: self.notices.clone(),
            failure_policy: self.failure_policy,
        }
    }
}

impl<S: CollectionSource> RemoteCollection<S> {
    pub fn new(source: S, page_size: usize) -> Self {
        Self::with_notices(source, page_size, Notices::new())
    }

    pub fn with_notices(source: S, page_size: usize, notices: Notices) -> Self {
        Self {
            source: Arc::new(source),
            state: Arc::new(Mutex::new(CollectionState {
                filters: FilterState::new(page_size),
                page: None,
                loading: false,
                error: None,
                epoch: 0,
            })),
            notices,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn filters(&self) -> FilterState<S::Filter> {
        self.state.lock().filters.clone()
    }

    pub fn page(&self) -> Option<PageResult<S::Item>> {
        self.state.lock().page.clone()
    }

    /// Items of the current page, empty before the first successful fetch.
    pub fn items(&self) -> Vec<Arc<S::Item>> {
        self.state
            .lock()
            .page
            .as_ref()
            .map(|p| p.content.clone())
            .unwrap_or_default()
    }

    pub fn item(&self, id: i64) -> Option<Arc<S::Item>> {
        self.state
            .lock()
            .page
            .as_ref()
            .and_then(|p| p.content.iter().find(|item| item.id() == id).cloned())
    }

    /// Find an item on the current page, falling back to an unfiltered
    /// oversized fetch. The displayed page is left alone.
    pub async fn locate(&self, id: i64) -> Result<Option<Arc<S::Item>>> {
        if let Some(item) = self.item(id) {
            return Ok(Some(item));
        }
        let snapshot = self
            .source
            .fetch(&FilterState::new(OVERSIZED_PAGE_SIZE))
            .await?;
        Ok(snapshot
            .content
            .into_iter()
            .find(|item| item.id() == id)
            .map(Arc::new))
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// Change the search term. Returns whether anything changed; any change
    /// sends the view back to the first page.
    pub fn set_search(&self, term: impl Into<String>) -> bool {
        let term = term.into();
        let mut state = self.state.lock();
        if state.filters.search_term == term {
            return false;
        }
        state.filters.search_term = term;
        state.filters.current_page = 0;
        true
    }

    pub fn set_filters(&self, filters: S::Filter) -> bool {
        let mut state = self.state.lock();
        if state.filters.filters == filters {
            return false;
        }
        state.filters.filters = filters;
        state.filters.current_page = 0;
        true
    }

    /// Edit the filters in place; the page resets only if a value changed.
    pub fn update_filters(&self, edit: impl FnOnce(&mut S::Filter)) -> bool {
        let mut state = self.state.lock();
        let mut next = state.filters.filters.clone();
        edit(&mut next);
        if next == state.filters.filters {
            return false;
        }
        state.filters.filters = next;
        state.filters.current_page = 0;
        true
    }

    pub fn clear_filters(&self) -> bool {
        let mut state = self.state.lock();
        let cleared = state.filters.filters.is_empty() && state.filters.search_term.is_empty();
        if cleared {
            return false;
        }
        state.filters.filters = S::Filter::default();
        state.filters.search_term.clear();
        state.filters.current_page = 0;
        true
    }

    pub fn set_page(&self, page: usize) {
        self.state.lock().filters.current_page = page;
    }

    /// Fetch the page described by the current filter state.
    ///
    /// Only the most recently issued fetch may update the collection; a
    /// response that arrives after a newer request was dispatched is
    /// dropped and reported as [`FetchOutcome::Stale`].
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        let (epoch, request) = {
            let mut state = self.state.lock();
            state.epoch += 1;
            state.loading = true;
            (state.epoch, state.filters.clone())
        };

        let result = self.load(&request).await;

        let mut state = self.state.lock();
        if state.epoch != epoch {
            tracing::debug!(
                epoch,
                latest = state.epoch,
                "discarding response for superseded request"
            );
            return Ok(FetchOutcome::Stale);
        }
        state.loading = false;
        match result {
            Ok(page) => {
                state.page = Some(page);
                state.error = None;
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                let message = e.user_message();
                tracing::warn!("Failed to load list: {e}");
                state.page = None;
                state.error = Some(message.clone());
                drop(state);
                self.notices.error(message);
                Err(e)
            }
        }
    }

    async fn load(&self, request: &FilterState<S::Filter>) -> Result<PageResult<S::Item>> {
        if self.source.supports(&request.filters) {
            let mut page = self.source.fetch(request).await?;
            if page.content.len() > request.page_size {
                return Err(MoveMindsError::Decode(
                    moveminds_dto::DtoError::InconsistentPage(format!(
                        "{} items returned for page size {}",
                        page.content.len(),
                        request.page_size
                    )),
                ));
            }
            self.source.arrange(&mut page.content);
            return Ok(PageResult::from_server(page));
        }

        let oversized = FilterState {
            search_term: String::new(),
            filters: S::Filter::default(),
            current_page: 0,
            page_size: OVERSIZED_PAGE_SIZE,
        };
        let snapshot = self.source.fetch(&oversized).await?;
        if snapshot.total_elements > OVERSIZED_PAGE_SIZE as u64 {
            tracing::warn!(
                total = snapshot.total_elements,
                "client-side filtering sees only the first {OVERSIZED_PAGE_SIZE} items; \
                 page counts are approximate"
            );
        }
        let mut matching: Vec<S::Item> = snapshot
            .content
            .into_iter()
            .filter(|item| request.filters.matches(item, &request.search_term))
            .collect();
        self.source.arrange(&mut matching);
        Ok(paginate(matching, request.current_page, request.page_size))
    }
}
