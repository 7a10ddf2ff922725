//! Properties of the remote collection that hold for any data set.

use moveminds::collection::{
    CollectionSource, FilterSet, FilterState, ListItem, PageSource, RemoteCollection, paginate,
};
use moveminds_dto::Page;
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Row {
    id: i64,
    tag: u8,
}

impl ListItem for Row {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct TagFilter {
    tag: Option<u8>,
}

impl FilterSet<Row> for TagFilter {
    fn matches(&self, row: &Row, _search: &str) -> bool {
        self.tag.is_none_or(|tag| row.tag == tag)
    }
}

/// Serves everything it holds in one oversized page; never filters.
struct MemorySource {
    rows: Vec<Row>,
}

impl CollectionSource for MemorySource {
    type Item = Row;
    type Filter = TagFilter;

    async fn fetch(&self, request: &FilterState<TagFilter>) -> moveminds::Result<Page<Row>> {
        let size = request.page_size.max(1);
        let content: Vec<Row> = self
            .rows
            .iter()
            .skip(request.current_page * size)
            .take(size)
            .cloned()
            .collect();
        Ok(Page {
            content,
            total_pages: self.rows.len().div_ceil(size) as u32,
            total_elements: self.rows.len() as u64,
            number: Some(request.current_page as u32),
            size: Some(size as u32),
        })
    }

    fn supports(&self, filters: &TagFilter) -> bool {
        filters.tag.is_none()
    }
}

fn rows(tags: &[u8]) -> Vec<Row> {
    tags.iter()
        .enumerate()
        .map(|(i, tag)| Row {
            id: i as i64 + 1,
            tag: *tag,
        })
        .collect()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    /// Walking every page yields exactly the filtered list, in order, with
    /// no page larger than the page size.
    #[test]
    fn prop_pages_partition_the_list(len in 0usize..80, size in 1usize..15) {
        let items: Vec<usize> = (0..len).collect();
        let first = paginate(items.clone(), 0, size);
        prop_assert_eq!(first.total_elements, len as u64);
        prop_assert_eq!(first.total_pages as usize, len.div_ceil(size));

        let mut seen = Vec::new();
        for page in 0..first.total_pages as usize {
            let result = paginate(items.clone(), page, size);
            prop_assert!(result.content.len() <= size);
            prop_assert!(!result.content.is_empty());
            seen.extend(result.content.iter().map(|item| **item));
        }
        prop_assert_eq!(seen, items);
    }

    /// A page index past the end is empty but keeps the totals.
    #[test]
    fn prop_page_past_end_is_empty(len in 0usize..40, size in 1usize..10, extra in 0usize..5) {
        let items: Vec<usize> = (0..len).collect();
        let result = paginate(items, len.div_ceil(size) + extra, size);
        prop_assert!(result.content.is_empty());
        prop_assert_eq!(result.total_elements, len as u64);
    }

    /// Any change to a filter value sends the view back to page 0.
    #[test]
    fn prop_filter_change_resets_page(
        page in 1usize..20,
        old in proptest::option::of(0u8..4),
        new in proptest::option::of(0u8..4),
    ) {
        let collection = RemoteCollection::new(MemorySource { rows: Vec::new() }, 5);
        collection.set_filters(TagFilter { tag: old });
        collection.set_page(page);
        let changed = collection.set_filters(TagFilter { tag: new });
        let expected = if old == new { page } else { 0 };
        prop_assert_eq!(changed, old != new);
        prop_assert_eq!(collection.filters().current_page, expected);
    }

    /// The client fallback shows the same rows a filtering backend would.
    #[test]
    fn prop_fallback_matches_local_filter(
        tags in proptest::collection::vec(0u8..3, 0..60),
        tag in 0u8..3,
        page in 0usize..6,
    ) {
        let data = rows(&tags);
        let expected: Vec<Row> = data.iter().filter(|r| r.tag == tag).cloned().collect();
        let collection = RemoteCollection::new(MemorySource { rows: data }, 4);
        collection.set_filters(TagFilter { tag: Some(tag) });
        collection.set_page(page);
        runtime().block_on(collection.refresh()).unwrap();

        let shown = collection.page().unwrap();
        prop_assert_eq!(shown.source, PageSource::ClientFallback);
        prop_assert_eq!(shown.total_elements, expected.len() as u64);
        prop_assert_eq!(shown.total_pages as usize, expected.len().div_ceil(4));
        let window: Vec<Row> = expected.iter().skip(page * 4).take(4).cloned().collect();
        let got: Vec<Row> = shown.content.iter().map(|r| (**r).clone()).collect();
        prop_assert_eq!(got, window);
    }
}

#[tokio::test]
async fn test_server_mode_uses_backend_metadata() {
    let collection = RemoteCollection::new(
        MemorySource {
            rows: rows(&[0; 23]),
        },
        10,
    );
    collection.set_page(2);
    collection.refresh().await.unwrap();
    let page = collection.page().unwrap();
    assert_eq!(page.source, PageSource::Server);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_elements, 23);
    assert_eq!(page.content.len(), 3);
}
