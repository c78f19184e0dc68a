//! Cursor objects for the two levels of pagination.
//!
//! The source database predates automatic result paging, so both levels are
//! driven manually: partitions advance through `token(key) > token(last)`
//! queries, columns through `column1 > last` continuation queries. Each
//! cursor owns its own "last seen" state; callers only ever ask for the
//! next item.

use crate::record::{ColumnCell, PartitionKey};
use crate::store::{PartitionStore, StoreError};

enum WalkState {
    Start(PartitionKey),
    After(PartitionKey),
    Done,
}

/// Walks partition keys in token order, starting from a given first key.
pub struct PartitionWalk<'a, S: PartitionStore> {
    store: &'a S,
    state: WalkState,
}

impl<'a, S: PartitionStore> PartitionWalk<'a, S> {
    /// Begin at `first`, which the first `next_key` call yields as-is.
    pub fn new(store: &'a S, first: PartitionKey) -> Self {
        Self {
            store,
            state: WalkState::Start(first),
        }
    }

    /// The next partition key in token order, or `None` once exhausted.
    pub fn next_key(&mut self) -> Result<Option<PartitionKey>, StoreError> {
        let next = match std::mem::replace(&mut self.state, WalkState::Done) {
            WalkState::Start(first) => Some(first),
            WalkState::After(last) => self.store.key_after(&last)?,
            WalkState::Done => None,
        };
        if let Some(key) = &next {
            self.state = WalkState::After(key.clone());
        }
        Ok(next)
    }
}

/// Pages one partition's columns in column1 order.
///
/// A page shorter than `page_size` marks the partition exhausted; a full
/// page forces one more fetch, so a partition holding an exact multiple of
/// `page_size` columns issues one trailing query that comes back empty.
pub struct ColumnPager<'a, S: PartitionStore> {
    store: &'a S,
    key: &'a PartitionKey,
    page_size: usize,
    after: Option<Vec<u8>>,
    done: bool,
}

impl<'a, S: PartitionStore> ColumnPager<'a, S> {
    pub fn new(store: &'a S, key: &'a PartitionKey, page_size: usize) -> Self {
        Self {
            store,
            key,
            page_size,
            after: None,
            done: false,
        }
    }

    /// Fetch the next page of cells, or `None` once the partition is done.
    pub fn next_page(&mut self) -> Result<Option<Vec<ColumnCell>>, StoreError> {
        if self.done {
            return Ok(None);
        }
        let page = self
            .store
            .column_page(self.key, self.after.as_deref(), self.page_size)?;
        if page.cells.len() < self.page_size {
            self.done = true;
        }
        if page.cells.is_empty() {
            return Ok(None);
        }
        // Backends report the raw column1 bytes of the last row; fall back
        // to the decoded name if one does not.
        let fallback = page.cells.last().map(|c| c.name.as_bytes().to_vec());
        self.after = page.cursor.or(fallback);
        Ok(Some(page.cells))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::memory::MemoryStore;
    use crate::record::ColumnPage;

    /// Counts page fetches so tests can assert on query traffic.
    struct CountingStore {
        inner: MemoryStore,
        page_queries: Cell<usize>,
    }

    impl CountingStore {
        fn new(inner: MemoryStore) -> Self {
            Self {
                inner,
                page_queries: Cell::new(0),
            }
        }
    }

    impl PartitionStore for CountingStore {
        fn first_key(&self) -> Result<Option<PartitionKey>, StoreError> {
            self.inner.first_key()
        }

        fn key_before(&self, key: &PartitionKey) -> Result<Option<PartitionKey>, StoreError> {
            self.inner.key_before(key)
        }

        fn key_after(&self, key: &PartitionKey) -> Result<Option<PartitionKey>, StoreError> {
            self.inner.key_after(key)
        }

        fn column_page(
            &self,
            key: &PartitionKey,
            after: Option<&[u8]>,
            limit: usize,
        ) -> Result<ColumnPage, StoreError> {
            self.page_queries.set(self.page_queries.get() + 1);
            self.inner.column_page(key, after, limit)
        }
    }

    fn store_with_columns(n: usize) -> MemoryStore {
        let cells = (0..n)
            .map(|i| ColumnCell::new(format!("c{i:04}"), format!("v{i}"), i as i64))
            .collect();
        let mut store = MemoryStore::new();
        store.push_partition("k", cells);
        store
    }

    #[test]
    fn walk_yields_every_key_once() {
        let mut store = MemoryStore::new();
        for k in ["k1", "k2", "k3"] {
            store.push_partition(k, vec![ColumnCell::new("a", "1", 1)]);
        }
        let first = store.first_key().unwrap().unwrap();

        let mut walk = PartitionWalk::new(&store, first);
        let mut seen = Vec::new();
        while let Some(key) = walk.next_key().unwrap() {
            seen.push(key.to_string());
        }
        assert_eq!(seen, ["k1", "k2", "k3"]);
        assert!(walk.next_key().unwrap().is_none());
    }

    #[test]
    fn short_page_ends_the_partition_in_one_query() {
        let store = CountingStore::new(store_with_columns(3));
        let key = PartitionKey::from("k");

        let mut pager = ColumnPager::new(&store, &key, 8);
        assert_eq!(pager.next_page().unwrap().unwrap().len(), 3);
        assert!(pager.next_page().unwrap().is_none());
        assert_eq!(store.page_queries.get(), 1);
    }

    #[test]
    fn exact_page_size_issues_a_second_query() {
        let store = CountingStore::new(store_with_columns(8));
        let key = PartitionKey::from("k");

        let mut pager = ColumnPager::new(&store, &key, 8);
        assert_eq!(pager.next_page().unwrap().unwrap().len(), 8);
        assert!(pager.next_page().unwrap().is_none());
        // The full first page cannot prove exhaustion by itself.
        assert_eq!(store.page_queries.get(), 2);
    }

    #[test]
    fn multi_page_partition_preserves_order_without_duplicates() {
        let store = store_with_columns(10);
        let key = PartitionKey::from("k");

        let mut pager = ColumnPager::new(&store, &key, 4);
        let mut names = Vec::new();
        while let Some(cells) = pager.next_page().unwrap() {
            names.extend(cells.into_iter().map(|c| c.name));
        }
        let expected: Vec<_> = (0..10).map(|i| format!("c{i:04}")).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn empty_partition_yields_no_pages() {
        let store = store_with_columns(0);
        let key = PartitionKey::from("k");

        let mut pager = ColumnPager::new(&store, &key, 4);
        assert!(pager.next_page().unwrap().is_none());
    }
}
