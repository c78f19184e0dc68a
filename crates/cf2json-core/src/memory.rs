//! In-memory [`PartitionStore`] used by tests and fixtures.

use crate::record::{ColumnCell, ColumnPage, PartitionKey};
use crate::store::{PartitionStore, StoreError};

/// Stand-in for a column family: partition insertion order plays the role
/// of token order, and cells are kept sorted by raw column1 bytes with
/// duplicate names dropped (a real partition cannot hold two cells with the
/// same column1).
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    partitions: Vec<(PartitionKey, Vec<ColumnCell>)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a partition at the end of the token order.
    pub fn push_partition(&mut self, key: impl Into<PartitionKey>, mut cells: Vec<ColumnCell>) {
        cells.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        cells.dedup_by(|a, b| a.name == b.name);
        self.partitions.push((key.into(), cells));
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    fn position(&self, key: &PartitionKey) -> Option<usize> {
        self.partitions.iter().position(|(k, _)| k == key)
    }
}

impl PartitionStore for MemoryStore {
    fn first_key(&self) -> Result<Option<PartitionKey>, StoreError> {
        Ok(self.partitions.first().map(|(k, _)| k.clone()))
    }

    fn key_before(&self, key: &PartitionKey) -> Result<Option<PartitionKey>, StoreError> {
        Ok(match self.position(key) {
            Some(i) if i > 0 => self.partitions.get(i - 1).map(|(k, _)| k.clone()),
            _ => None,
        })
    }

    fn key_after(&self, key: &PartitionKey) -> Result<Option<PartitionKey>, StoreError> {
        Ok(match self.position(key) {
            Some(i) => self.partitions.get(i + 1).map(|(k, _)| k.clone()),
            None => None,
        })
    }

    fn column_page(
        &self,
        key: &PartitionKey,
        after: Option<&[u8]>,
        limit: usize,
    ) -> Result<ColumnPage, StoreError> {
        let Some(i) = self.position(key) else {
            return Ok(ColumnPage::default());
        };
        let cells = &self.partitions[i].1;
        let start = match after {
            Some(after) => cells.partition_point(|c| c.name.as_bytes() <= after),
            None => 0,
        };
        let end = (start + limit).min(cells.len());
        let window = &cells[start..end];
        Ok(ColumnPage {
            cells: window.to_vec(),
            cursor: window.last().map(|c| c.name.as_bytes().to_vec()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(names: &[&str]) -> Vec<ColumnCell> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| ColumnCell::new(*n, format!("v{i}"), i as i64))
            .collect()
    }

    #[test]
    fn partitions_walk_in_insertion_order() {
        let mut store = MemoryStore::new();
        store.push_partition("k1", cells(&["a"]));
        store.push_partition("k2", cells(&["a"]));
        store.push_partition("k3", cells(&["a"]));

        let first = store.first_key().unwrap().unwrap();
        assert_eq!(first, PartitionKey::from("k1"));
        assert!(store.key_before(&first).unwrap().is_none());

        let second = store.key_after(&first).unwrap().unwrap();
        assert_eq!(second, PartitionKey::from("k2"));
        assert_eq!(
            store.key_before(&second).unwrap(),
            Some(PartitionKey::from("k1"))
        );

        let third = store.key_after(&second).unwrap().unwrap();
        assert!(store.key_after(&third).unwrap().is_none());
    }

    #[test]
    fn cells_come_back_sorted_and_deduplicated() {
        let mut store = MemoryStore::new();
        store.push_partition(
            "k",
            vec![
                ColumnCell::new("b", "2", 2),
                ColumnCell::new("a", "1", 1),
                ColumnCell::new("b", "dup", 9),
            ],
        );

        let page = store
            .column_page(&PartitionKey::from("k"), None, 10)
            .unwrap();
        let names: Vec<_> = page.cells.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(page.cursor.as_deref(), Some(b"b".as_slice()));
    }

    #[test]
    fn paging_resumes_past_the_cursor() {
        let mut store = MemoryStore::new();
        store.push_partition("k", cells(&["a", "b", "c", "d", "e"]));
        let key = PartitionKey::from("k");

        let first = store.column_page(&key, None, 2).unwrap();
        assert_eq!(first.cells.len(), 2);
        assert_eq!(first.cursor.as_deref(), Some(b"b".as_slice()));

        let second = store.column_page(&key, Some(b"b"), 2).unwrap();
        let names: Vec<_> = second.cells.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["c", "d"]);

        let last = store.column_page(&key, Some(b"d"), 2).unwrap();
        let names: Vec<_> = last.cells.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["e"]);

        let empty = store.column_page(&key, Some(b"e"), 2).unwrap();
        assert!(empty.cells.is_empty());
        assert!(empty.cursor.is_none());
    }

    #[test]
    fn unknown_key_yields_empty_page() {
        let store = MemoryStore::new();
        let page = store
            .column_page(&PartitionKey::from("missing"), None, 4)
            .unwrap();
        assert_eq!(page, ColumnPage::default());
    }
}
