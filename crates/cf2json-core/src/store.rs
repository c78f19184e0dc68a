//! The seam between the export loop and the source database.

use thiserror::Error;

use crate::record::{ColumnPage, PartitionKey};

/// Errors surfaced by a partition store backend.
///
/// Nothing here is retried; a store error aborts the whole run and the
/// operator re-runs the tool.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cluster connection failed: {0}")]
    Connect(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("query failed: {0}")]
    Query(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn connect(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Connect(err.into())
    }

    pub fn query(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Query(err.into())
    }
}

/// Minimal query surface the export loop needs from the source database.
///
/// `first_key`/`key_before`/`key_after` walk partition keys in token order;
/// `column_page` pages one partition's columns in column1 order. Implemented
/// by the CQL adapter in `cf2json-store` and by
/// [`MemoryStore`](crate::memory::MemoryStore) for tests and fixtures, which
/// is what keeps the page-fetch loop testable without a live cluster.
pub trait PartitionStore {
    /// First partition key in token order, if the column family is non-empty.
    fn first_key(&self) -> Result<Option<PartitionKey>, StoreError>;

    /// Any key whose token is strictly smaller than `key`'s, limit 1.
    ///
    /// Only existence matters to callers; which earlier key comes back is
    /// unspecified.
    fn key_before(&self, key: &PartitionKey) -> Result<Option<PartitionKey>, StoreError>;

    /// The next key in token order strictly after `key`, if any.
    fn key_after(&self, key: &PartitionKey) -> Result<Option<PartitionKey>, StoreError>;

    /// Up to `limit` cells of `key`'s partition in column1 order, restricted
    /// to `column1 > after` when a continuation cursor is given.
    fn column_page(
        &self,
        key: &PartitionKey,
        after: Option<&[u8]>,
        limit: usize,
    ) -> Result<ColumnPage, StoreError>;
}
