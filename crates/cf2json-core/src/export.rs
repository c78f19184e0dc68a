//! Export orchestration.
//!
//! Two phases: prove the cluster's claimed first key really is first, then
//! walk every partition from there and stream its pages into a
//! [`DumpWriter`]. The verification exists because the whole scan is keyed
//! off that one starting point; starting anywhere later silently drops data.

use std::io::Write;

use thiserror::Error;
use tracing::debug;

use crate::dump::{DumpError, DumpWriter};
use crate::record::PartitionKey;
use crate::scan::{ColumnPager, PartitionWalk};
use crate::store::{PartitionStore, StoreError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Dump(#[from] DumpError),

    /// The cluster returned a first key that has an earlier key by token.
    #[error("{key} is not the first partition key")]
    NotFirstKey { key: String },
}

/// Running totals for a completed export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub partitions: u64,
    pub columns: u64,
}

/// Locate the token-wise first partition key and verify nothing precedes it.
///
/// `Ok(None)` means the column family holds no partitions at all, in which
/// case there is nothing to dump and no output should be created.
pub fn first_verified_key<S: PartitionStore>(
    store: &S,
) -> Result<Option<PartitionKey>, ExportError> {
    let Some(first) = store.first_key()? else {
        return Ok(None);
    };
    if let Some(earlier) = store.key_before(&first)? {
        debug!(first = %first, earlier = %earlier, "found key before claimed first");
        return Err(ExportError::NotFirstKey {
            key: first.text().into_owned(),
        });
    }
    Ok(Some(first))
}

/// Stream every partition from `first` onward into `writer`.
///
/// Each partition becomes one object in the output array; its columns are
/// fetched in pages of `page_size` and appended as they arrive. The caller
/// still owns the sink and is responsible for finishing the writer.
pub fn dump_partitions<S, W>(
    store: &S,
    first: PartitionKey,
    writer: &mut DumpWriter<W>,
    page_size: usize,
) -> Result<ExportSummary, ExportError>
where
    S: PartitionStore,
    W: Write,
{
    let mut summary = ExportSummary::default();
    let mut walk = PartitionWalk::new(store, first);
    while let Some(key) = walk.next_key()? {
        writer.begin_partition(&key.text())?;
        let mut columns: u64 = 0;
        let mut pager = ColumnPager::new(store, &key, page_size);
        while let Some(page) = pager.next_page()? {
            for cell in &page {
                writer.write_column(cell)?;
            }
            columns += page.len() as u64;
        }
        writer.end_partition()?;
        debug!(key = %key, columns, "dumped partition");
        summary.partitions += 1;
        summary.columns += columns;
    }
    Ok(summary)
}
