// cf2json-core - database-agnostic export and count logic
//
// This crate contains the processing logic shared by the two migration
// binaries: the token-order partition walk, column paging, the streaming
// dump writer, and the streaming distinct-UUID counter.
//
// Everything here is synchronous and I/O-agnostic. The export loop writes
// through any `io::Write`, the counter reads from any `io::Read`, and the
// source database sits behind the `PartitionStore` seam. Binaries own
// files, gzip framing, and database sessions.

pub mod count;
pub mod dump;
pub mod export;
pub mod memory;
pub mod record;
pub mod scan;
pub mod store;

pub use count::{count_distinct, CountError, CountSummary};
pub use dump::{DumpError, DumpWriter};
pub use export::{dump_partitions, first_verified_key, ExportError, ExportSummary};
pub use memory::MemoryStore;
pub use record::{ColumnCell, ColumnPage, PartitionKey, PartitionRecord};
pub use scan::{ColumnPager, PartitionWalk};
pub use store::{PartitionStore, StoreError};
