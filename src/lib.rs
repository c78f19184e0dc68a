// cf2json - dump a Cassandra column family to gzip-compressed JSON and
// count distinct partition-key UUIDs in such dumps
//
// The root crate stitches the workspace together for library consumers and
// the integration tests. The binaries live in crates/cf2json-cli:
// cf2json-dump writes the dump file, cf2json-count reads one back.

pub use cf2json_config::{
    ClusterConfig, DumpConfig, LogConfig, LogFormat, MigrationConfig,
};
pub use cf2json_core::{
    count_distinct, dump_partitions, first_verified_key, ColumnCell, ColumnPage, ColumnPager,
    CountError, CountSummary, DumpError, DumpWriter, ExportError, ExportSummary, MemoryStore,
    PartitionKey, PartitionRecord, PartitionStore, PartitionWalk, StoreError,
};
pub use cf2json_store::CqlStore;
