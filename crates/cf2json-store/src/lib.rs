// cf2json-store - CQL adapter behind the PartitionStore seam
//
// The driver is async; the export loop is synchronous and single-threaded.
// The store owns a private current-thread tokio runtime and blocks on each
// statement, so callers never see a future.
//
// key, column1 and value are blobs in the source column family. Keys and
// cursors move through the store as raw bytes; cell text is decoded lossily
// only for the dump output.

use cf2json_config::ClusterConfig;
use cf2json_core::record::{ColumnCell, ColumnPage, PartitionKey};
use cf2json_core::store::{PartitionStore, StoreError};
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::serialize::row::SerializeRow;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// CQL statement text, fixed at connect time.
///
/// The table name is validated as a bare identifier by config validation
/// before it is spliced in here. Key and cursor values are always bound.
struct Statements {
    first_key: String,
    key_before: String,
    key_after: String,
    first_page: String,
    next_page: String,
}

impl Statements {
    fn for_table(table: &str) -> Self {
        Self {
            first_key: format!("SELECT key FROM {table} LIMIT 1"),
            key_before: format!("SELECT key FROM {table} WHERE token(key) < token(?) LIMIT 1"),
            key_after: format!("SELECT key FROM {table} WHERE token(key) > token(?) LIMIT 1"),
            first_page: format!(
                "SELECT column1, value, writetime(value) FROM {table} WHERE key = ? LIMIT ?"
            ),
            next_page: format!(
                "SELECT column1, value, writetime(value) FROM {table} WHERE key = ? AND column1 > ? LIMIT ?"
            ),
        }
    }
}

/// Live connection to the source cluster.
///
/// Dropping the store closes the session and shuts the runtime down, on
/// every exit path including early error returns. Field order matters:
/// the session must drop while the runtime its workers live on is still up.
pub struct CqlStore {
    session: Session,
    statements: Statements,
    runtime: Runtime,
}

impl CqlStore {
    /// Connect to the cluster and switch to the configured keyspace.
    pub fn connect(cluster: &ClusterConfig) -> Result<Self, StoreError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(StoreError::connect)?;

        let addresses = cluster.node_addresses();
        debug!(nodes = ?addresses, keyspace = %cluster.keyspace, "connecting to cluster");

        let session = runtime
            .block_on(
                SessionBuilder::new()
                    .known_nodes(&addresses)
                    .use_keyspace(cluster.keyspace.as_str(), false)
                    .build(),
            )
            .map_err(StoreError::connect)?;

        Ok(Self {
            session,
            statements: Statements::for_table(&cluster.column_family),
            runtime,
        })
    }

    fn query_key(
        &self,
        cql: &str,
        values: impl SerializeRow,
    ) -> Result<Option<PartitionKey>, StoreError> {
        let result = self
            .runtime
            .block_on(self.session.query_unpaged(cql, values))
            .map_err(StoreError::query)?;
        let rows = result.into_rows_result().map_err(StoreError::query)?;
        let row = rows
            .maybe_first_row::<(Vec<u8>,)>()
            .map_err(StoreError::query)?;
        Ok(row.map(|(bytes,)| PartitionKey::from_bytes(bytes)))
    }
}

impl PartitionStore for CqlStore {
    fn first_key(&self) -> Result<Option<PartitionKey>, StoreError> {
        self.query_key(&self.statements.first_key, ())
    }

    fn key_before(&self, key: &PartitionKey) -> Result<Option<PartitionKey>, StoreError> {
        self.query_key(&self.statements.key_before, (key.as_bytes().to_vec(),))
    }

    fn key_after(&self, key: &PartitionKey) -> Result<Option<PartitionKey>, StoreError> {
        self.query_key(&self.statements.key_after, (key.as_bytes().to_vec(),))
    }

    fn column_page(
        &self,
        key: &PartitionKey,
        after: Option<&[u8]>,
        limit: usize,
    ) -> Result<ColumnPage, StoreError> {
        let limit_value = i32::try_from(limit).unwrap_or(i32::MAX);
        let key_bytes = key.as_bytes().to_vec();

        let result = match after {
            Some(cursor) => self.runtime.block_on(self.session.query_unpaged(
                self.statements.next_page.as_str(),
                (key_bytes, cursor.to_vec(), limit_value),
            )),
            None => self.runtime.block_on(self.session.query_unpaged(
                self.statements.first_page.as_str(),
                (key_bytes, limit_value),
            )),
        }
        .map_err(StoreError::query)?;

        let rows_result = result.into_rows_result().map_err(StoreError::query)?;
        let mut page = ColumnPage::default();
        for row in rows_result
            .rows::<(Vec<u8>, Vec<u8>, i64)>()
            .map_err(StoreError::query)?
        {
            let (name, value, writetime) = row.map_err(StoreError::query)?;
            // Cursor keeps the raw bytes; the continuation comparison must
            // match whatever the cluster ordered by, decoded or not.
            page.cursor = Some(name.clone());
            page.cells.push(ColumnCell::new(
                String::from_utf8_lossy(&name).into_owned(),
                String::from_utf8_lossy(&value).into_owned(),
                writetime,
            ));
        }
        Ok(page)
    }
}
