//! Distinct-source counting over a dump file.
//!
//! The dump array is consumed record by record through a serde visitor, so
//! a multi-gigabyte file never materializes. Only the `key` field of each
//! record is kept; `columns` and anything else are parsed and discarded by
//! serde's ignored-value path.

use std::collections::HashSet;
use std::fmt;
use std::io::Read;

use serde::de::{Deserializer as _, SeqAccess, Visitor};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CountError {
    #[error("failed to read dump: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Totals from one pass over a dump file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountSummary {
    /// Distinct key prefixes seen, malformed ones included.
    pub distinct: usize,
    /// Partition records in the dump.
    pub records: u64,
    /// Prefixes that did not parse as a UUID. Still counted in `distinct`.
    pub malformed: u64,
}

/// The one field of a dump record the counter needs.
#[derive(Deserialize)]
struct RecordKey {
    key: String,
}

#[derive(Default)]
struct PrefixSet {
    seen: HashSet<String>,
    records: u64,
    malformed: u64,
}

impl PrefixSet {
    /// Fold one partition key into the set.
    ///
    /// The prefix is everything before the first `:`, lowercased. A prefix
    /// that is not a valid UUID is logged and counted as malformed, but it
    /// still lands in the set; the historical counter behaved that way and
    /// dropping such rows would understate the total.
    fn observe(&mut self, key: &str) {
        self.records += 1;
        let prefix = match key.split_once(':') {
            Some((prefix, _)) => prefix,
            None => key,
        };
        let prefix = prefix.to_lowercase();
        if Uuid::parse_str(&prefix).is_err() {
            warn!(prefix = %prefix, "partition key prefix is not a UUID");
            self.malformed += 1;
        }
        self.seen.insert(prefix);
    }

    fn into_summary(self) -> CountSummary {
        CountSummary {
            distinct: self.seen.len(),
            records: self.records,
            malformed: self.malformed,
        }
    }
}

impl<'de> Visitor<'de> for &mut PrefixSet {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a dump array of partition records")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        while let Some(record) = seq.next_element::<RecordKey>()? {
            self.observe(&record.key);
        }
        Ok(())
    }
}

/// Count distinct partition key prefixes in a dump read from `input`.
pub fn count_distinct<R: Read>(input: R) -> Result<CountSummary, CountError> {
    let mut set = PrefixSet::default();
    let mut de = serde_json::Deserializer::from_reader(input);
    de.deserialize_seq(&mut set)?;
    de.end()?;
    Ok(set.into_summary())
}
