//! Record model for the dump format.
//!
//! A dump is a single JSON array of partition objects; each object carries
//! the partition `key` as text and its `columns` as `[column1, value,
//! writetime]` triples in column1 order.

use std::borrow::Cow;
use std::fmt;

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Partition key as stored in the source database.
///
/// The raw bytes drive token-range and column-range queries; the dump file
/// carries the UTF-8 rendering. Invalid byte sequences decode lossily to
/// replacement characters rather than failing the export.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionKey {
    bytes: Vec<u8>,
}

impl PartitionKey {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Text rendering used in the dump file and in log events.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl From<&str> for PartitionKey {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes().to_vec())
    }
}

impl From<String> for PartitionKey {
    fn from(s: String) -> Self {
        Self::from_bytes(s.into_bytes())
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// One `(column1, value, writetime)` triple.
///
/// `writetime` is the microsecond epoch timestamp the source database
/// assigned on write; it is carried through verbatim, never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCell {
    pub name: String,
    pub value: String,
    pub writetime: i64,
}

impl ColumnCell {
    pub fn new(name: impl Into<String>, value: impl Into<String>, writetime: i64) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            writetime,
        }
    }
}

// The dump format stores cells as 3-element arrays, not objects.
impl Serialize for ColumnCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(3)?;
        tup.serialize_element(&self.name)?;
        tup.serialize_element(&self.value)?;
        tup.serialize_element(&self.writetime)?;
        tup.end()
    }
}

impl<'de> Deserialize<'de> for ColumnCell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CellVisitor;

        impl<'de> Visitor<'de> for CellVisitor {
            type Value = ColumnCell;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a [column1, value, writetime] triple")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ColumnCell, A::Error> {
                let name = seq
                    .next_element()?
                    .ok_or_else(|| serde::de::Error::invalid_length(0, &self))?;
                let value = seq
                    .next_element()?
                    .ok_or_else(|| serde::de::Error::invalid_length(1, &self))?;
                let writetime = seq
                    .next_element()?
                    .ok_or_else(|| serde::de::Error::invalid_length(2, &self))?;
                Ok(ColumnCell {
                    name,
                    value,
                    writetime,
                })
            }
        }

        deserializer.deserialize_tuple(3, CellVisitor)
    }
}

/// One page fetched from the store: the decoded cells plus the raw column1
/// bytes of the last row, which seed the next continuation query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPage {
    pub cells: Vec<ColumnCell>,
    pub cursor: Option<Vec<u8>>,
}

/// One partition as it appears in the dump file.
///
/// The exporter never materializes this whole; it streams the fields as
/// pages arrive. Tests and downstream consumers deserialize into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionRecord {
    pub key: String,
    pub columns: Vec<ColumnCell>,
}
