//! Incremental writer for the dump format.
//!
//! A dump is one top-level JSON array of
//! `{"key": …, "columns": [[column1, value, writetime], …]}` objects.
//! Partitions stream straight to the sink as their pages arrive; nothing is
//! buffered here, so output size never feeds back into memory use.
//! Structural tokens are emitted directly; strings and cells go through
//! `serde_json` for RFC 8259 escaping.

use std::io::Write;

use thiserror::Error;

use crate::record::ColumnCell;

#[derive(Debug, Error)]
pub enum DumpError {
    /// Calls arrived in an order the format cannot express, e.g.
    /// `write_column` with no partition open. Always a caller bug.
    #[error("dump writer misuse: {0}")]
    State(&'static str),

    #[error("failed to encode JSON: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    /// At the top level, between partitions.
    Array { first: bool },
    /// Inside a partition's columns array.
    Columns { first: bool },
}

/// Streaming writer producing the export file format.
pub struct DumpWriter<W: Write> {
    out: W,
    state: WriterState,
}

impl<W: Write> DumpWriter<W> {
    /// Open the top-level array on `out`.
    pub fn new(mut out: W) -> Result<Self, DumpError> {
        out.write_all(b"[")?;
        Ok(Self {
            out,
            state: WriterState::Array { first: true },
        })
    }

    /// Start the object for `key`. Must be balanced by `end_partition`.
    pub fn begin_partition(&mut self, key: &str) -> Result<(), DumpError> {
        let WriterState::Array { first } = self.state else {
            return Err(DumpError::State("begin_partition inside an open partition"));
        };
        if !first {
            self.out.write_all(b",")?;
        }
        self.out.write_all(b"{\"key\":")?;
        serde_json::to_writer(&mut self.out, key)?;
        self.out.write_all(b",\"columns\":[")?;
        self.state = WriterState::Columns { first: true };
        Ok(())
    }

    /// Append one cell to the open partition's columns array.
    pub fn write_column(&mut self, cell: &ColumnCell) -> Result<(), DumpError> {
        let WriterState::Columns { first } = self.state else {
            return Err(DumpError::State("write_column without an open partition"));
        };
        if !first {
            self.out.write_all(b",")?;
        }
        serde_json::to_writer(&mut self.out, cell)?;
        self.state = WriterState::Columns { first: false };
        Ok(())
    }

    /// Close the current partition object.
    pub fn end_partition(&mut self) -> Result<(), DumpError> {
        let WriterState::Columns { .. } = self.state else {
            return Err(DumpError::State("end_partition without an open partition"));
        };
        self.out.write_all(b"]}")?;
        self.state = WriterState::Array { first: false };
        Ok(())
    }

    /// Close the array, flush, and hand back the sink. Callers typically
    /// still need to finish an outer gzip encoder they own.
    pub fn finish(mut self) -> Result<W, DumpError> {
        let WriterState::Array { .. } = self.state else {
            return Err(DumpError::State("finish with an open partition"));
        };
        self.out.write_all(b"]")?;
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_one(key: &str, cells: &[ColumnCell]) -> String {
        let mut writer = DumpWriter::new(Vec::new()).unwrap();
        writer.begin_partition(key).unwrap();
        for cell in cells {
            writer.write_column(cell).unwrap();
        }
        writer.end_partition().unwrap();
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn empty_dump_is_an_empty_array() {
        let writer = DumpWriter::new(Vec::new()).unwrap();
        let out = writer.finish().unwrap();
        assert_eq!(out, b"[]");
    }

    #[test]
    fn single_partition_layout() {
        let out = write_one(
            "k:2014",
            &[
                ColumnCell::new("c1", "v1", 100),
                ColumnCell::new("c2", "v2", 200),
            ],
        );
        assert_eq!(
            out,
            r#"[{"key":"k:2014","columns":[["c1","v1",100],["c2","v2",200]]}]"#
        );
    }

    #[test]
    fn partitions_are_comma_separated() {
        let mut writer = DumpWriter::new(Vec::new()).unwrap();
        writer.begin_partition("a").unwrap();
        writer.end_partition().unwrap();
        writer.begin_partition("b").unwrap();
        writer.end_partition().unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(out, r#"[{"key":"a","columns":[]},{"key":"b","columns":[]}]"#);
    }

    #[test]
    fn keys_and_values_are_escaped() {
        let out = write_one("he said \"hi\"\n", &[ColumnCell::new("a\tb", "c\\d", 1)]);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["key"], "he said \"hi\"\n");
        assert_eq!(parsed[0]["columns"][0][0], "a\tb");
        assert_eq!(parsed[0]["columns"][0][1], "c\\d");
    }

    #[test]
    fn misuse_is_rejected() {
        let mut writer = DumpWriter::new(Vec::new()).unwrap();
        let cell = ColumnCell::new("a", "b", 1);
        assert!(matches!(
            writer.write_column(&cell),
            Err(DumpError::State(_))
        ));
        assert!(matches!(writer.end_partition(), Err(DumpError::State(_))));

        writer.begin_partition("k").unwrap();
        assert!(matches!(
            writer.begin_partition("k2"),
            Err(DumpError::State(_))
        ));
        assert!(matches!(writer.finish(), Err(DumpError::State(_))));
    }
}
