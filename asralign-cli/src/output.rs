//! Incremental JSON output for aligned sentence pairs.
//!
//! Pairs are serialized as they are produced, so partial output survives an
//! aborted run and long documents never buffer the whole result set.

use asralign::types::AlignedPair;
use eyre::Result;
use std::io::Write;

/// Streams `{"sentence_pairs": [...]}` to a writer, one element at a time.
pub struct PairWriter<W: Write> {
    writer: W,
    count: usize,
}

impl<W: Write> PairWriter<W> {
    pub fn new(mut writer: W) -> Result<Self> {
        writeln!(writer, "{{ \"sentence_pairs\": [")?;
        Ok(Self { writer, count: 0 })
    }

    pub fn write(&mut self, pair: &AlignedPair) -> Result<()> {
        if self.count > 0 {
            writeln!(self.writer, ",")?;
        }
        serde_json::to_writer_pretty(&mut self.writer, pair)?;
        self.count += 1;
        Ok(())
    }

    /// Number of pairs written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Close the JSON document and flush.
    pub fn finish(mut self) -> Result<()> {
        writeln!(self.writer, "\n]}}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Drain an aligner into a writer, returning the number of pairs written.
pub fn write_all<W, I>(pairs: I, writer: W) -> Result<usize>
where
    W: Write,
    I: Iterator<Item = asralign::Result<AlignedPair>>,
{
    let mut out = PairWriter::new(writer)?;
    for pair in pairs {
        out.write(&pair?)?;
    }
    let count = out.count();
    out.finish()?;
    Ok(count)
}
