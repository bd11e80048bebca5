//! Indexing record output (`{content, page, metadata}` per line)

use super::OutputFormatter;
use anyhow::Result;
use jogak_core::{Chunk, ChunkWriter};
use std::io::Write;

/// Record formatter - one [`jogak_core::ChunkRecord`] per line
pub struct RecordFormatter<W: Write> {
    writer: ChunkWriter<W>,
}

impl<W: Write> RecordFormatter<W> {
    /// Create a new record formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer: ChunkWriter::new(writer),
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for RecordFormatter<W> {
    fn format_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        self.writer.write_chunk(chunk)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        log::trace!("wrote {} records", self.writer.written());
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_chunk;
    use jogak_core::read_records;

    #[test]
    fn test_records_read_back() {
        let mut buffer = Vec::new();
        let mut formatter = RecordFormatter::new(&mut buffer);
        formatter.format_chunk(&sample_chunk()).unwrap();
        formatter.format_chunk(&sample_chunk()).unwrap();
        formatter.finish().unwrap();
        drop(formatter);

        let records = read_records(buffer.as_slice()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].page, 3);
        assert_eq!(records[0].metadata.page_end, 4);
        assert_eq!(Chunk::from(records[1].clone()), sample_chunk());
    }
}
