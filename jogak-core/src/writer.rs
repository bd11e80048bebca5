//! JSON Lines records for the indexing stage

use crate::chunk::{Chunk, PageNumber};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// One output line: `{content, page, metadata}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Chunk text
    pub content: String,
    /// Representative page (the first page of the chunk)
    pub page: PageNumber,
    /// Structural metadata
    pub metadata: RecordMetadata,
}

/// Metadata block of a [`ChunkRecord`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub source_document_id: String,
    pub chunk_id: String,
    pub section_title: Option<String>,
    pub clause_key: Option<String>,
    pub page_start: PageNumber,
    pub page_end: PageNumber,
}

impl From<&Chunk> for ChunkRecord {
    fn from(chunk: &Chunk) -> Self {
        Self {
            content: chunk.text.clone(),
            page: chunk.page_start,
            metadata: RecordMetadata {
                source_document_id: chunk.source_document_id.clone(),
                chunk_id: chunk.chunk_id.clone(),
                section_title: chunk.section_title.clone(),
                clause_key: chunk.clause_key.clone(),
                page_start: chunk.page_start,
                page_end: chunk.page_end,
            },
        }
    }
}

impl From<ChunkRecord> for Chunk {
    fn from(record: ChunkRecord) -> Self {
        Self {
            source_document_id: record.metadata.source_document_id,
            chunk_id: record.metadata.chunk_id,
            section_title: record.metadata.section_title,
            clause_key: record.metadata.clause_key,
            page_start: record.metadata.page_start,
            page_end: record.metadata.page_end,
            text: record.content,
        }
    }
}

/// Streams chunks as JSON Lines, one record per line, in order
pub struct ChunkWriter<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> ChunkWriter<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Write one chunk
    pub fn write_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &ChunkRecord::from(chunk))?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Write chunks in order, returning how many were written
    pub fn write_all<'c>(&mut self, chunks: impl IntoIterator<Item = &'c Chunk>) -> Result<usize> {
        let before = self.written;
        for chunk in chunks {
            self.write_chunk(chunk)?;
        }
        Ok(self.written - before)
    }

    /// Flush buffered output without giving up the writer
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the inner writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Read records back from JSON Lines, skipping blank lines
pub fn read_records(reader: impl BufRead) -> Result<Vec<ChunkRecord>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| Error::InvalidDocument {
            source_id: format!("line {}", idx + 1),
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}
