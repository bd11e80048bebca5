//! Flat JSON Lines output: chunk fields at top level, text under `text`

use super::OutputFormatter;
use anyhow::Result;
use jogak_core::{Chunk, PageNumber};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One flat output line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub text: String,
    pub source_document_id: String,
    pub chunk_id: String,
    #[serde(default)]
    pub section_title: Option<String>,
    #[serde(default)]
    pub clause_key: Option<String>,
    pub page_start: PageNumber,
    pub page_end: PageNumber,
}

impl From<&Chunk> for FlatRecord {
    fn from(chunk: &Chunk) -> Self {
        Self {
            text: chunk.text.clone(),
            source_document_id: chunk.source_document_id.clone(),
            chunk_id: chunk.chunk_id.clone(),
            section_title: chunk.section_title.clone(),
            clause_key: chunk.clause_key.clone(),
            page_start: chunk.page_start,
            page_end: chunk.page_end,
        }
    }
}

impl From<FlatRecord> for Chunk {
    fn from(record: FlatRecord) -> Self {
        Self {
            source_document_id: record.source_document_id,
            chunk_id: record.chunk_id,
            section_title: record.section_title,
            clause_key: record.clause_key,
            page_start: record.page_start,
            page_end: record.page_end,
            text: record.text,
        }
    }
}

/// Flat formatter - one [`FlatRecord`] per line
pub struct FlatFormatter<W: Write> {
    writer: W,
}

impl<W: Write> FlatFormatter<W> {
    /// Create a new flat formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for FlatFormatter<W> {
    fn format_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &FlatRecord::from(chunk))?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
