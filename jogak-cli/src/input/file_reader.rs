//! Reading parser output and chunk files

use crate::error::CliError;
use crate::output::{FlatRecord, OutputFormat};
use anyhow::{Context, Result};
use jogak_core::{Chunk, ChunkRecord, Document};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Chunks read back from a JSON Lines file
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkFile {
    /// Format of the first record; record when the file is empty
    pub format: OutputFormat,
    pub chunks: Vec<Chunk>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnyRecord {
    Record(ChunkRecord),
    Flat(FlatRecord),
}

/// File reader for the batch commands
pub struct FileReader;

impl FileReader {
    /// Load a parser output file as a document
    pub fn read_document(path: &Path) -> Result<Document> {
        Self::ensure_exists(path)?;
        Document::from_parsed_json(path)
            .with_context(|| format!("Failed to load document: {}", path.display()))
    }

    /// Read a record or flat JSON Lines file
    pub fn read_chunks(path: &Path) -> Result<ChunkFile> {
        Self::ensure_exists(path)?;
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let mut format = None;
        let mut chunks = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: AnyRecord = serde_json::from_str(line).with_context(|| {
                format!("{}: line {} is not a chunk record", path.display(), idx + 1)
            })?;
            let (line_format, chunk) = match record {
                AnyRecord::Record(record) => (OutputFormat::Record, Chunk::from(record)),
                AnyRecord::Flat(record) => (OutputFormat::Flat, Chunk::from(record)),
            };
            format.get_or_insert(line_format);
            chunks.push(chunk);
        }

        Ok(ChunkFile {
            format: format.unwrap_or_default(),
            chunks,
        })
    }

    /// Get file size in bytes
    pub fn file_size(path: &Path) -> Result<u64> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to get metadata for: {}", path.display()))?;

        Ok(metadata.len())
    }

    fn ensure_exists(path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("공고_parsed.json");
        fs::write(&path, r#"[{"page": 1, "content": "본문"}]"#).unwrap();

        let document = FileReader::read_document(&path).unwrap();
        assert_eq!(document.source_document_id(), "공고.pdf");
        assert!(FileReader::file_size(&path).unwrap() > 0);
    }

    #[test]
    fn test_read_document_nonexistent_file() {
        let err = FileReader::read_document(Path::new("/nonexistent/a_parsed.json")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_read_document_broken_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken_parsed.json");
        fs::write(&path, "{").unwrap();

        let err = FileReader::read_document(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to load document"));
    }

    #[test]
    fn test_read_record_and_flat_chunks() {
        let temp_dir = TempDir::new().unwrap();
        let record = temp_dir.path().join("record.jsonl");
        fs::write(
            &record,
            concat!(
                r#"{"content": "본문", "page": 2, "metadata": {"source_document_id": "a.pdf", "chunk_id": "a__p0002-0003__00001", "section_title": null, "clause_key": "제1조", "page_start": 2, "page_end": 3}}"#,
                "\n\n"
            ),
        )
        .unwrap();
        let flat = temp_dir.path().join("flat.jsonl");
        fs::write(
            &flat,
            r#"{"text": "본문", "source_document_id": "a.pdf", "chunk_id": "a__p0002-0003__00001", "section_title": null, "clause_key": "제1조", "page_start": 2, "page_end": 3}"#,
        )
        .unwrap();

        let from_record = FileReader::read_chunks(&record).unwrap();
        let from_flat = FileReader::read_chunks(&flat).unwrap();
        assert_eq!(from_record.format, OutputFormat::Record);
        assert_eq!(from_flat.format, OutputFormat::Flat);
        assert_eq!(from_record.chunks, from_flat.chunks);
        assert_eq!(from_record.chunks[0].clause_key.as_deref(), Some("제1조"));
    }

    #[test]
    fn test_read_chunks_rejects_foreign_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("other.jsonl");
        fs::write(&path, "{\"id\": 1}\n").unwrap();

        let err = FileReader::read_chunks(&path).unwrap_err();
        assert!(err.to_string().contains("line 1 is not a chunk record"));
    }

    #[test]
    fn test_empty_chunk_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.jsonl");
        fs::write(&path, "").unwrap();

        let file = FileReader::read_chunks(&path).unwrap();
        assert!(file.chunks.is_empty());
        assert_eq!(file.format, OutputFormat::Record);
    }
}
