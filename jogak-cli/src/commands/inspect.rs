//! Inspect command implementation

use crate::input::{ChunkFile, FileReader};
use anyhow::Result;
use clap::Args;
use jogak_core::{Chunk, PageNumber};
use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::PathBuf;

/// Arguments for the inspect command
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Chunk file (record or flat JSON Lines)
    #[arg(short, long, value_name = "FILE", required = true)]
    pub input: PathBuf,

    /// Show the chunk at this position (0-based) instead of the summary
    #[arg(short = 'n', long, value_name = "N")]
    pub index: Option<usize>,

    /// Characters of chunk text to show
    #[arg(long, value_name = "CHARS", default_value_t = 500)]
    pub preview: usize,
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self) -> Result<()> {
        let file = FileReader::read_chunks(&self.input)?;

        let report = match self.index {
            Some(index) => {
                let chunk = file.chunks.get(index).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Chunk index {} out of range ({} chunks)",
                        index,
                        file.chunks.len()
                    )
                })?;
                render_chunk(chunk, index, file.chunks.len(), self.preview)
            }
            None => render_summary(&file),
        };

        print!("{report}");
        Ok(())
    }
}

/// Count, page coverage, size spread and section histogram
pub fn render_summary(file: &ChunkFile) -> String {
    let chunks = &file.chunks;
    let mut out = String::new();

    let _ = writeln!(out, "Format: {:?}", file.format);
    let _ = writeln!(out, "Chunks: {}", chunks.len());
    if chunks.is_empty() {
        return out;
    }

    let documents: BTreeSet<&str> = chunks.iter().map(|c| c.source_document_id.as_str()).collect();
    let _ = writeln!(out, "Documents: {}", documents.len());

    let covered: BTreeSet<PageNumber> = chunks
        .iter()
        .flat_map(|c| c.page_start..=c.page_end)
        .collect();
    if let (Some(first), Some(last)) = (covered.first(), covered.last()) {
        let _ = writeln!(
            out,
            "Pages: {} ~ {} ({} of {} covered)",
            first,
            last,
            covered.len(),
            last - first + 1
        );
    }

    let sizes: Vec<usize> = chunks.iter().map(Chunk::char_count).collect();
    let total: usize = sizes.iter().sum();
    let _ = writeln!(
        out,
        "Characters: min {}, mean {}, max {}",
        sizes.iter().min().copied().unwrap_or_default(),
        total / sizes.len(),
        sizes.iter().max().copied().unwrap_or_default()
    );

    let _ = writeln!(out, "Sections:");
    for (section, count) in section_histogram(chunks) {
        let _ = writeln!(out, "  {count:>5}  {}", section.unwrap_or("(none)"));
    }

    out
}

/// Sections by descending chunk count, first appearance breaking ties
pub fn section_histogram(chunks: &[Chunk]) -> Vec<(Option<&str>, usize)> {
    let mut histogram: Vec<(Option<&str>, usize)> = Vec::new();
    for chunk in chunks {
        let section = chunk.section_title.as_deref();
        match histogram.iter_mut().find(|(s, _)| *s == section) {
            Some((_, count)) => *count += 1,
            None => histogram.push((section, 1)),
        }
    }
    histogram.sort_by(|a, b| b.1.cmp(&a.1));
    histogram
}

/// One chunk with its metadata and a text preview
pub fn render_chunk(chunk: &Chunk, index: usize, total: usize, preview: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Chunk {} of {}: {}", index, total, chunk.chunk_id);
    let _ = writeln!(out, "Source: {}", chunk.source_document_id);
    let _ = writeln!(out, "Section: {}", chunk.section_title.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Clause: {}", chunk.clause_key.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Pages: {} ~ {}", chunk.page_start, chunk.page_end);
    let _ = writeln!(out, "Characters: {}", chunk.char_count());
    let _ = writeln!(out);

    let shown: String = chunk.text.chars().take(preview).collect();
    let _ = write!(out, "{shown}");
    if chunk.char_count() > preview {
        let _ = write!(out, " ...");
    }
    let _ = writeln!(out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    fn chunk(section: Option<&str>, pages: (PageNumber, PageNumber), text: &str) -> Chunk {
        Chunk {
            source_document_id: "공고.pdf".to_string(),
            chunk_id: format!("공고__p{:04}-{:04}__00001", pages.0, pages.1),
            section_title: section.map(str::to_string),
            clause_key: None,
            page_start: pages.0,
            page_end: pages.1,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_summary() {
        let file = ChunkFile {
            format: OutputFormat::Record,
            chunks: vec![
                chunk(None, (1, 1), "가나다"),
                chunk(Some("평가 기준"), (2, 3), "가나다라마"),
                chunk(Some("평가 기준"), (6, 6), "가"),
            ],
        };

        let summary = render_summary(&file);
        assert!(summary.contains("Chunks: 3\n"));
        assert!(summary.contains("Documents: 1\n"));
        assert!(summary.contains("Pages: 1 ~ 6 (4 of 6 covered)\n"));
        assert!(summary.contains("Characters: min 1, mean 3, max 5\n"));
        assert!(summary.contains("      2  평가 기준\n      1  (none)\n"));
    }

    #[test]
    fn test_empty_summary() {
        let file = ChunkFile {
            format: OutputFormat::Flat,
            chunks: Vec::new(),
        };
        assert_eq!(render_summary(&file), "Format: Flat\nChunks: 0\n");
    }

    #[test]
    fn test_histogram_ties_keep_first_appearance() {
        let chunks = vec![
            chunk(Some("일정"), (1, 1), "a"),
            chunk(Some("사업 개요"), (1, 1), "b"),
        ];
        assert_eq!(
            section_histogram(&chunks),
            vec![(Some("일정"), 1), (Some("사업 개요"), 1)]
        );
    }

    #[test]
    fn test_render_chunk_truncates() {
        let rendered = render_chunk(&chunk(Some("일정"), (4, 5), "가나다라마바사"), 2, 10, 3);
        assert!(rendered.starts_with("Chunk 2 of 10: 공고__p0004-0005__00001\n"));
        assert!(rendered.contains("Section: 일정\nClause: -\nPages: 4 ~ 5\n"));
        assert!(rendered.ends_with("\n가나다 ...\n"));
    }
}
