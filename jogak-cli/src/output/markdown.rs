//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use jogak_core::Chunk;
use std::io::Write;

/// Markdown formatter - one heading per chunk for human review
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    chunk_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            chunk_count: 0,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        self.chunk_count += 1;
        writeln!(self.writer, "## {}. {}", self.chunk_count, chunk.chunk_id)?;
        writeln!(
            self.writer,
            "*{}, section: {}, clause: {}, pages {}-{}*",
            chunk.source_document_id,
            chunk.section_title.as_deref().unwrap_or("-"),
            chunk.clause_key.as_deref().unwrap_or("-"),
            chunk.page_start,
            chunk.page_end
        )?;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", chunk.text)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total chunks: {}*", self.chunk_count)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_chunk;

    #[test]
    fn test_markdown_layout() {
        let mut buffer = Vec::new();
        let mut formatter = MarkdownFormatter::new(&mut buffer);
        formatter.format_chunk(&sample_chunk()).unwrap();
        formatter.finish().unwrap();
        drop(formatter);

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with("## 1. 공고문__p0003-0004__00002\n"));
        assert!(output.contains("section: 평가 기준, clause: 제5조, pages 3-4"));
        assert!(output.ends_with("---\n*Total chunks: 1*\n"));
    }
}
