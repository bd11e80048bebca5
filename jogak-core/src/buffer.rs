//! Line buffering state machine
//!
//! [`ChunkBuffer`] consumes one normalized line at a time together with the
//! boundary decision for that line. It owns the document's
//! [`BoundaryContext`], the open [`ChunkBuilder`] (if any) and the
//! [`ChunkSequence`] of chunks emitted so far.
//!
//! # Flushing
//!
//! A flush joins the buffered lines, runs them through the [`TextCleaner`] and
//! then either
//! - drops the block (nothing left, or rejected by the cleaner),
//! - merges it into the previous chunk (short, not forced, previous exists), or
//! - emits a new chunk under the current section/clause context.
//!
//! Boundary flushes are not forced. Overflow and end-of-document flushes are
//! forced and never merge.

use crate::boundary::{Boundary, BoundaryContext};
use crate::chunk::{chunk_id, document_stem, Chunk, ChunkSequence, PageNumber};
use crate::cleaner::TextCleaner;
use crate::config::SegmenterConfig;
use crate::normalize::is_table_row;
use log::trace;

/// Lines accumulated since the last flush
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkBuilder {
    lines: Vec<String>,
    page_start: PageNumber,
    page_end: PageNumber,
    char_count: usize,
}

impl ChunkBuilder {
    /// Open a builder on the page of its first line
    pub fn new(page: PageNumber) -> Self {
        Self {
            lines: Vec::new(),
            page_start: page,
            page_end: page,
            char_count: 0,
        }
    }

    /// Append a line and extend the page range
    pub fn push(&mut self, line: &str, page: PageNumber) {
        self.char_count += line.chars().count();
        self.page_start = self.page_start.min(page);
        self.page_end = self.page_end.max(page);
        self.lines.push(line.to_string());
    }

    /// Buffered lines in order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Sum of line lengths, separators excluded
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// First page seen
    pub fn page_start(&self) -> PageNumber {
        self.page_start
    }

    /// Last page seen
    pub fn page_end(&self) -> PageNumber {
        self.page_end
    }

    /// Whether the two most recent lines are both table rows
    pub fn ends_in_table(&self, delimiter: char) -> bool {
        match self.lines.as_slice() {
            [.., prev, last] => is_table_row(prev, delimiter) && is_table_row(last, delimiter),
            _ => false,
        }
    }

    /// Joined, trimmed text
    pub fn text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

/// Buffer state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BufferState {
    /// No open buffer
    #[default]
    Empty,
    /// At least one line buffered
    Accumulating(ChunkBuilder),
}

/// Counters describing what happened to each flush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// New chunks emitted
    pub emitted: usize,
    /// Short blocks merged into the previous chunk
    pub merged: usize,
    /// Blocks rejected by the cleaner
    pub rejected: usize,
    /// Rejected blocks that looked like a table of contents
    pub rejected_toc: usize,
    /// Flushes triggered by the hard ceiling
    pub overflows: usize,
    /// Boundaries ignored because they fell inside a table
    pub suppressed_boundaries: usize,
}

/// Per-document buffering state machine
#[derive(Debug)]
pub struct ChunkBuffer<'a> {
    cleaner: &'a TextCleaner,
    hard_ceiling_chars: usize,
    min_chunk_chars: usize,
    column_delimiter: char,
    keep_tables_intact: bool,
    source_document_id: String,
    stem: String,
    context: BoundaryContext,
    state: BufferState,
    overflow_pending: bool,
    chunks: ChunkSequence,
    stats: FlushStats,
}

impl<'a> ChunkBuffer<'a> {
    /// Create a buffer for one source document
    pub fn new(
        config: &SegmenterConfig,
        cleaner: &'a TextCleaner,
        source_document_id: impl Into<String>,
    ) -> Self {
        let source_document_id = source_document_id.into();
        let stem = document_stem(&source_document_id).to_string();

        Self {
            cleaner,
            hard_ceiling_chars: config.hard_ceiling_chars,
            min_chunk_chars: config.min_chunk_chars,
            column_delimiter: config.column_delimiter,
            keep_tables_intact: config.keep_tables_intact,
            source_document_id,
            stem,
            context: BoundaryContext::new(),
            state: BufferState::Empty,
            overflow_pending: false,
            chunks: ChunkSequence::new(),
            stats: FlushStats::default(),
        }
    }

    /// Current section/clause context
    pub fn context(&self) -> &BoundaryContext {
        &self.context
    }

    /// Current buffer state
    pub fn state(&self) -> &BufferState {
        &self.state
    }

    /// Chunks emitted so far
    pub fn chunks(&self) -> &ChunkSequence {
        &self.chunks
    }

    /// Consume one normalized line and its boundary decision
    pub fn push_line(&mut self, line: &str, page: PageNumber, boundary: Option<Boundary>) {
        // A deferred overflow flush fires once the table run that caused it ends
        if self.overflow_pending && !is_table_row(line, self.column_delimiter) {
            trace!("{}: table run ended, flushing deferred overflow", self.stem);
            self.flush(true);
        }

        if let Some(boundary) = boundary {
            if self.in_table() {
                trace!(
                    "{}: boundary {:?} suppressed inside table",
                    self.stem,
                    boundary.key()
                );
                self.stats.suppressed_boundaries += 1;
            } else {
                self.flush(false);
                self.context.apply(&boundary);
            }
        }

        if matches!(self.state, BufferState::Empty) {
            self.state = BufferState::Accumulating(ChunkBuilder::new(page));
        }
        let BufferState::Accumulating(builder) = &mut self.state else {
            return;
        };
        builder.push(line, page);

        if builder.char_count() > self.hard_ceiling_chars && !self.overflow_pending {
            self.stats.overflows += 1;
            if self.keep_tables_intact && is_table_row(line, self.column_delimiter) {
                trace!("{}: overflow inside table, deferring flush", self.stem);
                self.overflow_pending = true;
            } else {
                self.flush(true);
            }
        }
    }

    /// Force-flush whatever remains and return the emitted chunks
    pub fn finish(mut self) -> (ChunkSequence, FlushStats) {
        self.flush(true);
        (self.chunks, self.stats)
    }

    fn in_table(&self) -> bool {
        match &self.state {
            BufferState::Accumulating(builder) => builder.ends_in_table(self.column_delimiter),
            BufferState::Empty => false,
        }
    }

    fn flush(&mut self, force: bool) {
        self.overflow_pending = false;
        let BufferState::Accumulating(builder) = std::mem::take(&mut self.state) else {
            return;
        };

        let raw = builder.text();
        if raw.is_empty() {
            return;
        }

        let cleaned = match self.cleaner.clean(&raw) {
            Ok(cleaned) => cleaned,
            Err(rejection) => {
                trace!(
                    "{}: dropped block p{}-{}: {}",
                    self.stem,
                    builder.page_start(),
                    builder.page_end(),
                    rejection
                );
                self.stats.rejected += 1;
                if rejection.is_table_of_contents() {
                    self.stats.rejected_toc += 1;
                }
                return;
            }
        };

        let chars = cleaned.chars().count();
        if chars < self.min_chunk_chars
            && !force
            && self.chunks.amend_last(&cleaned, builder.page_end())
        {
            trace!("{}: merged {chars} chars into previous chunk", self.stem);
            self.stats.merged += 1;
            return;
        }

        let id = chunk_id(
            &self.stem,
            builder.page_start(),
            builder.page_end(),
            self.chunks.next_sequence(),
        );
        trace!("{}: emitted {id} ({chars} chars, forced: {force})", self.stem);

        self.chunks.push(Chunk {
            source_document_id: self.source_document_id.clone(),
            chunk_id: id,
            section_title: self.context.current_section_title.clone(),
            clause_key: self.context.current_clause_key.clone(),
            page_start: builder.page_start(),
            page_end: builder.page_end(),
            text: cleaned,
        });
        self.stats.emitted += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Prose line of exactly 60 characters containing a normative marker
    fn sentence() -> String {
        let base = "수행사는 과업을 성실하게 수행하여야 한다 ";
        format!("{base}{}", "가".repeat(60 - base.chars().count()))
    }

    fn paragraph(lines: usize) -> Vec<String> {
        (0..lines).map(|_| sentence()).collect()
    }

    fn defaults() -> (SegmenterConfig, TextCleaner) {
        let config = SegmenterConfig::default();
        let cleaner = TextCleaner::new(&config, crate::lexicon::Lexicon::korean_rfp());
        (config, cleaner)
    }

    #[test]
    fn test_builder_tracks_pages_and_chars() {
        let mut builder = ChunkBuilder::new(3);
        builder.push("가나다", 3);
        builder.push("", 4);
        builder.push("라마", 5);
        assert_eq!(builder.page_start(), 3);
        assert_eq!(builder.page_end(), 5);
        assert_eq!(builder.char_count(), 5);
        assert_eq!(builder.text(), "가나다\n\n라마");
    }

    #[test]
    fn test_builder_table_tail() {
        let mut builder = ChunkBuilder::new(1);
        builder.push("| a | b |", 1);
        assert!(!builder.ends_in_table('|'));
        builder.push("| 1 | 2 |", 1);
        assert!(builder.ends_in_table('|'));
        builder.push("본문", 1);
        assert!(!builder.ends_in_table('|'));
    }

    #[test]
    fn test_state_transitions() {
        let (config, cleaner) = defaults();
        let mut buffer = ChunkBuffer::new(&config, &cleaner, "rfp.pdf");
        assert_eq!(buffer.state(), &BufferState::Empty);

        buffer.push_line(&sentence(), 1, None);
        assert!(matches!(buffer.state(), BufferState::Accumulating(_)));
    }

    #[test]
    fn test_boundary_flush_and_context() {
        let (config, cleaner) = defaults();
        let mut buffer = ChunkBuffer::new(&config, &cleaner, "rfp.pdf");

        buffer.push_line("사업 개요", 1, Some(Boundary::SectionTitle("사업 개요".into())));
        for line in paragraph(8) {
            buffer.push_line(&line, 1, None);
        }
        buffer.push_line("제3조 (목적)", 2, Some(Boundary::ClauseKey("제3조".into())));

        assert_eq!(buffer.chunks().len(), 1);
        let first = buffer.chunks().last().unwrap();
        assert_eq!(first.section_title.as_deref(), Some("사업 개요"));
        assert_eq!(first.clause_key, None);
        assert_eq!(first.chunk_id, "rfp__p0001-0001__00001");

        assert_eq!(
            buffer.context().current_section_title.as_deref(),
            Some("사업 개요")
        );
        assert_eq!(buffer.context().current_clause_key.as_deref(), Some("제3조"));
    }

    #[test]
    fn test_short_flush_merges_into_previous() {
        let (config, cleaner) = defaults();
        let mut buffer = ChunkBuffer::new(&config, &cleaner, "rfp.pdf");

        for line in paragraph(10) {
            buffer.push_line(&line, 1, None);
        }
        buffer.push_line("1. 제출", 2, Some(Boundary::NumberedItem("1.".into())));
        for line in paragraph(2) {
            buffer.push_line(&line, 3, None);
        }
        buffer.push_line("2. 평가", 4, Some(Boundary::NumberedItem("2.".into())));

        let (chunks, stats) = buffer.finish();
        // the trailing "2. 평가" line alone is too short and gets rejected
        assert_eq!(stats.merged, 1);
        let first = chunks.iter().next().unwrap();
        assert_eq!(first.page_start, 1);
        assert_eq!(first.page_end, 3);
        assert!(first.text.contains("1. 제출"));
        assert_eq!(first.clause_key, None);
    }

    #[test]
    fn test_forced_flush_never_merges() {
        let (config, cleaner) = defaults();
        let mut buffer = ChunkBuffer::new(&config, &cleaner, "rfp.pdf");

        for line in paragraph(10) {
            buffer.push_line(&line, 1, None);
        }
        buffer.push_line("1. 제출", 2, Some(Boundary::NumberedItem("1.".into())));
        buffer.push_line(&sentence(), 2, None);

        let (chunks, stats) = buffer.finish();
        assert_eq!(stats.merged, 0);
        assert_eq!(chunks.len(), 2);
        let last = chunks.last().unwrap();
        assert_eq!(last.clause_key.as_deref(), Some("1."));
        assert_eq!(last.chunk_id, "rfp__p0002-0002__00002");
    }

    #[test]
    fn test_rejected_block_is_discarded() {
        let (config, cleaner) = defaults();
        let mut buffer = ChunkBuffer::new(&config, &cleaner, "rfp.pdf");

        buffer.push_line("목차", 1, None);
        for n in 1..=10 {
            buffer.push_line(&format!("섹션명 ······· {n}"), 1, None);
        }
        buffer.push_line("사업 개요", 2, Some(Boundary::SectionTitle("사업 개요".into())));

        assert!(buffer.chunks().is_empty());
        let (_, stats) = buffer.finish();
        assert_eq!(stats.rejected_toc, 1);
    }

    #[test]
    fn test_boundary_suppressed_inside_table() {
        let (config, cleaner) = defaults();
        let mut buffer = ChunkBuffer::new(&config, &cleaner, "rfp.pdf");

        buffer.push_line("평가 기준", 1, Some(Boundary::SectionTitle("평가 기준".into())));
        buffer.push_line("| 항목 | 배점 |", 1, None);
        buffer.push_line("| --- | --- |", 1, None);
        buffer.push_line("1. 기술 | 80 |", 1, Some(Boundary::NumberedItem("1.".into())));

        assert_eq!(buffer.chunks().len(), 0);
        assert_eq!(buffer.context().current_clause_key, None);
        let (_, stats) = buffer.finish();
        assert_eq!(stats.suppressed_boundaries, 1);
    }

    #[test]
    fn test_overflow_forces_flush_at_trigger_point() {
        let (config, cleaner) = defaults();
        let mut buffer = ChunkBuffer::new(&config, &cleaner, "rfp.pdf");

        // 76 lines of 60 chars: the 76th line crosses 4500
        for line in paragraph(80) {
            buffer.push_line(&line, 1, None);
        }

        let (chunks, stats) = buffer.finish();
        assert_eq!(stats.overflows, 1);
        assert_eq!(chunks.len(), 2);
        let first = chunks.iter().next().unwrap();
        assert_eq!(first.text.lines().count(), 76);
        assert_eq!(chunks.last().unwrap().text.lines().count(), 4);
    }

    #[test]
    fn test_overflow_deferred_until_table_ends() {
        let (config, cleaner) = defaults();
        let mut buffer = ChunkBuffer::new(&config, &cleaner, "rfp.pdf");

        for line in paragraph(74) {
            buffer.push_line(&line, 1, None);
        }
        let rows: Vec<String> = (0..6)
            .map(|n| format!("| 평가 항목 {n} | 세부 기준을 충족하는지 확인 | {n}0점 |"))
            .collect();
        for row in &rows {
            buffer.push_line(row, 2, None);
        }
        assert!(buffer.chunks().is_empty());

        buffer.push_line(&sentence(), 3, None);
        assert_eq!(buffer.chunks().len(), 1);
        let first = buffer.chunks().last().unwrap();
        assert!(rows.iter().all(|row| first.text.contains(row.as_str())));
        assert_eq!(first.page_end, 2);
    }

    #[test]
    fn test_overflow_splits_tables_when_not_kept_intact() {
        let config = SegmenterConfig {
            keep_tables_intact: false,
            ..SegmenterConfig::default()
        };
        let cleaner = TextCleaner::new(&config, crate::lexicon::Lexicon::korean_rfp());
        let mut buffer = ChunkBuffer::new(&config, &cleaner, "rfp.pdf");

        for line in paragraph(74) {
            buffer.push_line(&line, 1, None);
        }
        for n in 0..6 {
            buffer.push_line(&format!("| 평가 항목 {n} | 세부 기준을 충족하는지 확인 | {n}0점 |"), 2, None);
        }
        assert_eq!(buffer.chunks().len(), 1);
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        let (config, cleaner) = defaults();
        let buffer = ChunkBuffer::new(&config, &cleaner, "rfp.pdf");
        let (chunks, stats) = buffer.finish();
        assert!(chunks.is_empty());
        assert_eq!(stats, FlushStats::default());
    }
}
