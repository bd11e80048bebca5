//! Per-document segmentation entry point

use crate::boundary::BoundaryDetector;
use crate::buffer::{ChunkBuffer, FlushStats};
use crate::chunk::Chunk;
use crate::cleaner::TextCleaner;
use crate::config::SegmenterConfig;
use crate::document::Document;
use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::normalize::normalized_lines;
use crate::splitter::SoftSplitter;
use log::debug;
use std::time::{Duration, Instant};

/// Segments documents into chunks
///
/// A `Segmenter` holds only immutable configuration; every call to
/// [`segment`](Self::segment) owns its own buffer and context, so one
/// segmenter can be shared across threads.
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmenterConfig,
    lexicon: Lexicon,
    detector: BoundaryDetector,
    cleaner: TextCleaner,
    splitter: SoftSplitter,
}

/// Result of segmenting one document
#[derive(Debug, Clone)]
pub struct SegmentationOutput {
    /// Final chunks in emission order
    pub chunks: Vec<Chunk>,
    /// Counters for this document
    pub stats: SegmentationStats,
    /// Wall time spent segmenting
    pub duration: Duration,
}

/// Counters collected while segmenting one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentationStats {
    /// Pages in the document
    pub pages: usize,
    /// Pages skipped because they were blank
    pub blank_pages: usize,
    /// Lines fed to the buffer
    pub lines: usize,
    /// Flush outcomes
    pub flushes: FlushStats,
    /// Chunks replaced by soft-split children
    pub soft_split_parents: usize,
    /// Final chunk count
    pub chunks: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter {
    /// Segmenter with default thresholds and the Korean RFP lexicon
    pub fn new() -> Self {
        let config = SegmenterConfig::default();
        let lexicon = Lexicon::korean_rfp().clone();
        Self {
            detector: BoundaryDetector::korean_rfp(),
            cleaner: TextCleaner::new(&config, &lexicon),
            splitter: SoftSplitter::new(&config),
            config,
            lexicon,
        }
    }

    /// Segmenter with custom thresholds and the Korean RFP lexicon
    pub fn with_config(config: SegmenterConfig) -> Result<Self> {
        Self::with_lexicon(config, Lexicon::korean_rfp().clone())
    }

    /// Segmenter with custom thresholds and vocabulary
    pub fn with_lexicon(config: SegmenterConfig, lexicon: Lexicon) -> Result<Self> {
        config.validate()?;
        let detector = BoundaryDetector::from_lexicon(&lexicon)?;

        Ok(Self {
            detector,
            cleaner: TextCleaner::new(&config, &lexicon),
            splitter: SoftSplitter::new(&config),
            config,
            lexicon,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Active lexicon
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Segment a document into its final chunk sequence
    pub fn segment(&self, document: &Document) -> SegmentationOutput {
        let started = Instant::now();
        let mut stats = SegmentationStats {
            pages: document.pages().len(),
            ..SegmentationStats::default()
        };

        let mut buffer = ChunkBuffer::new(&self.config, &self.cleaner, document.source_document_id());

        for page in document.pages() {
            if page.is_blank() {
                stats.blank_pages += 1;
                continue;
            }

            for line in normalized_lines(&page.content) {
                stats.lines += 1;
                buffer.push_line(line, page.page_number, self.detector.detect(line));
            }
        }

        let (sequence, flushes) = buffer.finish();
        stats.flushes = flushes;
        stats.soft_split_parents = sequence
            .iter()
            .filter(|chunk| chunk.char_count() > self.config.hard_ceiling_chars)
            .count();

        let chunks = self.splitter.split_all(sequence);
        stats.chunks = chunks.len();

        let duration = started.elapsed();
        debug!(
            "{}: {} pages ({} blank), {} lines -> {} chunks ({} merged, {} rejected, {} soft-split) in {:?}",
            document.source_document_id(),
            stats.pages,
            stats.blank_pages,
            stats.lines,
            stats.chunks,
            stats.flushes.merged,
            stats.flushes.rejected,
            stats.soft_split_parents,
            duration
        );

        SegmentationOutput {
            chunks,
            stats,
            duration,
        }
    }
}
