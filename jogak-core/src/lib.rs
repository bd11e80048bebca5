//! Boundary-aware segmentation of page-structured procurement documents
//!
//! `jogak-core` turns the page list produced by a document parser into
//! retrieval-sized chunks carrying section, clause and page metadata.
//!
//! # Pipeline
//!
//! - [`normalize`]: trailing-whitespace trimming per line
//! - [`boundary`]: ordered rules classifying section titles, clauses,
//!   appendices and numbered items
//! - [`cleaner`]: decorative-line stripping and table-of-contents rejection
//! - [`buffer`]: the line buffering state machine (flush, merge, overflow)
//! - [`splitter`]: sentence and block aligned splitting of oversized chunks
//! - [`writer`]: JSON Lines records for the indexing stage
//!
//! # Example
//!
//! ```rust
//! use jogak_core::{Document, Page, Segmenter};
//!
//! let body = "수행사는 발주기관이 제시한 기준에 따라 과업을 수행하여야 한다.\n".repeat(12);
//! let document = Document::new(
//!     "공고문.pdf",
//!     vec![Page::new(1, format!("사업 개요\n{body}"))],
//! );
//!
//! let output = Segmenter::new().segment(&document);
//! assert_eq!(output.chunks.len(), 1);
//! assert_eq!(output.chunks[0].section_title.as_deref(), Some("사업 개요"));
//! assert_eq!(output.chunks[0].chunk_id, "공고문__p0001-0001__00001");
//! ```

pub mod boundary;
pub mod buffer;
pub mod chunk;
pub mod cleaner;
pub mod config;
pub mod document;
pub mod error;
pub mod lexicon;
pub mod normalize;
pub mod segmenter;
pub mod splitter;
pub mod writer;

pub use boundary::{Boundary, BoundaryContext, BoundaryDetector, BoundaryKind};
pub use buffer::{ChunkBuffer, FlushStats};
pub use chunk::{Chunk, ChunkSequence, PageNumber};
pub use cleaner::{Rejection, TextCleaner};
pub use config::{CleaningStage, SegmenterConfig, SegmenterConfigBuilder};
pub use document::{Document, Page};
pub use error::{Error, Result};
pub use lexicon::Lexicon;
pub use segmenter::{SegmentationOutput, SegmentationStats, Segmenter};
pub use splitter::SoftSplitter;
pub use writer::{read_records, ChunkRecord, ChunkWriter, RecordMetadata};
