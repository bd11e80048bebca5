//! Segmentation configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default configuration constants
pub mod defaults {
    /// Buffer size (in characters) that forces a flush, and above which a
    /// finalized chunk is soft-split
    pub const HARD_CEILING_CHARS: usize = 4500;

    /// Cleaned blocks shorter than this are merged into the previous chunk
    pub const MIN_CHUNK_CHARS: usize = 400;

    /// Target size of the pieces produced by soft splitting
    pub const SOFT_CEILING_CHARS: usize = 2200;

    /// Share of filler-dot lines above which a block looks like a table of contents
    pub const TOC_DOT_RATIO_THRESHOLD: f64 = 0.35;

    /// Share of digit-bearing lines above which a block looks like a table of contents
    pub const TOC_DIGIT_RATIO_THRESHOLD: f64 = 0.70;

    /// Lines at least this long (and free of filler dots) count as prose
    pub const LONG_LINE_CHARS: usize = 25;

    /// Blocks with at least this many prose lines are never treated as a table of contents
    pub const MIN_LONG_LINES: usize = 3;

    /// Minimum cleaned length while segmenting documents
    pub const MIN_CLEAN_TEXT_CHARS: usize = 50;

    /// Minimum cleaned length when re-cleaning already emitted chunks
    pub const MIN_CLEAN_TEXT_CHARS_POST_CLEAN: usize = 200;

    /// Column delimiter marking table rows
    pub const COLUMN_DELIMITER: char = '|';
}

/// Pipeline stage a cleaning pass runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleaningStage {
    /// Gate applied to every buffer flush
    #[default]
    Segmentation,
    /// Stricter second pass over finished chunk files
    PostClean,
}

impl CleaningStage {
    /// Default minimum cleaned text length for this stage
    pub fn min_clean_text_chars(self) -> usize {
        match self {
            CleaningStage::Segmentation => defaults::MIN_CLEAN_TEXT_CHARS,
            CleaningStage::PostClean => defaults::MIN_CLEAN_TEXT_CHARS_POST_CLEAN,
        }
    }
}

/// Thresholds that drive buffering, cleaning and splitting
///
/// Deserializes from the `[segmentation]` table of `jogak.toml`; any field
/// left out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SegmenterConfig {
    /// Overflow threshold for the line buffer and soft-split trigger
    pub hard_ceiling_chars: usize,
    /// Merge threshold for short flushes
    pub min_chunk_chars: usize,
    /// Target size of soft-split pieces
    pub soft_ceiling_chars: usize,
    /// Filler-dot line ratio for table-of-contents rejection
    pub toc_dot_ratio_threshold: f64,
    /// Digit line ratio for table-of-contents rejection
    pub toc_digit_ratio_threshold: f64,
    /// Length at which a line counts as prose
    pub long_line_chars: usize,
    /// Prose lines needed to escape table-of-contents rejection
    pub min_long_lines: usize,
    /// Minimum length of cleaned text
    pub min_clean_text_chars: usize,
    /// Reject cleaned text containing no normative marker
    pub require_normative_marker: bool,
    /// Column delimiter marking table rows
    pub column_delimiter: char,
    /// Postpone overflow flushes until a table run ends
    pub keep_tables_intact: bool,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            hard_ceiling_chars: defaults::HARD_CEILING_CHARS,
            min_chunk_chars: defaults::MIN_CHUNK_CHARS,
            soft_ceiling_chars: defaults::SOFT_CEILING_CHARS,
            toc_dot_ratio_threshold: defaults::TOC_DOT_RATIO_THRESHOLD,
            toc_digit_ratio_threshold: defaults::TOC_DIGIT_RATIO_THRESHOLD,
            long_line_chars: defaults::LONG_LINE_CHARS,
            min_long_lines: defaults::MIN_LONG_LINES,
            min_clean_text_chars: defaults::MIN_CLEAN_TEXT_CHARS,
            require_normative_marker: true,
            column_delimiter: defaults::COLUMN_DELIMITER,
            keep_tables_intact: true,
        }
    }
}

impl SegmenterConfig {
    /// Create a configuration builder
    pub fn builder() -> SegmenterConfigBuilder {
        SegmenterConfigBuilder::default()
    }

    /// Configuration for the second cleaning pass over emitted chunks
    pub fn post_clean() -> Self {
        Self {
            min_clean_text_chars: CleaningStage::PostClean.min_clean_text_chars(),
            ..Self::default()
        }
    }

    /// Configuration tuned for a pipeline stage
    pub fn for_stage(stage: CleaningStage) -> Self {
        match stage {
            CleaningStage::Segmentation => Self::default(),
            CleaningStage::PostClean => Self::post_clean(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.hard_ceiling_chars == 0 {
            return Err(Error::Configuration(
                "hard_ceiling_chars must be greater than 0".into(),
            ));
        }

        if self.soft_ceiling_chars == 0 {
            return Err(Error::Configuration(
                "soft_ceiling_chars must be greater than 0".into(),
            ));
        }

        if self.soft_ceiling_chars > self.hard_ceiling_chars {
            return Err(Error::Configuration(format!(
                "soft_ceiling_chars ({}) must not exceed hard_ceiling_chars ({})",
                self.soft_ceiling_chars, self.hard_ceiling_chars
            )));
        }

        if self.min_chunk_chars >= self.hard_ceiling_chars {
            return Err(Error::Configuration(format!(
                "min_chunk_chars ({}) must be below hard_ceiling_chars ({})",
                self.min_chunk_chars, self.hard_ceiling_chars
            )));
        }

        for (name, ratio) in [
            ("toc_dot_ratio_threshold", self.toc_dot_ratio_threshold),
            ("toc_digit_ratio_threshold", self.toc_digit_ratio_threshold),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(Error::Configuration(format!(
                    "{name} must be in (0, 1], got {ratio}"
                )));
            }
        }

        if self.column_delimiter.is_whitespace() {
            return Err(Error::Configuration(
                "column_delimiter must not be whitespace".into(),
            ));
        }

        Ok(())
    }
}

/// Fluent builder for [`SegmenterConfig`]
#[derive(Debug, Default)]
pub struct SegmenterConfigBuilder {
    config: SegmenterConfig,
}

impl SegmenterConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hard ceiling in characters
    pub fn hard_ceiling_chars(mut self, chars: usize) -> Self {
        self.config.hard_ceiling_chars = chars;
        self
    }

    /// Set the short-chunk merge threshold in characters
    pub fn min_chunk_chars(mut self, chars: usize) -> Self {
        self.config.min_chunk_chars = chars;
        self
    }

    /// Set the soft-split target in characters
    pub fn soft_ceiling_chars(mut self, chars: usize) -> Self {
        self.config.soft_ceiling_chars = chars;
        self
    }

    /// Set the filler-dot ratio for table-of-contents rejection
    pub fn toc_dot_ratio_threshold(mut self, ratio: f64) -> Self {
        self.config.toc_dot_ratio_threshold = ratio;
        self
    }

    /// Set the digit ratio for table-of-contents rejection
    pub fn toc_digit_ratio_threshold(mut self, ratio: f64) -> Self {
        self.config.toc_digit_ratio_threshold = ratio;
        self
    }

    /// Set the minimum cleaned text length
    pub fn min_clean_text_chars(mut self, chars: usize) -> Self {
        self.config.min_clean_text_chars = chars;
        self
    }

    /// Use the minimum cleaned text length of a pipeline stage
    pub fn stage(mut self, stage: CleaningStage) -> Self {
        self.config.min_clean_text_chars = stage.min_clean_text_chars();
        self
    }

    /// Require (or not) a normative marker in cleaned text
    pub fn require_normative_marker(mut self, required: bool) -> Self {
        self.config.require_normative_marker = required;
        self
    }

    /// Set the column delimiter
    pub fn column_delimiter(mut self, delimiter: char) -> Self {
        self.config.column_delimiter = delimiter;
        self
    }

    /// Postpone overflow flushes inside table runs
    pub fn keep_tables_intact(mut self, keep: bool) -> Self {
        self.config.keep_tables_intact = keep;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<SegmenterConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
