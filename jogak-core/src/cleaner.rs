//! Noise filtering for flush candidates
//!
//! Two gates run in order. Decorative stripping drops ornamental lines.
//! Block rejection then discards tables of contents and fragments too thin to
//! be worth retrieving (running headers, page numbers, stray captions).

use crate::config::SegmenterConfig;
use crate::lexicon::Lexicon;
use std::fmt;

/// Why a block was discarded
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// Nothing left after stripping ornaments
    Empty,
    /// A TOC marker appears in the first lines
    TocMarker,
    /// Mostly dotted leader lines with little prose
    DotFiller {
        /// Share of lines containing the filler dot
        ratio: f64,
    },
    /// Mostly numeric lines with little prose
    DigitDense {
        /// Share of lines containing a digit
        ratio: f64,
    },
    /// Cleaned text is below the minimum length
    TooShort {
        /// Length in characters
        chars: usize,
        /// Required minimum
        min: usize,
    },
    /// No obligation/criteria/procedure vocabulary
    NoNormativeMarker,
}

impl Rejection {
    /// Whether the block was rejected as a table of contents
    pub fn is_table_of_contents(&self) -> bool {
        matches!(
            self,
            Rejection::TocMarker | Rejection::DotFiller { .. } | Rejection::DigitDense { .. }
        )
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => write!(f, "empty after decoration stripping"),
            Rejection::TocMarker => write!(f, "table of contents marker"),
            Rejection::DotFiller { ratio } => write!(f, "dot filler ratio {ratio:.2}"),
            Rejection::DigitDense { ratio } => write!(f, "digit line ratio {ratio:.2}"),
            Rejection::TooShort { chars, min } => write!(f, "too short ({chars} < {min} chars)"),
            Rejection::NoNormativeMarker => write!(f, "no normative marker"),
        }
    }
}

/// Applies decoration stripping and block rejection
#[derive(Debug, Clone)]
pub struct TextCleaner {
    toc_dot_ratio_threshold: f64,
    toc_digit_ratio_threshold: f64,
    long_line_chars: usize,
    min_long_lines: usize,
    min_clean_text_chars: usize,
    require_normative_marker: bool,
    toc_markers: Vec<String>,
    filler_dot: char,
    decorative_chars: Vec<char>,
    normative_markers: Vec<String>,
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new(&SegmenterConfig::default(), Lexicon::korean_rfp())
    }
}

impl TextCleaner {
    /// Create a cleaner from thresholds and vocabulary
    pub fn new(config: &SegmenterConfig, lexicon: &Lexicon) -> Self {
        Self {
            toc_dot_ratio_threshold: config.toc_dot_ratio_threshold,
            toc_digit_ratio_threshold: config.toc_digit_ratio_threshold,
            long_line_chars: config.long_line_chars,
            min_long_lines: config.min_long_lines,
            min_clean_text_chars: config.min_clean_text_chars,
            require_normative_marker: config.require_normative_marker,
            toc_markers: lexicon.toc_markers().to_vec(),
            filler_dot: lexicon.filler_dot(),
            decorative_chars: lexicon.decorative_chars().to_vec(),
            normative_markers: lexicon.normative_markers().to_vec(),
        }
    }

    /// Minimum cleaned length this cleaner enforces
    pub fn min_clean_text_chars(&self) -> usize {
        self.min_clean_text_chars
    }

    /// Run both gates; returns the cleaned text or the reason it was dropped
    pub fn clean(&self, text: &str) -> Result<String, Rejection> {
        let stripped = self.strip_decorative_lines(text);

        self.check_table_of_contents(&stripped)?;

        let chars = stripped.chars().count();
        if chars < self.min_clean_text_chars {
            return Err(Rejection::TooShort {
                chars,
                min: self.min_clean_text_chars,
            });
        }

        if self.require_normative_marker
            && !self
                .normative_markers
                .iter()
                .any(|marker| stripped.contains(marker.as_str()))
        {
            return Err(Rejection::NoNormativeMarker);
        }

        Ok(stripped)
    }

    /// Drop blank and ornamental lines, keep everything else verbatim
    pub fn strip_decorative_lines(&self, text: &str) -> String {
        text.lines()
            .filter(|line| !self.is_decorative(line.trim()))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    /// Whether a block has the shape of a table of contents
    pub fn is_table_of_contents(&self, text: &str) -> bool {
        self.check_table_of_contents(text).is_err()
    }

    fn is_decorative(&self, trimmed: &str) -> bool {
        trimmed
            .chars()
            .all(|ch| ch.is_whitespace() || self.decorative_chars.contains(&ch))
    }

    fn check_table_of_contents(&self, text: &str) -> Result<(), Rejection> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            return Err(Rejection::Empty);
        }

        let marked = lines.iter().take(3).any(|line| {
            self.toc_markers
                .iter()
                .any(|marker| line.contains(marker.as_str()))
        });
        if marked {
            return Err(Rejection::TocMarker);
        }

        let total = lines.len() as f64;
        let dot_lines = lines
            .iter()
            .filter(|line| line.contains(self.filler_dot))
            .count();
        let digit_lines = lines
            .iter()
            .filter(|line| line.chars().any(is_page_digit))
            .count();
        let long_lines = lines
            .iter()
            .filter(|line| {
                line.chars().count() >= self.long_line_chars && !line.contains(self.filler_dot)
            })
            .count();

        let prose_poor = long_lines < self.min_long_lines;

        let dot_ratio = dot_lines as f64 / total;
        if dot_ratio > self.toc_dot_ratio_threshold && prose_poor {
            return Err(Rejection::DotFiller { ratio: dot_ratio });
        }

        let digit_ratio = digit_lines as f64 / total;
        if digit_ratio > self.toc_digit_ratio_threshold && prose_poor {
            return Err(Rejection::DigitDense { ratio: digit_ratio });
        }

        Ok(())
    }
}

/// Digits that can stand for a page or item number
///
/// ASCII, full-width and circled ①-⑨. Roman numerals and vulgar fractions are
/// numeric in Unicode but never page numbers.
fn is_page_digit(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '\u{FF10}'..='\u{FF19}' | '\u{2460}'..='\u{2468}')
}
