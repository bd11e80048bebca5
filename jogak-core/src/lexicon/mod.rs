//! Fixed vocabulary behind boundary detection and text cleaning
//!
//! A lexicon is loaded from TOML. The Korean RFP lexicon ships embedded in
//! the crate; custom lexicons can be loaded from a file or string.

mod schema;

pub use schema::LexiconFile;

use crate::error::{Error, Result};
use std::path::Path;
use std::sync::LazyLock;

/// Embedded lexicon for Korean public procurement RFPs
const KOREAN_RFP_TOML: &str = include_str!("../../lexicons/korean_rfp.toml");

static KOREAN_RFP: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::from_toml_str(KOREAN_RFP_TOML).expect("embedded Korean RFP lexicon is valid")
});

/// Validated vocabulary used by the detector and cleaner
#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    code: String,
    name: String,
    heading_marker: char,
    section_phrases: Vec<String>,
    clause_prefix: String,
    clause_suffix: String,
    appendix_words: Vec<String>,
    circled_numerals: Vec<char>,
    toc_markers: Vec<String>,
    filler_dot: char,
    decorative_chars: Vec<char>,
    normative_markers: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::korean_rfp().clone()
    }
}

impl Lexicon {
    /// The embedded Korean RFP lexicon
    pub fn korean_rfp() -> &'static Lexicon {
        &KOREAN_RFP
    }

    /// TOML source of the embedded Korean RFP lexicon
    pub fn korean_rfp_toml() -> &'static str {
        KOREAN_RFP_TOML
    }

    /// Parse and validate a lexicon from TOML text
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let file: LexiconFile = toml::from_str(toml_str)?;
        Self::from_file_schema(file)
    }

    /// Load a lexicon from a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Validate a parsed lexicon file
    pub fn from_file_schema(file: LexiconFile) -> Result<Self> {
        if file.metadata.code.trim().is_empty() {
            return Err(Error::Lexicon("metadata.code must not be empty".into()));
        }

        let section_phrases = non_empty_entries("sections.phrases", file.sections.phrases)?;
        let appendix_words = non_empty_entries("appendix.words", file.appendix.words)?;
        let toc_markers = non_empty_entries("toc.markers", file.toc.markers)?;
        let normative_markers = non_empty_entries("normative.markers", file.normative.markers)?;

        if file.clauses.prefix.trim().is_empty() || file.clauses.suffix.trim().is_empty() {
            return Err(Error::Lexicon(
                "clauses.prefix and clauses.suffix must not be empty".into(),
            ));
        }

        if file.filler.dot.is_whitespace() {
            return Err(Error::Lexicon("filler.dot must not be whitespace".into()));
        }

        if file.filler.decorative.is_empty() {
            return Err(Error::Lexicon(
                "filler.decorative must list at least one character".into(),
            ));
        }

        Ok(Self {
            code: file.metadata.code,
            name: file.metadata.name,
            heading_marker: file.sections.heading_marker,
            section_phrases,
            clause_prefix: file.clauses.prefix.trim().to_string(),
            clause_suffix: file.clauses.suffix.trim().to_string(),
            appendix_words,
            circled_numerals: file.numbering.circled,
            toc_markers,
            filler_dot: file.filler.dot,
            decorative_chars: file.filler.decorative,
            normative_markers,
        })
    }

    /// Lexicon code, e.g. `ko-rfp`
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human readable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Character that may prefix a heading (`#` in markdown output)
    pub fn heading_marker(&self) -> char {
        self.heading_marker
    }

    /// Canonical section phrases, tokens separated by single spaces
    pub fn section_phrases(&self) -> &[String] {
        &self.section_phrases
    }

    /// Clause marker prefix (`제`)
    pub fn clause_prefix(&self) -> &str {
        &self.clause_prefix
    }

    /// Clause marker suffix (`조`)
    pub fn clause_suffix(&self) -> &str {
        &self.clause_suffix
    }

    /// Appendix/attachment words
    pub fn appendix_words(&self) -> &[String] {
        &self.appendix_words
    }

    /// Circled numerals accepted as list markers
    pub fn circled_numerals(&self) -> &[char] {
        &self.circled_numerals
    }

    /// Words marking a table of contents
    pub fn toc_markers(&self) -> &[String] {
        &self.toc_markers
    }

    /// Leader character of dotted TOC lines
    pub fn filler_dot(&self) -> char {
        self.filler_dot
    }

    /// Characters that make up ornamental lines
    pub fn decorative_chars(&self) -> &[char] {
        &self.decorative_chars
    }

    /// Normative vocabulary required in cleaned text
    pub fn normative_markers(&self) -> &[String] {
        &self.normative_markers
    }
}

fn non_empty_entries(field: &str, entries: Vec<String>) -> Result<Vec<String>> {
    let entries: Vec<String> = entries
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect();

    if entries.is_empty() {
        return Err(Error::Lexicon(format!("{field} must not be empty")));
    }

    Ok(entries)
}
