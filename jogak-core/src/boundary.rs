//! Boundary detection
//!
//! Each line is run through an ordered list of [`BoundaryRule`]s; the first
//! rule that matches decides the [`Boundary`]. The order is significant:
//! numbered list items are far denser than real section breaks and sit last
//! so they never shadow clause markers.

use crate::error::{Error, Result};
use crate::lexicon::Lexicon;
use regex::Regex;

/// A structural break detected on a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Boundary {
    /// Canonical section heading, e.g. `사업 개요`
    SectionTitle(String),
    /// Clause marker with whitespace removed, e.g. `제3조`
    ClauseKey(String),
    /// Appendix/attachment word, e.g. `별첨`
    AppendixMarker(String),
    /// List marker with whitespace removed, e.g. `1)`, `1-1`, `①`
    NumberedItem(String),
}

impl Boundary {
    /// Kind of this boundary
    pub fn kind(&self) -> BoundaryKind {
        match self {
            Boundary::SectionTitle(_) => BoundaryKind::SectionTitle,
            Boundary::ClauseKey(_) => BoundaryKind::ClauseKey,
            Boundary::AppendixMarker(_) => BoundaryKind::AppendixMarker,
            Boundary::NumberedItem(_) => BoundaryKind::NumberedItem,
        }
    }

    /// Matched title or key
    pub fn key(&self) -> &str {
        match self {
            Boundary::SectionTitle(key)
            | Boundary::ClauseKey(key)
            | Boundary::AppendixMarker(key)
            | Boundary::NumberedItem(key) => key,
        }
    }

    /// Whether this boundary opens a new section (as opposed to a clause)
    pub fn is_section(&self) -> bool {
        matches!(self, Boundary::SectionTitle(_))
    }
}

/// Boundary kinds in detection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// Whole-line section heading
    SectionTitle,
    /// `제N조` clause marker
    ClauseKey,
    /// Appendix/attachment marker
    AppendixMarker,
    /// Numbered or circled list item
    NumberedItem,
}

impl BoundaryKind {
    /// All kinds, highest priority first
    pub const PRIORITY: [BoundaryKind; 4] = [
        BoundaryKind::SectionTitle,
        BoundaryKind::ClauseKey,
        BoundaryKind::AppendixMarker,
        BoundaryKind::NumberedItem,
    ];
}

/// Section/clause context of the line currently being read
///
/// A section title resets the clause key; clause-level boundaries leave the
/// section alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryContext {
    /// Most recent section title
    pub current_section_title: Option<String>,
    /// Most recent clause, appendix or list key within the section
    pub current_clause_key: Option<String>,
}

impl BoundaryContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a detected boundary
    pub fn apply(&mut self, boundary: &Boundary) {
        match boundary {
            Boundary::SectionTitle(title) => {
                self.current_section_title = Some(title.clone());
                self.current_clause_key = None;
            }
            Boundary::ClauseKey(key) | Boundary::AppendixMarker(key) | Boundary::NumberedItem(key) => {
                self.current_clause_key = Some(key.clone());
            }
        }
    }
}

/// One pattern in the detection chain
#[derive(Debug, Clone)]
pub struct BoundaryRule {
    kind: BoundaryKind,
    pattern: Regex,
}

impl BoundaryRule {
    /// Kind produced by this rule
    pub fn kind(&self) -> BoundaryKind {
        self.kind
    }

    /// Source of the compiled pattern
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Try this rule against a trimmed line
    pub fn apply(&self, trimmed: &str) -> Option<Boundary> {
        let captures = self.pattern.captures(trimmed)?;
        let key = captures.name("key")?.as_str();

        Some(match self.kind {
            BoundaryKind::SectionTitle => Boundary::SectionTitle(key.to_string()),
            BoundaryKind::ClauseKey => Boundary::ClauseKey(strip_whitespace(key)),
            BoundaryKind::AppendixMarker => Boundary::AppendixMarker(key.to_string()),
            BoundaryKind::NumberedItem => Boundary::NumberedItem(strip_whitespace(key)),
        })
    }
}

/// Line classifier built from a [`Lexicon`]
#[derive(Debug, Clone)]
pub struct BoundaryDetector {
    rules: Vec<BoundaryRule>,
}

impl Default for BoundaryDetector {
    fn default() -> Self {
        Self::korean_rfp()
    }
}

impl BoundaryDetector {
    /// Detector for the embedded Korean RFP lexicon
    pub fn korean_rfp() -> Self {
        Self::from_lexicon(Lexicon::korean_rfp())
            .expect("embedded Korean RFP lexicon compiles to valid patterns")
    }

    /// Compile the detection chain for a lexicon
    pub fn from_lexicon(lexicon: &Lexicon) -> Result<Self> {
        let rules = vec![
            BoundaryRule {
                kind: BoundaryKind::SectionTitle,
                pattern: compile(&section_pattern(lexicon))?,
            },
            BoundaryRule {
                kind: BoundaryKind::ClauseKey,
                pattern: compile(&clause_pattern(lexicon))?,
            },
            BoundaryRule {
                kind: BoundaryKind::AppendixMarker,
                pattern: compile(&appendix_pattern(lexicon))?,
            },
            BoundaryRule {
                kind: BoundaryKind::NumberedItem,
                pattern: compile(&numbered_pattern(lexicon))?,
            },
        ];

        Ok(Self { rules })
    }

    /// Rules in priority order
    pub fn rules(&self) -> &[BoundaryRule] {
        &self.rules
    }

    /// Classify a normalized line
    pub fn detect(&self, line: &str) -> Option<Boundary> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.rules.iter().find_map(|rule| rule.apply(trimmed))
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Lexicon(format!("invalid pattern {pattern:?}: {e}")))
}

/// `사업 개요` becomes `사업\s*개요`
fn phrase_pattern(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s*")
}

fn alternation<S: AsRef<str>>(items: &[S], render: impl Fn(&str) -> String) -> String {
    items
        .iter()
        .map(|item| render(item.as_ref()))
        .collect::<Vec<_>>()
        .join("|")
}

fn section_pattern(lexicon: &Lexicon) -> String {
    let marker = regex::escape(&lexicon.heading_marker().to_string());
    format!(
        r"^(?:{marker}+\s*)?(?P<key>{})\s*$",
        alternation(lexicon.section_phrases(), phrase_pattern)
    )
}

fn clause_pattern(lexicon: &Lexicon) -> String {
    format!(
        r"^(?P<key>{}\s*\d+\s*{})\b",
        regex::escape(lexicon.clause_prefix()),
        regex::escape(lexicon.clause_suffix())
    )
}

fn appendix_pattern(lexicon: &Lexicon) -> String {
    format!(
        r"^(?P<key>{})\b",
        alternation(lexicon.appendix_words(), regex::escape)
    )
}

fn numbered_pattern(lexicon: &Lexicon) -> String {
    let circled: String = lexicon
        .circled_numerals()
        .iter()
        .map(|ch| regex::escape(&ch.to_string()))
        .collect();

    let mut alternatives = vec![r"\(?\d+\)?[.)]".to_string(), r"\d+\s*-\s*\d+".to_string()];
    if !circled.is_empty() {
        alternatives.push(format!("[{circled}]"));
    }

    format!(r"^(?P<key>{})\s+", alternatives.join("|"))
}

fn strip_whitespace(key: &str) -> String {
    key.chars().filter(|c| !c.is_whitespace()).collect()
}
