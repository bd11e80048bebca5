//! TOML schema for lexicon files

use serde::{Deserialize, Serialize};

/// Root lexicon file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LexiconFile {
    pub metadata: Metadata,
    pub sections: Sections,
    pub clauses: Clauses,
    pub appendix: Appendix,
    #[serde(default)]
    pub numbering: Numbering,
    pub toc: Toc,
    pub filler: Filler,
    pub normative: Normative,
}

/// Lexicon metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sections {
    #[serde(default = "default_heading_marker")]
    pub heading_marker: char,
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clauses {
    pub prefix: String,
    pub suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appendix {
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Numbering {
    #[serde(default)]
    pub circled: Vec<char>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toc {
    pub markers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filler {
    pub dot: char,
    pub decorative: Vec<char>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Normative {
    pub markers: Vec<String>,
}

fn default_heading_marker() -> char {
    '#'
}
