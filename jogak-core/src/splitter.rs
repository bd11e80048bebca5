//! Secondary splitting of oversized chunks
//!
//! A chunk that is still longer than the hard ceiling after buffering is cut
//! into children of at most the soft ceiling. Runs of table rows stay whole;
//! the prose around them is cut at sentence ends.

use crate::chunk::Chunk;
use crate::config::SegmenterConfig;
use crate::normalize::is_table_row;
use regex::Regex;
use std::sync::LazyLock;

/// Sentence-final punctuation, or the declarative `다.` ending, then whitespace
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<end>[.?!]|다\.)\s+").expect("valid sentence pattern"));

/// Splits oversized chunks into sentence or block aligned children
#[derive(Debug, Clone)]
pub struct SoftSplitter {
    hard_ceiling_chars: usize,
    soft_ceiling_chars: usize,
    column_delimiter: char,
}

impl Default for SoftSplitter {
    fn default() -> Self {
        Self::new(&SegmenterConfig::default())
    }
}

impl SoftSplitter {
    /// Create a splitter from the configured ceilings
    pub fn new(config: &SegmenterConfig) -> Self {
        Self {
            hard_ceiling_chars: config.hard_ceiling_chars,
            soft_ceiling_chars: config.soft_ceiling_chars,
            column_delimiter: config.column_delimiter,
        }
    }

    /// Split every oversized chunk, keeping order
    pub fn split_all(&self, chunks: impl IntoIterator<Item = Chunk>) -> Vec<Chunk> {
        chunks
            .into_iter()
            .flat_map(|chunk| self.split(chunk))
            .collect()
    }

    /// Replace one chunk by its children, or return it unchanged
    pub fn split(&self, chunk: Chunk) -> Vec<Chunk> {
        if chunk.char_count() <= self.hard_ceiling_chars {
            return vec![chunk];
        }

        self.split_text(&chunk.text)
            .into_iter()
            .enumerate()
            .map(|(idx, text)| chunk.child(idx + 1, text))
            .collect()
    }

    /// Cut text into pieces of at most the soft ceiling
    ///
    /// Each run of consecutive table rows is one unit; prose between the runs
    /// is cut at sentence ends. A table run longer than the ceiling is
    /// emitted as a piece of its own.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let mut pieces = Pieces::new(self.soft_ceiling_chars);

        for segment in self.segments(text) {
            match segment {
                Segment::Table(rows) => pieces.push(&rows.join("\n"), PieceKind::Table),
                Segment::Prose(lines) => {
                    let prose = lines.join("\n");
                    for sentence in sentences(&prose) {
                        for part in cut_long_sentence(sentence, self.soft_ceiling_chars) {
                            pieces.push(part, PieceKind::Sentence);
                        }
                    }
                }
            }
        }

        pieces.finish()
    }

    /// Group lines into alternating prose and table runs
    fn segments<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let mut segments: Vec<Segment<'t>> = Vec::new();

        for line in text.lines().map(str::trim) {
            if line.is_empty() {
                continue;
            }
            let table = is_table_row(line, self.column_delimiter);
            let extends_last = matches!(
                (segments.last(), table),
                (Some(Segment::Table(_)), true) | (Some(Segment::Prose(_)), false)
            );

            if extends_last {
                if let Some(Segment::Table(lines) | Segment::Prose(lines)) = segments.last_mut() {
                    lines.push(line);
                }
            } else if table {
                segments.push(Segment::Table(vec![line]));
            } else {
                segments.push(Segment::Prose(vec![line]));
            }
        }

        segments
    }
}

/// A run of lines of one kind
enum Segment<'t> {
    Prose(Vec<&'t str>),
    Table(Vec<&'t str>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PieceKind {
    Sentence,
    Table,
}

/// Accumulator for split output
struct Pieces {
    max_chars: usize,
    out: Vec<String>,
    buf: String,
    buf_chars: usize,
    last: Option<PieceKind>,
}

impl Pieces {
    fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            out: Vec::new(),
            buf: String::new(),
            buf_chars: 0,
            last: None,
        }
    }

    /// Sentences join with a space; anything next to a table with a blank line
    fn separator(&self, kind: PieceKind) -> &'static str {
        match (self.last, kind) {
            (None, _) => "",
            (Some(PieceKind::Sentence), PieceKind::Sentence) => " ",
            _ => "\n\n",
        }
    }

    fn push(&mut self, text: &str, kind: PieceKind) {
        let chars = text.chars().count();
        if self.buf_chars + self.separator(kind).chars().count() + chars > self.max_chars {
            self.flush();
        }

        let separator = self.separator(kind);
        self.buf.push_str(separator);
        self.buf.push_str(text);
        self.buf_chars += separator.chars().count() + chars;
        self.last = Some(kind);
    }

    fn flush(&mut self) {
        let piece = self.buf.trim();
        if !piece.is_empty() {
            self.out.push(piece.to_string());
        }
        self.buf.clear();
        self.buf_chars = 0;
        self.last = None;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.out
    }
}

/// Split a prose block after each sentence terminator
///
/// The terminator stays with its sentence, the whitespace after it is
/// dropped, and text after the last terminator forms a final sentence.
fn sentences(block: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;

    for caps in SENTENCE_END.captures_iter(block) {
        let (Some(end), Some(whole)) = (caps.name("end"), caps.get(0)) else {
            continue;
        };
        out.push(&block[start..end.end()]);
        start = whole.end();
    }

    let rest = block[start..].trim();
    if !rest.is_empty() {
        out.push(rest);
    }

    out
}

/// Cut a sentence longer than `max_chars` at the last whitespace before the
/// limit, or at the limit itself when there is none
fn cut_long_sentence(sentence: &str, max_chars: usize) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = sentence.trim();

    while rest.chars().count() > max_chars {
        let limit = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(idx, _)| idx);
        let cut = rest[..limit]
            .rfind(char::is_whitespace)
            .filter(|&idx| idx > 0)
            .unwrap_or(limit);

        out.push(rest[..cut].trim_end());
        rest = rest[cut..].trim_start();
    }

    if !rest.is_empty() {
        out.push(rest);
    }

    out
}
