//! Finalized chunks and the per-document emission sequence

use std::path::Path;

/// Page number as reported by the upstream parser
pub type PageNumber = u32;

/// A finalized, retrievable unit of document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Source document this chunk was cut from
    pub source_document_id: String,
    /// Unique, emission-ordered identifier within the document
    pub chunk_id: String,
    /// Section in effect when the chunk was flushed
    pub section_title: Option<String>,
    /// Clause in effect when the chunk was flushed
    pub clause_key: Option<String>,
    /// First page contributing text
    pub page_start: PageNumber,
    /// Last page contributing text
    pub page_end: PageNumber,
    /// Cleaned text
    pub text: String,
}

impl Chunk {
    /// Length of the text in characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Child chunk produced by soft splitting, numbered from 1
    pub fn child(&self, index: usize, text: String) -> Chunk {
        Chunk {
            source_document_id: self.source_document_id.clone(),
            chunk_id: sub_chunk_id(&self.chunk_id, index),
            section_title: self.section_title.clone(),
            clause_key: self.clause_key.clone(),
            page_start: self.page_start,
            page_end: self.page_end,
            text,
        }
    }
}

/// File stem of a source document id (`RFP_2024.pdf` -> `RFP_2024`)
pub fn document_stem(source_document_id: &str) -> &str {
    Path::new(source_document_id)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(source_document_id)
}

/// Build a chunk id: `{stem}__p{start:04}-{end:04}__{seq:05}`
pub fn chunk_id(stem: &str, page_start: PageNumber, page_end: PageNumber, sequence: usize) -> String {
    format!("{stem}__p{page_start:04}-{page_end:04}__{sequence:05}")
}

/// Build a soft-split child id: `{parent}__s{index:02}`
pub fn sub_chunk_id(parent_id: &str, index: usize) -> String {
    format!("{parent_id}__s{index:02}")
}

/// Append-only list of emitted chunks
///
/// The only mutation besides [`push`](Self::push) is
/// [`amend_last`](Self::amend_last), used when a short flush is merged into
/// the chunk emitted just before it. Once a newer chunk is pushed the earlier
/// ones can no longer be reached mutably.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSequence {
    chunks: Vec<Chunk>,
}

impl ChunkSequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next pushed chunk will carry (1-based)
    pub fn next_sequence(&self) -> usize {
        self.chunks.len() + 1
    }

    /// Append a newly emitted chunk
    pub fn push(&mut self, chunk: Chunk) {
        self.chunks.push(chunk);
    }

    /// Merge text into the most recently emitted chunk
    ///
    /// The text is joined with a blank line and the page range is widened to
    /// cover `page_end`. Section and clause are left untouched. Returns
    /// `false` when nothing has been emitted yet.
    pub fn amend_last(&mut self, text: &str, page_end: PageNumber) -> bool {
        let Some(last) = self.chunks.last_mut() else {
            return false;
        };

        let merged = format!("{}\n\n{}", last.text.trim_end(), text);
        last.text = merged.trim().to_string();
        last.page_end = last.page_end.max(page_end);
        true
    }

    /// Most recently emitted chunk
    pub fn last(&self) -> Option<&Chunk> {
        self.chunks.last()
    }

    /// Number of chunks emitted
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether nothing has been emitted
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterate over emitted chunks in order
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    /// Take the emitted chunks
    pub fn into_vec(self) -> Vec<Chunk> {
        self.chunks
    }
}

impl IntoIterator for ChunkSequence {
    type Item = Chunk;
    type IntoIter = std::vec::IntoIter<Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, text: &str, page_start: PageNumber, page_end: PageNumber) -> Chunk {
        Chunk {
            source_document_id: "rfp.pdf".to_string(),
            chunk_id: id.to_string(),
            section_title: Some("사업 개요".to_string()),
            clause_key: Some("제1조".to_string()),
            page_start,
            page_end,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_chunk_id_format() {
        assert_eq!(chunk_id("rfp", 3, 12, 7), "rfp__p0003-0012__00007");
        assert_eq!(sub_chunk_id("rfp__p0003-0012__00007", 2), "rfp__p0003-0012__00007__s02");
    }

    #[test]
    fn test_document_stem() {
        assert_eq!(document_stem("RFP_2024.pdf"), "RFP_2024");
        assert_eq!(document_stem("dir/공고문.pdf"), "공고문");
        assert_eq!(document_stem("plain"), "plain");
    }

    #[test]
    fn test_amend_last_requires_previous_chunk() {
        let mut sequence = ChunkSequence::new();
        assert!(!sequence.amend_last("추가", 2));
        assert!(sequence.is_empty());
    }

    #[test]
    fn test_amend_last_merges_text_and_pages() {
        let mut sequence = ChunkSequence::new();
        sequence.push(chunk("a", "본문  \n", 1, 2));
        assert!(sequence.amend_last("추가 내용", 4));

        let last = sequence.last().unwrap();
        assert_eq!(last.text, "본문\n\n추가 내용");
        assert_eq!(last.page_start, 1);
        assert_eq!(last.page_end, 4);
        assert_eq!(last.section_title.as_deref(), Some("사업 개요"));
        assert_eq!(last.clause_key.as_deref(), Some("제1조"));
    }

    #[test]
    fn test_amend_last_never_lowers_page_end() {
        let mut sequence = ChunkSequence::new();
        sequence.push(chunk("a", "본문", 3, 5));
        sequence.amend_last("추가", 4);
        assert_eq!(sequence.last().unwrap().page_end, 5);
    }

    #[test]
    fn test_next_sequence() {
        let mut sequence = ChunkSequence::new();
        assert_eq!(sequence.next_sequence(), 1);
        sequence.push(chunk("a", "본문", 1, 1));
        assert_eq!(sequence.next_sequence(), 2);
    }

    #[test]
    fn test_child_inherits_metadata() {
        let parent = chunk("rfp__p0001-0002__00001", "본문", 1, 2);
        let child = parent.child(1, "조각".to_string());
        assert_eq!(child.chunk_id, "rfp__p0001-0002__00001__s01");
        assert_eq!(child.section_title, parent.section_title);
        assert_eq!(child.clause_key, parent.clause_key);
        assert_eq!((child.page_start, child.page_end), (1, 2));
        assert_eq!(child.char_count(), 2);
    }
}
