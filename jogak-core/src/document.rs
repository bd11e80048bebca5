//! Page-structured documents from the upstream parser
//!
//! The parser writes a JSON array of pages:
//!
//! ```json
//! [{"page": 1, "content": "...", "metadata": {"source_pdf": "공고문.pdf"}}]
//! ```
//!
//! `page` falls back to `metadata.global_page`, then to 0. Pages are sorted
//! by page number; ties keep their input order.

use crate::chunk::PageNumber;
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Suffix the parser appends to its output file stems
pub const PARSED_SUFFIX: &str = "_parsed";

/// One page of a source document
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Ordering key
    pub page_number: PageNumber,
    /// Raw multi-line text, may be empty
    pub content: String,
    /// Opaque metadata carried through from the parser
    pub origin_metadata: Map<String, Value>,
}

impl Page {
    /// Create a page without metadata
    pub fn new(page_number: PageNumber, content: impl Into<String>) -> Self {
        Self {
            page_number,
            content: content.into(),
            origin_metadata: Map::new(),
        }
    }

    /// Whether every line of the page is blank
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// A source document: its id and its pages in reading order
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    source_document_id: String,
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(default)]
    page: Option<Value>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

impl Document {
    /// Create a document, sorting pages by page number
    pub fn new(source_document_id: impl Into<String>, mut pages: Vec<Page>) -> Self {
        pages.sort_by_key(|page| page.page_number);
        Self {
            source_document_id: source_document_id.into(),
            pages,
        }
    }

    /// Load a parser output file (`<name>_parsed.json`)
    pub fn from_parsed_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let file_stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();

        Self::from_json_str(&text, file_stem).map_err(|e| match e {
            Error::InvalidDocument { reason, .. } => Error::InvalidDocument {
                source_id: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse parser output; `file_stem` names the document when no page
    /// metadata carries a `source_pdf`
    pub fn from_json_str(json: &str, file_stem: &str) -> Result<Self> {
        let raw: Vec<RawPage> = serde_json::from_str(json).map_err(|e| invalid(file_stem, e))?;

        let pages = raw
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| raw.into_page().map_err(|reason| invalid(file_stem, format!("page entry {idx}: {reason}"))))
            .collect::<Result<Vec<_>>>()?;

        let mut document = Self::new(String::new(), pages);
        document.source_document_id = document
            .declared_source()
            .map(str::to_string)
            .unwrap_or_else(|| source_from_stem(file_stem));
        Ok(document)
    }

    /// Source document id
    pub fn source_document_id(&self) -> &str {
        &self.source_document_id
    }

    /// Pages in reading order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Whether the document has no pages
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// First and last page numbers
    pub fn page_range(&self) -> Option<(PageNumber, PageNumber)> {
        Some((self.pages.first()?.page_number, self.pages.last()?.page_number))
    }

    fn declared_source(&self) -> Option<&str> {
        self.pages.iter().find_map(|page| {
            page.origin_metadata
                .get("source_pdf")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|source| !source.is_empty())
        })
    }
}

impl RawPage {
    fn into_page(self) -> std::result::Result<Page, String> {
        let metadata = self.metadata.unwrap_or_default();

        let page_number = match page_value(self.page.as_ref())? {
            Some(number) if number > 0 => number,
            _ => page_value(metadata.get("global_page"))?.unwrap_or(0),
        };

        Ok(Page {
            page_number,
            content: self.content.unwrap_or_default(),
            origin_metadata: metadata,
        })
    }
}

/// Read a page number given as a JSON number or numeric string
fn page_value(value: Option<&Value>) -> std::result::Result<Option<PageNumber>, String> {
    let number = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) if text.trim().is_empty() => return Ok(None),
        Some(Value::String(text)) => text.trim().parse::<u64>().ok(),
        Some(other) => return Err(format!("page number must be a number, got {other}")),
    };

    number
        .and_then(|n| PageNumber::try_from(n).ok())
        .map(Some)
        .ok_or_else(|| format!("invalid page number {}", value.map(Value::to_string).unwrap_or_default()))
}

/// `RFP_2024_parsed` -> `RFP_2024.pdf`
pub fn source_from_stem(file_stem: &str) -> String {
    format!("{}.pdf", file_stem.replace(PARSED_SUFFIX, ""))
}

fn invalid(source_id: &str, reason: impl ToString) -> Error {
    Error::InvalidDocument {
        source_id: source_id.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_sorted_stably() {
        let document = Document::new(
            "rfp.pdf",
            vec![Page::new(3, "c"), Page::new(1, "a"), Page::new(3, "d"), Page::new(2, "b")],
        );
        let contents: Vec<&str> = document.pages().iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c", "d"]);
        assert_eq!(document.page_range(), Some((1, 3)));
    }

    #[test]
    fn test_from_json_uses_declared_source() {
        let json = r#"[
            {"page": 2, "content": "둘째", "metadata": {"source_pdf": "공고문.pdf"}},
            {"page": 1, "content": "첫째", "metadata": {}}
        ]"#;
        let document = Document::from_json_str(json, "ignored_parsed").unwrap();
        assert_eq!(document.source_document_id(), "공고문.pdf");
        assert_eq!(document.pages()[0].content, "첫째");
        assert_eq!(document.pages()[1].origin_metadata["source_pdf"], "공고문.pdf");
    }

    #[test]
    fn test_source_falls_back_to_file_stem() {
        let document = Document::from_json_str(r#"[{"page": 1, "content": "x"}]"#, "RFP_2024_parsed").unwrap();
        assert_eq!(document.source_document_id(), "RFP_2024.pdf");
    }

    #[test]
    fn test_page_number_fallbacks() {
        let json = r#"[
            {"content": "global", "metadata": {"global_page": 7}},
            {"page": "4", "content": "string"},
            {"page": 0, "content": "zero", "metadata": {"global_page": 5}},
            {"content": "none"}
        ]"#;
        let document = Document::from_json_str(json, "doc").unwrap();
        let numbers: Vec<(PageNumber, &str)> = document
            .pages()
            .iter()
            .map(|p| (p.page_number, p.content.as_str()))
            .collect();
        assert_eq!(numbers, vec![(0, "none"), (4, "string"), (5, "zero"), (7, "global")]);
    }

    #[test]
    fn test_missing_content_is_empty() {
        let document = Document::from_json_str(r#"[{"page": 1, "content": null}]"#, "doc").unwrap();
        assert!(document.pages()[0].is_blank());
    }

    #[test]
    fn test_rejects_non_array() {
        let err = Document::from_json_str(r#"{"pages": []}"#, "broken_parsed").unwrap_err();
        assert!(matches!(err, Error::InvalidDocument { ref source_id, .. } if source_id == "broken_parsed"));
    }

    #[test]
    fn test_rejects_negative_page() {
        let err = Document::from_json_str(r#"[{"page": -1, "content": "x"}]"#, "doc").unwrap_err();
        assert!(err.to_string().contains("page entry 0"));
    }

    #[test]
    fn test_empty_array_is_valid() {
        let document = Document::from_json_str("[]", "empty_parsed").unwrap();
        assert!(document.is_empty());
        assert_eq!(document.page_range(), None);
    }

    #[test]
    fn test_from_parsed_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("사업공고_parsed.json");
        std::fs::write(&path, r#"[{"page": 1, "content": "본문"}]"#).unwrap();

        let document = Document::from_parsed_json(&path).unwrap();
        assert_eq!(document.source_document_id(), "사업공고.pdf");

        std::fs::write(&path, "not json").unwrap();
        let err = Document::from_parsed_json(&path).unwrap_err();
        assert!(err.to_string().contains("사업공고_parsed.json"));
    }
}
