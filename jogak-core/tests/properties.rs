//! Property tests over generated documents

use jogak_core::{Document, Page, Segmenter, SegmenterConfig};
use proptest::prelude::*;
use std::collections::HashSet;

/// Prose lines: at least 50 characters, a normative marker, no digits
const PROSE: &[&str] = &[
    "수행사는 발주기관이 제시한 평가 기준에 따라 모든 과업을 성실하게 수행하여야 하며 결과를 보고한다.",
    "제안사는 제안서와 함께 관련 증빙 서류 일체를 정해진 기한 안에 발주기관에 제출하여야 한다.",
    "평가는 기술 평가와 가격 평가로 나누어 진행하며 세부 방법은 별도의 평가 지침에 따르도록 함",
    "사업 대상 기관의 정보시스템 현황을 조사하고 개선 방향을 도출하는 업무를 수행한다 세부 사항 포함",
    "계약 상대자는 과업 수행 중 취득한 정보를 외부에 누설하여서는 아니 되며 보안 기준을 준수한다.",
];

/// Lines that open a section, clause, appendix or numbered item
const BOUNDARIES: &[&str] = &[
    "사업 개요",
    "## 평가 기준",
    "제3조 (목적)",
    "제 12 조 계약의 해지",
    "별첨 서식",
    "1. 과업 범위",
    "2) 제출 방법",
    "① 일반 사항",
    "1-1 세부 항목",
];

/// Table rows: long enough to pass cleaning on their own, no digits
const TABLE_ROWS: &[&str] = &[
    "| 평가 항목 | 세부 평가 기준 | 배점 기준 |",
    "| 기술 평가 | 수행 계획의 적정성 | 정성 평가 |",
    "| 가격 평가 | 입찰 가격의 적정성 | 정량 평가 |",
    "| 제출 서류 | 제안서 및 증빙 서류 | 필수 제출 |",
];

/// A boundary line, one or more prose lines, then optionally a table run
fn unit() -> impl Strategy<Value = Vec<String>> {
    (
        prop::sample::select(BOUNDARIES.to_vec()),
        prop::collection::vec(prop::sample::select(PROSE.to_vec()), 1..5),
        prop::option::of(prop::collection::vec(prop::sample::select(TABLE_ROWS.to_vec()), 2..6)),
    )
        .prop_map(|(boundary, prose, table)| {
            std::iter::once(boundary)
                .chain(prose)
                .chain(table.unwrap_or_default())
                .map(str::to_string)
                .collect()
        })
}

fn is_table_row(line: &str) -> bool {
    line.contains('|')
}

/// Maximal runs of consecutive table rows, in input order
fn table_runs(pages: &[Vec<String>]) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in pages.iter().flatten() {
        if is_table_row(line) {
            current.push(line);
        } else if !current.is_empty() {
            runs.push(current.join("\n"));
            current.clear();
        }
    }
    if !current.is_empty() {
        runs.push(current.join("\n"));
    }
    runs
}

/// Pages of units; each page holds whole units
fn pages() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(
        prop::collection::vec(unit(), 1..4).prop_map(|units| units.concat()),
        1..4,
    )
}

fn document(pages: &[Vec<String>]) -> Document {
    Document::new(
        "공고문.pdf",
        pages
            .iter()
            .enumerate()
            .map(|(idx, lines)| Page::new(idx as u32 + 1, lines.join("\n")))
            .collect(),
    )
}

fn small_config() -> SegmenterConfig {
    SegmenterConfig::builder()
        .hard_ceiling_chars(300)
        .soft_ceiling_chars(150)
        .min_chunk_chars(100)
        .build()
        .unwrap()
}

#[test]
fn test_generated_lines_are_long_enough() {
    assert!(PROSE.iter().all(|line| line.chars().count() >= 50));
    assert!(PROSE.iter().all(|line| !line.chars().any(|c| c.is_ascii_digit())));
    assert!(TABLE_ROWS.iter().all(|row| row.chars().count() >= 25));
}

proptest! {
    /// Every input line appears exactly once, in order, across the chunks
    #[test]
    fn prop_coverage(pages in pages()) {
        let output = Segmenter::new().segment(&document(&pages));

        let expected: Vec<&str> = pages.iter().flatten().map(|l| l.trim()).collect();
        let actual: Vec<&str> = output
            .chunks
            .iter()
            .flat_map(|chunk| chunk.text.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        prop_assert_eq!(actual, expected);
    }

    /// Page ranges are ordered and within the input pages
    #[test]
    fn prop_page_range(pages in pages()) {
        let output = Segmenter::with_config(small_config())
            .unwrap()
            .segment(&document(&pages));
        let last_page = pages.len() as u32;

        for chunk in &output.chunks {
            prop_assert!(chunk.page_start <= chunk.page_end);
            prop_assert!(chunk.page_start >= 1);
            prop_assert!(chunk.page_end <= last_page);
        }
    }

    /// Identical input produces an identical chunk sequence
    #[test]
    fn prop_idempotent(pages in pages()) {
        let segmenter = Segmenter::with_config(small_config()).unwrap();
        let document = document(&pages);
        prop_assert_eq!(segmenter.segment(&document).chunks, segmenter.segment(&document).chunks);
    }

    /// Chunk ids are unique and never empty text
    #[test]
    fn prop_unique_ids(pages in pages()) {
        let output = Segmenter::with_config(small_config())
            .unwrap()
            .segment(&document(&pages));

        let ids: HashSet<&str> = output.chunks.iter().map(|c| c.chunk_id.as_str()).collect();
        prop_assert_eq!(ids.len(), output.chunks.len());
        prop_assert!(output.chunks.iter().all(|c| !c.text.trim().is_empty()));
    }

    /// Soft-split children respect the soft ceiling unless they are a
    /// single table run; pass-through chunks respect the hard ceiling
    #[test]
    fn prop_size_bound(pages in pages()) {
        let config = small_config();
        let output = Segmenter::with_config(config.clone())
            .unwrap()
            .segment(&document(&pages));

        for chunk in output.chunks.iter().filter(|c| c.chunk_id.contains("__s")) {
            let only_table = chunk.text.lines().all(is_table_row);
            prop_assert!(
                only_table || chunk.char_count() <= config.soft_ceiling_chars,
                "{} has {} chars",
                chunk.chunk_id,
                chunk.char_count()
            );
        }
        for chunk in output.chunks.iter().filter(|c| !c.chunk_id.contains("__s")) {
            prop_assert!(chunk.char_count() <= config.hard_ceiling_chars);
        }
    }

    /// Every table run lands whole inside some chunk
    #[test]
    fn prop_table_integrity(pages in pages()) {
        let output = Segmenter::with_config(small_config())
            .unwrap()
            .segment(&document(&pages));

        for run in table_runs(&pages) {
            prop_assert!(
                output.chunks.iter().any(|chunk| chunk.text.contains(run.as_str())),
                "table run torn or lost: {}",
                run
            );
        }
    }
}
