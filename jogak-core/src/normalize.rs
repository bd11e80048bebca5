//! Line-level normalization

/// Strip trailing whitespace only
///
/// Leading whitespace and inner spacing are kept verbatim: indentation
/// carries list nesting and table rows depend on their column layout.
pub fn normalize_line(line: &str) -> &str {
    line.trim_end()
}

/// Line feed, carriage return or form feed
fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\x0c')
}

/// Split page content into normalized lines
///
/// Breaks on `\n`, a lone `\r` or a form feed; `\r\n` is a single break.
pub fn normalized_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut after_cr = false;
    content
        .split_inclusive(is_line_break)
        .filter(move |piece| {
            let crlf_tail = after_cr && *piece == "\n";
            after_cr = piece.ends_with('\r');
            !crlf_tail
        })
        .map(normalize_line)
}

/// Whether a line is a row of a markdown-style table
pub fn is_table_row(line: &str, delimiter: char) -> bool {
    line.contains(delimiter)
}
