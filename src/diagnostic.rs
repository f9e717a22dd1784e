//! Caret-style rendering of parse errors.

use std::fmt::Write as _;

use crate::parser::ParseError;

/// Render `err` against the `source` it was produced from.
///
/// ```text
/// error: expected a query parameter after '?' at line 1, column 4
///   |
/// 1 | /x?
///   |    ^
/// ```
///
/// Expected alternatives, when the error carries any, follow on a
/// `= expected:` line.
#[must_use]
pub fn render(source: &str, err: &ParseError) -> String {
    let line_text = line_at(source, err.offset);
    let number = err.line.to_string();
    let gutter = " ".repeat(number.len());
    let caret_pad = " ".repeat(err.column.saturating_sub(1));

    let mut out = String::new();
    let _ = writeln!(out, "error: {err}");
    let _ = writeln!(out, "{gutter} |");
    let _ = writeln!(out, "{number} | {line_text}");
    let _ = writeln!(out, "{gutter} | {caret_pad}^");
    let expected = err.expected();
    if !expected.is_empty() {
        let _ = writeln!(out, "{gutter} = expected: {}", expected.join(", "));
    }
    out
}

/// Text of the line containing byte `offset`, without its terminator.
fn line_at(source: &str, offset: usize) -> &str {
    let offset = offset.min(source.len());
    let start = source
        .get(..offset)
        .and_then(|before| before.rfind('\n'))
        .map_or(0, |i| i + 1);
    let rest = source.get(start..).unwrap_or_default();
    let line = rest.split('\n').next().unwrap_or_default();
    line.strip_suffix('\r').unwrap_or(line)
}
