//! Splits input into independently parsed lines.

use crate::token::Span;

/// Yield `(line_number, span)` for every non-empty line of `input`.
///
/// Lines end at `\n`; a `\r` directly before it is left out of the
/// span. A trailing newline does not start another line, and empty
/// lines are skipped. Line numbers stay 1-based physical numbers.
pub fn split_lines(input: &str) -> impl Iterator<Item = (usize, Span)> + '_ {
    let mut offset = 0;
    input.split('\n').enumerate().filter_map(move |(index, raw)| {
        let start = offset;
        offset += raw.len() + 1;
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        (!text.is_empty()).then_some((index + 1, Span::new(start, start + text.len())))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<(usize, Span)> {
        split_lines(input).collect()
    }

    #[test]
    fn splits_on_newlines() {
        assert_eq!(
            collect("/a\n???\n/b"),
            vec![
                (1, Span::new(0, 2)),
                (2, Span::new(3, 6)),
                (3, Span::new(7, 9)),
            ]
        );
    }

    #[test]
    fn trailing_newline_adds_no_line() {
        assert_eq!(collect("/a\n"), vec![(1, Span::new(0, 2))]);
        assert!(collect("").is_empty());
    }

    #[test]
    fn crlf_is_excluded() {
        assert_eq!(
            collect("/a\r\n/b\r\n"),
            vec![(1, Span::new(0, 2)), (2, Span::new(4, 6))]
        );
    }

    #[test]
    fn blank_lines_keep_numbering() {
        assert_eq!(
            collect("/a\n\n/b"),
            vec![(1, Span::new(0, 2)), (3, Span::new(4, 6))]
        );
    }
}
