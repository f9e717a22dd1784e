//! Canonical text dump of syntax trees, and a reader for it.
//!
//! Named nodes print as `(kind start..end children...)`, literal
//! tokens as `("text" start..end)`:
//!
//! ```text
//! (url_line 0..4 (path 0..4 ("/" 0..1) (path_param 1..4)))
//! ```
//!
//! The dump carries kinds and spans only. [`from_sexp`] rebuilds an
//! equal tree given the same source text.

use std::fmt::{self, Write as _};

use crate::ast::{Node, NodeKind};
use crate::parser::SourceFile;
use crate::token::Span;

/// Dump `node` and its subtree on one line.
#[must_use]
pub fn to_sexp(node: &Node<'_>) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

/// Dump every line result of `file`, one per output line.
///
/// Failed lines print as `(ERROR offset kind)`.
#[must_use]
pub fn format_source_file(file: &SourceFile<'_>) -> String {
    let mut out = String::new();
    for line in file.lines() {
        match &line.result {
            Ok(node) => write_node(&mut out, node),
            Err(err) => {
                let _ = write!(out, "(ERROR {} {})", err.offset, err.kind.name());
            }
        }
        out.push('\n');
    }
    out
}

fn write_node(out: &mut String, node: &Node<'_>) {
    let span = node.span();
    if node.kind().is_named() {
        let _ = write!(out, "({} {span}", node.kind());
    } else {
        let _ = write!(out, "({:?} {span}", node.text());
    }
    for child in node.children() {
        out.push(' ');
        write_node(out, child);
    }
    out.push(')');
}

/// Classifies a dump reading error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SexpErrorKind {
    UnexpectedEnd,
    UnexpectedCharacter(char),
    UnknownKind(String),
    InvalidSpan(String),
    /// The span does not fit inside the source or its parent.
    SpanOutOfRange(Span),
    LiteralMismatch { expected: String, found: String },
    TrailingInput,
}

impl fmt::Display for SexpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEnd => write!(f, "unexpected end of dump"),
            Self::UnexpectedCharacter(c) => write!(f, "unexpected character: {c}"),
            Self::UnknownKind(name) => write!(f, "unknown node kind: {name}"),
            Self::InvalidSpan(text) => write!(f, "invalid span: {text}"),
            Self::SpanOutOfRange(span) => write!(f, "span {span} out of range"),
            Self::LiteralMismatch { expected, found } => {
                write!(f, "literal {expected:?} does not match source text {found:?}")
            }
            Self::TrailingInput => write!(f, "trailing input after tree"),
        }
    }
}

/// Error produced while reading a dump.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {offset} of dump")]
pub struct SexpError {
    pub kind: SexpErrorKind,
    pub offset: usize,
}

/// Rebuild a tree from its [`to_sexp`] dump, borrowing text from
/// `source`.
///
/// # Errors
///
/// Returns `SexpError` on malformed dumps, unknown kinds, spans that do
/// not fit `source`, or literals that disagree with the source text.
pub fn from_sexp<'src>(source: &'src str, dump: &str) -> Result<Node<'src>, SexpError> {
    let mut reader = Reader {
        source,
        dump,
        pos: 0,
    };
    let node = reader.node(Span::new(0, source.len()))?;
    reader.skip_whitespace();
    if reader.pos < dump.len() {
        return Err(reader.error(SexpErrorKind::TrailingInput));
    }
    Ok(node)
}

struct Reader<'src, 'd> {
    source: &'src str,
    dump: &'d str,
    pos: usize,
}

impl<'src, 'd> Reader<'src, 'd> {
    const fn error(&self, kind: SexpErrorKind) -> SexpError {
        SexpError {
            kind,
            offset: self.pos,
        }
    }

    fn peek(&self) -> Option<char> {
        self.dump[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.dump[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn expect(&mut self, expected: char) -> Result<(), SexpError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(self.error(SexpErrorKind::UnexpectedCharacter(c))),
            None => Err(self.error(SexpErrorKind::UnexpectedEnd)),
        }
    }

    fn atom(&mut self) -> Result<&'d str, SexpError> {
        self.skip_whitespace();
        let dump = self.dump;
        let rest = &dump[self.pos..];
        let len = rest
            .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(match rest.chars().next() {
                Some(c) => self.error(SexpErrorKind::UnexpectedCharacter(c)),
                None => self.error(SexpErrorKind::UnexpectedEnd),
            });
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    /// Quoted literal text as written by `{:?}`; literal tokens never
    /// contain quotes or backslashes.
    fn quoted(&mut self) -> Result<String, SexpError> {
        self.expect('"')?;
        let rest = &self.dump[self.pos..];
        let Some(len) = rest.find('"') else {
            self.pos = self.dump.len();
            return Err(self.error(SexpErrorKind::UnexpectedEnd));
        };
        self.pos += len + 1;
        Ok(rest[..len].to_string())
    }

    fn span(&mut self) -> Result<Span, SexpError> {
        self.skip_whitespace();
        let start_pos = self.pos;
        let text = self.atom()?;
        let parsed = text
            .split_once("..")
            .and_then(|(a, b)| Some((a.parse().ok()?, b.parse().ok()?)))
            .filter(|(start, end)| start <= end);
        parsed.map(|(start, end)| Span::new(start, end)).ok_or(SexpError {
            kind: SexpErrorKind::InvalidSpan(text.to_string()),
            offset: start_pos,
        })
    }

    fn node(&mut self, parent: Span) -> Result<Node<'src>, SexpError> {
        self.expect('(')?;
        self.skip_whitespace();
        let (kind, literal) = if self.peek() == Some('"') {
            (NodeKind::Literal, Some(self.quoted()?))
        } else {
            let name = self.atom()?;
            let kind = NodeKind::from_name(name)
                .filter(|kind| kind.is_named())
                .ok_or_else(|| SexpErrorKind::UnknownKind(name.to_string()));
            (kind.map_err(|k| self.error(k))?, None)
        };

        let span = self.span()?;
        let Some(text) = span.slice(self.source).filter(|_| parent.contains(span)) else {
            return Err(self.error(SexpErrorKind::SpanOutOfRange(span)));
        };
        if let Some(expected) = literal.filter(|expected| expected != text) {
            return Err(self.error(SexpErrorKind::LiteralMismatch {
                expected,
                found: text.to_string(),
            }));
        }

        let mut children = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(')') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => children.push(self.node(span)?),
                None => return Err(self.error(SexpErrorKind::UnexpectedEnd)),
            }
        }
        Ok(Node::branch(kind, self.source, span, children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_line};

    #[test]
    fn dumps_literals_and_rules() {
        let line = parse_line("/:id").expect("parse failed");
        assert_eq!(
            to_sexp(&line),
            "(url_line 0..4 (path 0..4 (\"/\" 0..1) (path_param 1..4)))"
        );
    }

    #[test]
    fn reads_its_own_dump() {
        let src = "http://localhost:80/a?b={{c}}";
        let line = parse_line(src).expect("parse failed");
        let read = from_sexp(src, &to_sexp(&line)).expect("read failed");
        assert_eq!(read, line);
    }

    #[test]
    fn rejects_literal_mismatch() {
        let err = from_sexp("/x", "(path 0..2 (\"?\" 0..1) (path_segment 1..2))").unwrap_err();
        assert!(matches!(err.kind, SexpErrorKind::LiteralMismatch { .. }));
    }

    #[test]
    fn rejects_child_outside_parent() {
        let err = from_sexp("/xy", "(path 0..2 (path_segment 1..3))").unwrap_err();
        assert_eq!(err.kind, SexpErrorKind::SpanOutOfRange(Span::new(1, 3)));
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = from_sexp("/x", "(bogus 0..2)").unwrap_err();
        assert_eq!(err.kind, SexpErrorKind::UnknownKind("bogus".to_string()));
    }

    #[test]
    fn source_file_dump_marks_errors() {
        let file = parse("/a\n/x?\n");
        assert_eq!(
            format_source_file(&file),
            "(url_line 0..2 (path 0..2 (\"/\" 0..1) (path_segment 1..2)))\n\
             (ERROR 6 dangling_query_string)\n"
        );
    }
}
