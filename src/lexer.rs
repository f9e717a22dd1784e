//! On-demand lexeme matchers over one line of input.
//!
//! The lexer knows nothing about the grammar. The parser asks for a
//! lexeme class at the current position and either gets the longest
//! match back (and the cursor advances) or `None` (and nothing moves).
//! All offsets are absolute positions in the original input.

use crate::token::{Lexeme, LexemeKind, Span};

/// Longest DNS label the dotted-domain pattern accepts.
const MAX_LABEL_LEN: usize = 63;

/// Characters that end a path segment in addition to whitespace.
const SEGMENT_DELIMITERS: &[char] = &['/', '?', '{', ':', '=', '}', '&'];

/// Saved cursor position for backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Cursor over `source[start..end]` handing out classified lexemes.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    input: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer restricted to `span` of `source`.
    ///
    /// The span is clamped to the source length.
    #[must_use]
    pub fn new(source: &'a str, span: Span) -> Self {
        let end = span.end.min(source.len());
        Self {
            source,
            input: source.as_bytes(),
            pos: span.start.min(end),
            end,
        }
    }

    /// Lexer over the whole of `source`.
    #[must_use]
    pub fn whole(source: &'a str) -> Self {
        Self::new(source, Span::new(0, source.len()))
    }

    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    #[must_use]
    pub const fn at_end(&self) -> bool {
        self.pos >= self.end
    }

    #[must_use]
    pub const fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    pub const fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.0;
    }

    /// Unconsumed text of the line.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        self.source.get(self.pos..self.end).unwrap_or_default()
    }

    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        if self.at_end() {
            None
        } else {
            self.input.get(self.pos).copied()
        }
    }

    #[must_use]
    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn bytes(&self) -> &'a [u8] {
        &self.input[self.pos..self.end]
    }

    fn take(&mut self, kind: LexemeKind, len: usize) -> Lexeme {
        let span = Span::new(self.pos, self.pos + len);
        self.pos += len;
        Lexeme { kind, span }
    }

    /// Match the exact text `lit`.
    pub fn literal(&mut self, lit: &str) -> Option<Lexeme> {
        self.bytes()
            .starts_with(lit.as_bytes())
            .then(|| self.take(LexemeKind::Literal, lit.len()))
    }

    /// Match the longest of `set`; equal lengths go to the earlier entry.
    pub fn one_of_literals(&mut self, set: &[&str]) -> Option<Lexeme> {
        let bytes = self.bytes();
        let len = longest(
            set.iter()
                .map(|lit| bytes.starts_with(lit.as_bytes()).then_some(lit.len())),
        )?;
        Some(self.take(LexemeKind::Literal, len))
    }

    /// Match between one and `max` ASCII digits, greedily.
    pub fn digits(&mut self, max: usize) -> Option<Lexeme> {
        let len = count_while(self.bytes(), |b| b.is_ascii_digit()).min(max);
        (len > 0).then(|| self.take(LexemeKind::Digits, len))
    }

    /// Match `[a-zA-Z_][a-zA-Z0-9_-]*`.
    pub fn identifier(&mut self) -> Option<Lexeme> {
        let len = match_name(self.bytes(), true)?;
        Some(self.take(LexemeKind::Identifier, len))
    }

    /// Match `[a-zA-Z_][a-zA-Z0-9_]*`.
    pub fn variable_name(&mut self) -> Option<Lexeme> {
        let len = match_name(self.bytes(), false)?;
        Some(self.take(LexemeKind::VariableName, len))
    }

    /// Match path text up to the next delimiter or whitespace.
    pub fn path_segment_text(&mut self) -> Option<Lexeme> {
        let rest = self.remaining();
        let len = rest
            .char_indices()
            .find(|&(_, c)| c.is_whitespace() || SEGMENT_DELIMITERS.contains(&c))
            .map_or(rest.len(), |(i, _)| i);
        (len > 0).then(|| self.take(LexemeKind::Segment, len))
    }

    /// Match `[a-zA-Z0-9_-]+`.
    pub fn key_text(&mut self) -> Option<Lexeme> {
        let len = count_while(self.bytes(), is_key_byte);
        (len > 0).then(|| self.take(LexemeKind::KeyText, len))
    }

    /// Match any run of characters other than `&`.
    pub fn value_text(&mut self) -> Option<Lexeme> {
        let rest = self.remaining();
        let len = rest.find('&').unwrap_or(rest.len());
        (len > 0).then(|| self.take(LexemeKind::ValueText, len))
    }

    /// Match a host: `localhost`, a dotted quad, or a dotted domain.
    ///
    /// The longest candidate wins. Equal lengths are broken in that
    /// order, so `10.0.0.1` is a dotted quad even though the domain
    /// pattern also accepts it.
    pub fn host(&mut self) -> Option<Lexeme> {
        let bytes = self.bytes();
        let candidates = [
            (LexemeKind::Localhost, match_localhost(bytes)),
            (LexemeKind::DottedQuad, match_dotted_quad(bytes)),
            (LexemeKind::DottedDomain, match_dotted_domain(bytes)),
        ];
        let len = longest(candidates.iter().map(|&(_, len)| len))?;
        let (kind, _) = candidates
            .into_iter()
            .find(|&(_, candidate)| candidate == Some(len))?;
        Some(self.take(kind, len))
    }
}

fn longest(lengths: impl Iterator<Item = Option<usize>>) -> Option<usize> {
    lengths.fold(None, |best, len| match (best, len) {
        (Some(b), Some(l)) if l > b => Some(l),
        (None, l) => l,
        (b, _) => b,
    })
}

fn count_while(bytes: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    bytes.iter().take_while(|&&b| pred(b)).count()
}

const fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn match_name(bytes: &[u8], allow_dash: bool) -> Option<usize> {
    let first = *bytes.first()?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let rest = count_while(&bytes[1..], |b| {
        b.is_ascii_alphanumeric() || b == b'_' || (allow_dash && b == b'-')
    });
    Some(1 + rest)
}

/// Length of `localhost` at the start of `bytes`.
#[must_use]
pub fn match_localhost(bytes: &[u8]) -> Option<usize> {
    const LOCALHOST: &[u8] = b"localhost";
    bytes.starts_with(LOCALHOST).then_some(LOCALHOST.len())
}

/// Length of `[0-9]{1,3}(\.[0-9]{1,3}){3}` at the start of `bytes`.
#[must_use]
pub fn match_dotted_quad(bytes: &[u8]) -> Option<usize> {
    let mut pos = 0;
    for group in 0..4 {
        if group > 0 {
            if bytes.get(pos) != Some(&b'.') {
                return None;
            }
            pos += 1;
        }
        let run = count_while(&bytes[pos..], |b| b.is_ascii_digit());
        if run == 0 {
            return None;
        }
        if group < 3 {
            // A non-final group must be followed by the dot.
            if run > 3 {
                return None;
            }
            pos += run;
        } else {
            pos += run.min(3);
        }
    }
    Some(pos)
}

/// Length of one label, `[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?`.
#[must_use]
pub fn match_label(bytes: &[u8]) -> Option<usize> {
    if !bytes.first()?.is_ascii_alphanumeric() {
        return None;
    }
    let run = count_while(bytes, |b| b.is_ascii_alphanumeric() || b == b'-').min(MAX_LABEL_LEN);
    let trailing_dashes = bytes[..run].iter().rev().take_while(|&&b| b == b'-').count();
    Some(run - trailing_dashes)
}

/// Length of two or more dot-separated labels at the start of `bytes`.
#[must_use]
pub fn match_dotted_domain(bytes: &[u8]) -> Option<usize> {
    let mut pos = match_label(bytes)?;
    let mut labels = 1;
    while bytes.get(pos) == Some(&b'.') {
        let Some(len) = match_label(&bytes[pos + 1..]) else {
            break;
        };
        pos += 1 + len;
        labels += 1;
    }
    (labels >= 2).then_some(pos)
}
