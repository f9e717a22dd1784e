use std::fmt;

/// Half-open byte range `[start, end)` into the parsed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when `other` lies entirely inside this span.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Borrow the text this span covers.
    ///
    /// Returns `None` when the span is out of bounds or does not fall on
    /// character boundaries.
    #[must_use]
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Lexeme classes the lexer can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    /// Fixed text such as `://`, `/`, `?`, or a scheme name.
    Literal,
    /// Run of ASCII digits.
    Digits,
    /// `[a-zA-Z_][a-zA-Z0-9_-]*` (path parameter names).
    Identifier,
    /// `[a-zA-Z_][a-zA-Z0-9_]*` (template variable names).
    VariableName,
    /// Path text up to the next structural delimiter or whitespace.
    Segment,
    /// Query key text, `[a-zA-Z0-9_-]+`.
    KeyText,
    /// Query value text, everything up to the next `&`.
    ValueText,
    /// The literal host `localhost`.
    Localhost,
    /// Dotted-quad IPv4 literal.
    DottedQuad,
    /// Multi-label dotted domain name.
    DottedDomain,
}

/// A classified slice of input produced without grammar context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub span: Span,
}
