use std::fmt;

use crate::ast::{Node, NodeKind};
use crate::lexer::Lexer;
use crate::lines::split_lines;
use crate::resolver::{self, Resolution};
use crate::token::{LexemeKind, Span};

/// Schemes accepted by the `protocol` rule, in declared order.
pub const SCHEMES: &[&str] = &["http", "https", "ftp", "ws", "wss"];

/// Longest port the `port` rule accepts, in digits.
const MAX_PORT_DIGITS: usize = 5;

const EXPECTED_PATH_CONTINUATION: &[&str] = &[
    "variable",
    "path_param",
    "path_segment",
    "\"/\"",
    "query_string",
    "end of line",
];
const EXPECTED_AFTER_KEY: &[&str] = &["\"=\"", "\"&\"", "end of line"];
const EXPECTED_AFTER_VALUE: &[&str] = &["\"&\"", "end of line"];

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ParseErrorKind {
    /// No alternative of `rule` matched at the error offset.
    UnexpectedToken {
        rule: NodeKind,
        expected: &'static [&'static str],
        found: Option<char>,
    },
    /// `path` matched zero elements.
    IncompletePath,
    /// `?` was not followed by a query parameter.
    DanglingQueryString,
    /// A host was committed but no path follows it.
    PostCommitFailure { host: Span },
}

impl ParseErrorKind {
    /// Stable snake_case name for dumps and machine output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UnexpectedToken { .. } => "unexpected_token",
            Self::IncompletePath => "incomplete_path",
            Self::DanglingQueryString => "dangling_query_string",
            Self::PostCommitFailure { .. } => "post_commit_failure",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken {
                rule,
                found: Some(c),
                ..
            } => {
                write!(f, "unexpected {c:?} in {rule}")
            }
            Self::UnexpectedToken {
                rule, found: None, ..
            } => {
                write!(f, "unexpected end of line in {rule}")
            }
            Self::IncompletePath => {
                write!(f, "expected at least one path element")
            }
            Self::DanglingQueryString => {
                write!(f, "expected a query parameter after '?'")
            }
            Self::PostCommitFailure { host } => {
                write!(
                    f,
                    "expected a path after host at {host}, \
                     host text is not reinterpreted as path"
                )
            }
        }
    }
}

/// Error produced while parsing one line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Absolute byte offset into the parsed input.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based character column within the line.
    pub column: usize,
}

impl ParseError {
    #[must_use]
    pub const fn expected(&self) -> &'static [&'static str] {
        match self.kind {
            ParseErrorKind::UnexpectedToken { expected, .. } => expected,
            _ => &[],
        }
    }
}

/// Outcome of parsing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Line<'src> {
    /// 1-based line number.
    pub number: usize,
    /// Line text span, newline excluded.
    pub span: Span,
    pub result: Result<Node<'src>, ParseError>,
}

/// Per-line results for a whole input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile<'src> {
    source: &'src str,
    lines: Vec<Line<'src>>,
}

impl<'src> SourceFile<'src> {
    #[must_use]
    pub const fn source(&self) -> &'src str {
        self.source
    }

    #[must_use]
    pub fn lines(&self) -> &[Line<'src>] {
        &self.lines
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.lines.iter().all(|l| l.result.is_ok())
    }

    pub fn errors(&self) -> impl Iterator<Item = &ParseError> {
        self.lines.iter().filter_map(|l| l.result.as_ref().err())
    }

    /// Successfully parsed `url_line` trees, in input order.
    pub fn trees(&self) -> impl Iterator<Item = &Node<'src>> {
        self.lines.iter().filter_map(|l| l.result.as_ref().ok())
    }

    #[must_use]
    pub const fn span(&self) -> Span {
        Span::new(0, self.source.len())
    }

    /// Assemble the `source_file` tree.
    ///
    /// # Errors
    ///
    /// Returns the first line error if any line failed.
    pub fn root(&self) -> Result<Node<'src>, ParseError> {
        self.clone().into_root()
    }

    /// Consuming form of [`SourceFile::root`].
    ///
    /// # Errors
    ///
    /// Returns the first line error if any line failed.
    pub fn into_root(self) -> Result<Node<'src>, ParseError> {
        let span = self.span();
        let children = self
            .lines
            .into_iter()
            .map(|l| l.result)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::branch(NodeKind::SourceFile, self.source, span, children))
    }
}

/// Parse every line of `input` independently.
///
/// A failing line never prevents the following lines from being
/// attempted; inspect [`SourceFile::lines`] for per-line outcomes.
#[must_use]
pub fn parse(input: &str) -> SourceFile<'_> {
    let lines = split_lines(input)
        .map(|(number, span)| {
            let result = Parser::new(input, span, number).url_line();
            if let Err(err) = &result {
                log::debug!("line {number} failed: {err}");
            }
            Line {
                number,
                span,
                result,
            }
        })
        .collect();
    SourceFile {
        source: input,
        lines,
    }
}

/// Parse `line` as a single `url_line`.
///
/// A newline inside `line` is not a line break here; it is reported
/// as an unexpected token like any other whitespace.
///
/// # Errors
///
/// Returns `ParseError` when the line does not match the grammar.
pub fn parse_line(line: &str) -> Result<Node<'_>, ParseError> {
    Parser::new(line, Span::new(0, line.len()), 1).url_line()
}

/// Recursive-descent parser for one line.
///
/// Rule functions return `None` on no-match and leave the lexer where
/// it was; sequences restore the checkpoint taken at their start.
pub(crate) struct Parser<'src> {
    lexer: Lexer<'src>,
    line: usize,
    line_start: usize,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(source: &'src str, span: Span, line: usize) -> Self {
        Self {
            lexer: Lexer::new(source, span),
            line,
            line_start: span.start,
        }
    }

    pub(crate) const fn pos(&self) -> usize {
        self.lexer.pos()
    }

    fn source(&self) -> &'src str {
        self.lexer.source()
    }

    fn literal(&mut self, lit: &str) -> Option<Node<'src>> {
        let lexeme = self.lexer.literal(lit)?;
        Some(Node::leaf(NodeKind::Literal, self.source(), lexeme.span))
    }

    fn error(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        let column = self
            .source()
            .get(self.line_start..offset)
            .map_or(0, |prefix| prefix.chars().count())
            + 1;
        ParseError {
            kind,
            offset,
            line: self.line,
            column,
        }
    }

    fn url_line(mut self) -> Result<Node<'src>, ParseError> {
        let start = self.pos();
        let mut children = Vec::new();

        let protocol = self.protocol();
        let after_protocol = protocol.is_some();
        children.extend(protocol);

        let host = match resolver::resolve_host(&mut self, after_protocol) {
            Resolution::Host(node) => {
                let span = node.span();
                children.push(node);
                Some(span)
            }
            Resolution::Path => None,
        };

        let path_start = self.pos();
        let Some(path) = self.path() else {
            let kind = host.map_or(ParseErrorKind::IncompletePath, |host| {
                ParseErrorKind::PostCommitFailure { host }
            });
            return Err(self.error(kind, path_start));
        };
        children.push(path);

        let expected = match self.query_string()? {
            Some(query) => {
                let last_has_value = query
                    .children_by_kind(NodeKind::QueryParam)
                    .last()
                    .is_some_and(|p| p.child(NodeKind::Value).is_some());
                children.push(query);
                if last_has_value {
                    (NodeKind::QueryString, EXPECTED_AFTER_VALUE)
                } else {
                    (NodeKind::QueryParam, EXPECTED_AFTER_KEY)
                }
            }
            None => (NodeKind::Path, EXPECTED_PATH_CONTINUATION),
        };

        if !self.lexer.at_end() {
            let (rule, expected) = expected;
            let kind = ParseErrorKind::UnexpectedToken {
                rule,
                expected,
                found: self.lexer.peek_char(),
            };
            return Err(self.error(kind, self.pos()));
        }

        let span = Span::new(start, self.pos());
        Ok(Node::branch(NodeKind::UrlLine, self.source(), span, children))
    }

    /// `seq(choice("http", "https", "ftp", "ws", "wss"), "://")`
    fn protocol(&mut self) -> Option<Node<'src>> {
        let checkpoint = self.lexer.checkpoint();
        let scheme = self.lexer.one_of_literals(SCHEMES)?;
        let scheme = Node::leaf(NodeKind::Literal, self.source(), scheme.span);
        let Some(separator) = self.literal("://") else {
            self.lexer.restore(checkpoint);
            return None;
        };
        Node::enclosing(NodeKind::Protocol, self.source(), vec![scheme, separator])
    }

    /// `seq(domain, optional(seq(":", port)))`
    pub(crate) fn domain_and_port(&mut self) -> Option<Node<'src>> {
        let mut children = vec![self.domain()?];
        let checkpoint = self.lexer.checkpoint();
        match self.literal(":").map(|colon| (colon, self.port())) {
            Some((colon, Some(port))) => children.extend([colon, port]),
            _ => self.lexer.restore(checkpoint),
        }
        Node::enclosing(NodeKind::DomainAndPort, self.source(), children)
    }

    /// `choice(hostname, dotted-domain)`, with `hostname` being
    /// `choice("localhost", dotted-quad)`.
    fn domain(&mut self) -> Option<Node<'src>> {
        let lexeme = self.lexer.host()?;
        let source = self.source();
        let node = match lexeme.kind {
            LexemeKind::Localhost | LexemeKind::DottedQuad => {
                let hostname = Node::leaf(NodeKind::Hostname, source, lexeme.span);
                Node::branch(NodeKind::Domain, source, lexeme.span, vec![hostname])
            }
            _ => Node::leaf(NodeKind::Domain, source, lexeme.span),
        };
        Some(node)
    }

    fn port(&mut self) -> Option<Node<'src>> {
        let lexeme = self.lexer.digits(MAX_PORT_DIGITS)?;
        Some(Node::leaf(NodeKind::Port, self.source(), lexeme.span))
    }

    /// `repeat1(choice(variable, path_param, path_segment, "/"))`
    fn path(&mut self) -> Option<Node<'src>> {
        let mut elements = Vec::new();
        while let Some(element) = self.path_element() {
            elements.push(element);
        }
        Node::enclosing(NodeKind::Path, self.source(), elements)
    }

    fn path_element(&mut self) -> Option<Node<'src>> {
        self.variable()
            .or_else(|| self.path_param())
            .or_else(|| self.path_segment())
            .or_else(|| self.literal("/"))
    }

    fn path_segment(&mut self) -> Option<Node<'src>> {
        let lexeme = self.lexer.path_segment_text()?;
        Some(Node::leaf(NodeKind::PathSegment, self.source(), lexeme.span))
    }

    /// `seq(":", identifier)`
    fn path_param(&mut self) -> Option<Node<'src>> {
        let checkpoint = self.lexer.checkpoint();
        let colon = self.lexer.literal(":")?;
        let Some(name) = self.lexer.identifier() else {
            self.lexer.restore(checkpoint);
            return None;
        };
        let span = Span::new(colon.span.start, name.span.end);
        Some(Node::leaf(NodeKind::PathParam, self.source(), span))
    }

    /// `seq("{{", variable_name, "}}")`
    fn variable(&mut self) -> Option<Node<'src>> {
        let checkpoint = self.lexer.checkpoint();
        let parts = self.lexer.literal("{{").and_then(|open| {
            let name = self.lexer.variable_name()?;
            let close = self.lexer.literal("}}")?;
            Some([
                (NodeKind::VariableDelimStart, open.span),
                (NodeKind::VariableName, name.span),
                (NodeKind::VariableDelimEnd, close.span),
            ])
        });
        let Some(parts) = parts else {
            self.lexer.restore(checkpoint);
            return None;
        };
        let source = self.source();
        let children = parts
            .into_iter()
            .map(|(kind, span)| Node::leaf(kind, source, span))
            .collect();
        Node::enclosing(NodeKind::Variable, source, children)
    }

    /// `seq("?", query_param, repeat(seq("&", query_param)))`
    fn query_string(&mut self) -> Result<Option<Node<'src>>, ParseError> {
        let Some(question) = self.literal("?") else {
            return Ok(None);
        };
        let Some(first) = self.query_param() else {
            return Err(self.error(ParseErrorKind::DanglingQueryString, self.pos()));
        };
        let mut children = vec![question, first];
        loop {
            let checkpoint = self.lexer.checkpoint();
            let Some(amp) = self.literal("&") else {
                break;
            };
            let Some(param) = self.query_param() else {
                self.lexer.restore(checkpoint);
                break;
            };
            children.extend([amp, param]);
        }
        Ok(Node::enclosing(NodeKind::QueryString, self.source(), children))
    }

    /// `seq(key, optional(seq("=", value)))`
    fn query_param(&mut self) -> Option<Node<'src>> {
        let mut children = vec![self.key()?];
        let checkpoint = self.lexer.checkpoint();
        match self.literal("=").map(|eq| (eq, self.value())) {
            Some((eq, Some(value))) => children.extend([eq, value]),
            _ => self.lexer.restore(checkpoint),
        }
        Node::enclosing(NodeKind::QueryParam, self.source(), children)
    }

    /// `choice(variable, [a-zA-Z0-9_-]+)`
    fn key(&mut self) -> Option<Node<'src>> {
        if let Some(variable) = self.variable() {
            return Node::enclosing(NodeKind::Key, self.source(), vec![variable]);
        }
        let lexeme = self.lexer.key_text()?;
        Some(Node::leaf(NodeKind::Key, self.source(), lexeme.span))
    }

    /// `choice(variable, [^&]+)`
    fn value(&mut self) -> Option<Node<'src>> {
        if let Some(variable) = self.variable() {
            return Node::enclosing(NodeKind::Value, self.source(), vec![variable]);
        }
        let lexeme = self.lexer.value_text()?;
        Some(Node::leaf(NodeKind::Value, self.source(), lexeme.span))
    }
}
