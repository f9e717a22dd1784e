//! Positioned syntax tree for URL templates.
//!
//! Every node carries its kind, a byte span into the parsed input, the
//! text that span covers, and its children in source order. Literal
//! punctuation (`://`, `/`, `?`, `&`, `=`, `:`) is kept as anonymous
//! [`NodeKind::Literal`] children so a node's children always tile its
//! span exactly.

use std::fmt;

use crate::token::Span;

/// Grammar rule a node was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NodeKind {
    SourceFile,
    UrlLine,
    Protocol,
    DomainAndPort,
    Domain,
    Hostname,
    Port,
    Path,
    PathSegment,
    PathParam,
    Variable,
    VariableDelimStart,
    VariableName,
    VariableDelimEnd,
    QueryString,
    QueryParam,
    Key,
    Value,
    /// Anonymous punctuation or keyword token.
    Literal,
}

impl NodeKind {
    pub const ALL: [Self; 19] = [
        Self::SourceFile,
        Self::UrlLine,
        Self::Protocol,
        Self::DomainAndPort,
        Self::Domain,
        Self::Hostname,
        Self::Port,
        Self::Path,
        Self::PathSegment,
        Self::PathParam,
        Self::Variable,
        Self::VariableDelimStart,
        Self::VariableName,
        Self::VariableDelimEnd,
        Self::QueryString,
        Self::QueryParam,
        Self::Key,
        Self::Value,
        Self::Literal,
    ];

    /// Rule name as written in the grammar.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SourceFile => "source_file",
            Self::UrlLine => "url_line",
            Self::Protocol => "protocol",
            Self::DomainAndPort => "domain_and_port",
            Self::Domain => "domain",
            Self::Hostname => "hostname",
            Self::Port => "port",
            Self::Path => "path",
            Self::PathSegment => "path_segment",
            Self::PathParam => "path_param",
            Self::Variable => "variable",
            Self::VariableDelimStart => "variable_delim_start",
            Self::VariableName => "variable_name",
            Self::VariableDelimEnd => "variable_delim_end",
            Self::QueryString => "query_string",
            Self::QueryParam => "query_param",
            Self::Key => "key",
            Self::Value => "value",
            Self::Literal => "literal",
        }
    }

    /// Inverse of [`NodeKind::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Named kinds are grammar rules; literals are anonymous tokens.
    #[must_use]
    pub const fn is_named(self) -> bool {
        !matches!(self, Self::Literal)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable tree node borrowing its text from the parsed input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node<'src> {
    kind: NodeKind,
    span: Span,
    text: &'src str,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    children: Vec<Self>,
}

impl<'src> Node<'src> {
    /// Build a leaf covering `span` of `source`.
    ///
    /// Falls back to empty text if `span` is not a valid slice.
    #[must_use]
    pub fn leaf(kind: NodeKind, source: &'src str, span: Span) -> Self {
        Self::branch(kind, source, span, Vec::new())
    }

    /// Build a node from its children. The caller guarantees that the
    /// children lie inside `span` and are ordered.
    #[must_use]
    pub fn branch(kind: NodeKind, source: &'src str, span: Span, children: Vec<Self>) -> Self {
        debug_assert!(children.iter().all(|c| span.contains(c.span)));
        Self {
            kind,
            span,
            text: span.slice(source).unwrap_or_default(),
            children,
        }
    }

    /// Build a node spanning exactly from its first to its last child.
    ///
    /// Returns `None` when `children` is empty.
    #[must_use]
    pub fn enclosing(kind: NodeKind, source: &'src str, children: Vec<Self>) -> Option<Self> {
        let start = children.first()?.span.start;
        let end = children.last()?.span.end;
        Some(Self::branch(kind, source, Span::new(start, end), children))
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Raw source text covered by this node.
    #[must_use]
    pub const fn text(&self) -> &'src str {
        self.text
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// First direct child of `kind`.
    #[must_use]
    pub fn child(&self, kind: NodeKind) -> Option<&Self> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Direct children of `kind`, in order.
    pub fn children_by_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Self> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// Direct children that are grammar rules rather than literals.
    pub fn named_children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter(|c| c.kind.is_named())
    }

    /// This node followed by all of its descendants, pre-order.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_, 'src> {
        Descendants { stack: vec![self] }
    }

    /// Name of a `path_param` (`id` for `:id`).
    #[must_use]
    pub fn param_name(&self) -> Option<&'src str> {
        match self.kind {
            NodeKind::PathParam => self.text.strip_prefix(':'),
            _ => None,
        }
    }

    /// Name inside a `variable` (`host` for `{{host}}`).
    #[must_use]
    pub fn variable_name(&self) -> Option<&'src str> {
        match self.kind {
            NodeKind::Variable => self.child(NodeKind::VariableName).map(Self::text),
            _ => None,
        }
    }
}

/// Pre-order iterator returned by [`Node::descendants`].
#[derive(Debug, Clone)]
pub struct Descendants<'a, 'src> {
    stack: Vec<&'a Node<'src>>,
}

impl<'a, 'src> Iterator for Descendants<'a, 'src> {
    type Item = &'a Node<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(src: &str) -> Node<'_> {
        let slash = Node::leaf(NodeKind::Literal, src, Span::new(0, 1));
        let param = Node::leaf(NodeKind::PathParam, src, Span::new(1, 4));
        Node::branch(NodeKind::Path, src, Span::new(0, 4), vec![slash, param])
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(NodeKind::from_name("nope"), None);
    }

    #[test]
    fn descendants_are_pre_order() {
        let src = "/:id";
        let path = sample(src);
        let kinds: Vec<_> = path.descendants().map(Node::kind).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Path, NodeKind::Literal, NodeKind::PathParam]
        );
    }

    #[test]
    fn param_name_strips_colon() {
        let src = "/:id";
        let path = sample(src);
        let param = path.child(NodeKind::PathParam).expect("param");
        assert_eq!(param.param_name(), Some("id"));
        assert_eq!(path.param_name(), None);
    }

    #[test]
    fn named_children_skip_literals() {
        let src = "/:id";
        let path = sample(src);
        assert_eq!(path.named_children().count(), 1);
        assert_eq!(path.children().len(), 2);
    }
}
