//! Placeholder extraction and substitution over parsed lines.

use std::collections::HashMap;

use crate::ast::{Node, NodeKind};
use crate::token::Span;

/// Names of all `{{variable}}` placeholders under `node`, in source
/// order, duplicates kept.
#[must_use]
pub fn variables<'src>(node: &Node<'src>) -> Vec<&'src str> {
    node.descendants().filter_map(Node::variable_name).collect()
}

/// Names of all `:param` path parameters under `node`, in source order.
#[must_use]
pub fn path_params<'src>(node: &Node<'src>) -> Vec<&'src str> {
    node.descendants().filter_map(Node::param_name).collect()
}

/// One `key[=value]` pair from a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QueryParam<'src> {
    /// Raw key text, `{{...}}` included when the key is a variable.
    pub key: &'src str,
    pub value: Option<&'src str>,
    pub span: Span,
}

/// Query parameters under `node`, in order, duplicate keys kept.
#[must_use]
pub fn query_params<'src>(node: &Node<'src>) -> Vec<QueryParam<'src>> {
    node.descendants()
        .filter(|n| n.kind() == NodeKind::QueryParam)
        .filter_map(|param| {
            Some(QueryParam {
                key: param.child(NodeKind::Key)?.text(),
                value: param.child(NodeKind::Value).map(Node::text),
                span: param.span(),
            })
        })
        .collect()
}

/// Values to substitute for placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    variables: HashMap<String, String>,
    path_params: HashMap<String, String>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `{{name}}` to `value`.
    #[must_use]
    pub fn variable(mut self, name: &str, value: &str) -> Self {
        self.variables.insert(name.to_string(), value.to_string());
        self
    }

    /// Bind `:name` to `value`.
    #[must_use]
    pub fn path_param(mut self, name: &str, value: &str) -> Self {
        self.path_params.insert(name.to_string(), value.to_string());
        self
    }

    fn lookup(&self, node: &Node<'_>) -> Option<&str> {
        if let Some(name) = node.variable_name() {
            return self.variables.get(name).map(String::as_str);
        }
        node.param_name()
            .and_then(|name| self.path_params.get(name))
            .map(String::as_str)
    }
}

/// Placeholders under `node` that `bindings` has no value for.
#[must_use]
pub fn unbound<'src>(node: &Node<'src>, bindings: &Bindings) -> Vec<&'src str> {
    node.descendants()
        .filter(|n| matches!(n.kind(), NodeKind::Variable | NodeKind::PathParam))
        .filter(|n| bindings.lookup(n).is_none())
        .map(Node::text)
        .collect()
}

/// Text of `node` with every bound placeholder replaced by its value.
///
/// A path parameter is replaced including its `:`. Unbound
/// placeholders are left as written.
#[must_use]
pub fn substitute(node: &Node<'_>, bindings: &Bindings) -> String {
    let base = node.span().start;
    let text = node.text();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for placeholder in node
        .descendants()
        .filter(|n| matches!(n.kind(), NodeKind::Variable | NodeKind::PathParam))
    {
        let Some(value) = bindings.lookup(placeholder) else {
            continue;
        };
        let span = placeholder.span();
        out.push_str(&text[cursor..span.start - base]);
        out.push_str(value);
        cursor = span.end - base;
    }
    out.push_str(&text[cursor..]);
    out
}
