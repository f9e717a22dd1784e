#![allow(dead_code)]

use urltemplate_rs::{Node, NodeKind, parse_line};

pub fn parse_ok(input: &str) -> Node<'_> {
    parse_line(input).unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"))
}

/// Kinds of the direct children of `node`.
pub fn kinds(node: &Node<'_>) -> Vec<NodeKind> {
    node.children().iter().map(Node::kind).collect()
}

/// `(kind, text)` pairs for the direct children of `node`.
pub fn pairs<'a>(node: &Node<'a>) -> Vec<(NodeKind, &'a str)> {
    node.children()
        .iter()
        .map(|c| (c.kind(), c.text()))
        .collect()
}

/// Direct child of `kind`, panicking with the tree shape if missing.
pub fn child<'n, 'a>(node: &'n Node<'a>, kind: NodeKind) -> &'n Node<'a> {
    node.child(kind)
        .unwrap_or_else(|| panic!("no {kind} child in {:?}", kinds(node)))
}

/// Every node with children is tiled exactly by them, recursively,
/// and every node's text matches its span.
pub fn assert_children_tile(source: &str, node: &Node<'_>) {
    assert_eq!(
        node.span().slice(source),
        Some(node.text()),
        "text/span mismatch at {}",
        node.kind()
    );
    if node.is_leaf() {
        return;
    }
    let mut cursor = node.span().start;
    for c in node.children() {
        assert_eq!(
            c.span().start,
            cursor,
            "gap or overlap before {} in {}",
            c.kind(),
            node.kind()
        );
        cursor = c.span().end;
        assert_children_tile(source, c);
    }
    assert_eq!(cursor, node.span().end, "children of {} stop short", node.kind());
}
