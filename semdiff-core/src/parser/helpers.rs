//! Helper functions for tree-sitter AST navigation.

use tree_sitter::Node;

/// Node kinds the grammar allows anywhere; never part of program structure.
const EXTRA_KINDS: &[&str] = &["comment", "line_continuation"];

/// Get the text content of a node.
pub fn get_node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    let start = node.start_byte();
    let end = node.end_byte();
    if start < source.len() && end <= source.len() && start < end {
        &source[start..end]
    } else {
        ""
    }
}

/// Whether a node is a comment or line continuation.
pub fn is_extra(node: &Node) -> bool {
    EXTRA_KINDS.contains(&node.kind())
}

/// Named children of a node, skipping extras.
pub fn named_statements<'a>(node: &Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    let statements = node
        .named_children(&mut cursor)
        .filter(|child| !is_extra(child))
        .collect();
    statements
}

/// Find the first child of a specific type.
#[allow(clippy::manual_find)]
pub fn find_child_by_type<'a>(node: &Node<'a>, type_name: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == type_name {
            return Some(child);
        }
    }
    None
}

/// Dotted module path with surrounding whitespace removed (`os . path` -> `os.path`).
pub fn dotted_name_text(node: &Node, source: &str) -> String {
    let mut cursor = node.walk();
    let parts: Vec<&str> = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "identifier")
        .map(|child| get_node_text(&child, source))
        .collect();

    if parts.is_empty() {
        get_node_text(node, source).trim().to_string()
    } else {
        parts.join(".")
    }
}

/// 1-based (line, column) of a node's start.
pub fn get_start_position(node: &Node) -> (usize, usize) {
    let point = node.start_position();
    (point.row + 1, point.column + 1)
}
