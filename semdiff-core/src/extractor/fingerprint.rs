//! Canonical structural form of statement lists.
//!
//! A body is serialized as an S-expression over its syntax nodes: every
//! named node contributes its kind, leaves also their source text, and
//! anonymous tokens (keywords, operators) their spelling. Positions,
//! whitespace, comments and line continuations never reach the output.

use std::fmt::Write;

use tree_sitter::Node;

use crate::parser::helpers::{get_node_text, is_extra, named_statements};
use crate::types::Fingerprint;

/// Anonymous tokens whose presence never changes the parsed structure.
const SEPARATOR_TOKENS: &[&str] = &[",", ";"];

/// Fingerprint of a `block` node and whether it is trivial.
pub fn fingerprint_block(block: &Node, source: &str) -> (Fingerprint, bool) {
    let statements = named_statements(block);
    let is_trivial = is_trivial_body(&statements);

    let mut canonical = String::from("[");
    for (i, statement) in statements.iter().enumerate() {
        if i > 0 {
            canonical.push(' ');
        }
        write_canonical(statement, source, &mut canonical);
    }
    canonical.push(']');

    (Fingerprint::from_canonical(canonical), is_trivial)
}

/// Empty, or a single `pass` / `...` statement.
fn is_trivial_body(statements: &[Node]) -> bool {
    match statements {
        [] => true,
        [only] => is_no_op(only),
        _ => false,
    }
}

fn is_no_op(statement: &Node) -> bool {
    match statement.kind() {
        "pass_statement" => true,
        "expression_statement" => {
            let inner = named_statements(statement);
            matches!(inner.as_slice(), [expr] if expr.kind() == "ellipsis")
        }
        _ => false,
    }
}

fn is_ignored(node: &Node) -> bool {
    is_extra(node)
        || node.kind() == "string_end"
        || (!node.is_named() && SEPARATOR_TOKENS.contains(&node.kind()))
}

/// Kind written for a node. Bare and parenthesized tuples share one form,
/// as do bare and parenthesized tuple patterns.
fn canonical_kind(kind: &str) -> &str {
    match kind {
        "expression_list" => "tuple",
        "pattern_list" => "tuple_pattern",
        _ => kind,
    }
}

/// Pending output while serializing a tree.
enum Step<'tree> {
    Visit { node: Node<'tree>, spaced: bool },
    Close,
}

/// Serialize `root` into `out`.
///
/// Walks with an explicit stack; left-deep operator chains can nest
/// thousands of levels.
fn write_canonical(root: &Node, source: &str, out: &mut String) {
    let mut stack = vec![Step::Visit {
        node: *root,
        spaced: false,
    }];

    while let Some(step) = stack.pop() {
        let (node, spaced) = match step {
            Step::Close => {
                out.push(')');
                continue;
            }
            Step::Visit { node, spaced } => (node, spaced),
        };
        if spaced {
            out.push(' ');
        }

        let kind = node.kind();

        // `(x)` and `x` parse to the same structure
        if kind == "parenthesized_expression" {
            if let [inner] = named_statements(&node).as_slice() {
                stack.push(Step::Visit {
                    node: *inner,
                    spaced: false,
                });
                continue;
            }
        }

        if !node.is_named() {
            let _ = write!(out, "{:?}", kind);
            continue;
        }

        match kind {
            // Keep the prefix (f, b, r...) but not the quote style
            "string_start" => {
                let prefix = get_node_text(&node, source)
                    .trim_end_matches(['"', '\''])
                    .to_ascii_lowercase();
                let _ = write!(out, "({} {:?})", kind, prefix);
                continue;
            }
            // Escape sequences are children, but the surrounding text is not
            "string_content" => {
                let _ = write!(out, "({} {:?})", kind, get_node_text(&node, source));
                continue;
            }
            _ => {}
        }

        if node.child_count() == 0 {
            let _ = write!(out, "({} {:?})", kind, get_node_text(&node, source));
            continue;
        }

        let kind = canonical_kind(kind);
        let bracketed = matches!(kind, "tuple" | "tuple_pattern");

        out.push('(');
        out.push_str(kind);
        stack.push(Step::Close);

        let mut cursor = node.walk();
        let children: Vec<Node> = node
            .children(&mut cursor)
            .filter(|child| !is_ignored(child))
            .filter(|child| !(bracketed && !child.is_named() && matches!(child.kind(), "(" | ")")))
            .collect();
        for child in children.into_iter().rev() {
            stack.push(Step::Visit {
                node: child,
                spaced: true,
            });
        }
    }
}
