//! Python syntax parsing.
//!
//! Wraps the tree-sitter Python grammar behind a parse-or-fail contract:
//! tree-sitter recovers from malformed input by inserting `ERROR` and
//! `MISSING` nodes, so any tree containing them is reported as a
//! [`SyntaxError`] instead of being handed to the extractor.

use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

pub(crate) mod helpers;

use helpers::{get_node_text, get_start_position};

/// Longest excerpt of offending source quoted in a syntax error.
const MAX_EXCERPT_CHARS: usize = 40;

/// A successfully parsed Python module together with its source text.
pub struct SyntaxTree {
    tree: Tree,
    source: String,
}

impl SyntaxTree {
    /// The `module` node.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("root", &self.root().kind())
            .field("source_len", &self.source.len())
            .finish()
    }
}

/// Malformed source, located at the first error node in document order.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{message} (line {line}, column {column})")]
pub struct SyntaxError {
    pub message: String,
    /// 1-based.
    pub line: usize,
    /// 1-based.
    pub column: usize,
}

/// Parse failures.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("{0}")]
    Language(String),
}

/// Parse Python source into a syntax tree.
pub fn parse_python(source: &str) -> Result<SyntaxTree, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ParseError::Language(format!("Failed to set Python language: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::Language("Failed to parse Python source".to_string()))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(describe_error(&root, source).into());
    }

    Ok(SyntaxTree {
        tree,
        source: source.to_string(),
    })
}

/// Build a `SyntaxError` for a tree whose root reports `has_error()`.
fn describe_error(root: &Node, source: &str) -> SyntaxError {
    let Some(node) = first_error_node(*root) else {
        let (line, column) = get_start_position(root);
        return SyntaxError {
            message: "invalid syntax".to_string(),
            line,
            column,
        };
    };

    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let excerpt: String = get_node_text(&node, source)
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .chars()
            .take(MAX_EXCERPT_CHARS)
            .collect();
        if excerpt.is_empty() {
            "invalid syntax".to_string()
        } else {
            format!("unexpected `{}`", excerpt)
        }
    };

    let (line, column) = get_start_position(&node);
    SyntaxError {
        message,
        line,
        column,
    }
}

/// First `ERROR` or `MISSING` node in document order.
///
/// Iterates with a cursor and only descends into subtrees flagged
/// `has_error()`.
fn first_error_node(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}
