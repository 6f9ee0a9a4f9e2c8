//! Structure extraction from Python syntax trees.
//!
//! One pass over the module's top-level statements records imports, module
//! functions, classes and the functions defined directly in class bodies.
//! Nested functions and nested classes are not modeled. Results are
//! accumulated in a [`StructureBuilder`] owned by the call, so extraction
//! has no state between invocations.

use tracing::debug;
use tree_sitter::Node;

use crate::error::{Result, SemdiffError};
use crate::parser::helpers::{dotted_name_text, find_child_by_type, get_node_text, named_statements};
use crate::parser::SyntaxTree;
use crate::types::{Declaration, Scope, StructureBuilder, StructureMap};

pub mod fingerprint;

use fingerprint::fingerprint_block;

/// Extract the declaration structure of a parsed module.
///
/// Fails only on trees the parser should never produce: a root that is not
/// a `module`, leftover error nodes, or definitions missing required fields.
pub fn extract_structure(tree: &SyntaxTree) -> Result<StructureMap> {
    let root = tree.root();
    if root.kind() != "module" {
        return Err(SemdiffError::Precondition(format!(
            "expected a `module` root, found `{}`",
            root.kind()
        )));
    }
    if root.has_error() {
        return Err(SemdiffError::Precondition(
            "syntax tree contains error nodes".to_string(),
        ));
    }

    let source = tree.source();
    let mut builder = StructureBuilder::new();
    for statement in named_statements(&root) {
        visit_module_statement(&statement, source, &mut builder)?;
    }

    let structure = builder.build();
    debug!(
        "Extracted {} dependencies and {} declarations",
        structure.dependencies().len(),
        structure.declaration_count()
    );
    Ok(structure)
}

fn visit_module_statement(node: &Node, source: &str, builder: &mut StructureBuilder) -> Result<()> {
    match node.kind() {
        "import_statement" => extract_import(node, source, builder),
        "import_from_statement" => extract_from_import(node, source, builder),
        "future_import_statement" => builder.add_dependency("__future__"),
        "class_definition" => extract_class(node, source, builder)?,
        "function_definition" => {
            builder.add_declaration(extract_function(node, source, Scope::Global)?);
        }
        "decorated_definition" => {
            let definition = required_field(node, "definition")?;
            visit_module_statement(&definition, source, builder)?;
        }
        _ => {}
    }
    Ok(())
}

/// `import a.b, c as d` records `a.b` and `c`.
fn extract_import(node: &Node, source: &str, builder: &mut StructureBuilder) {
    for child in named_statements(node) {
        match child.kind() {
            "dotted_name" => builder.add_dependency(dotted_name_text(&child, source)),
            "aliased_import" => {
                if let Some(name) = child.child_by_field_name("name") {
                    builder.add_dependency(dotted_name_text(&name, source));
                }
            }
            _ => {}
        }
    }
}

/// `from a.b import c` records `a.b`; `from .pkg import c` records `pkg`.
fn extract_from_import(node: &Node, source: &str, builder: &mut StructureBuilder) {
    let Some(module) = node.child_by_field_name("module_name") else {
        return;
    };

    match module.kind() {
        "dotted_name" => builder.add_dependency(dotted_name_text(&module, source)),
        "relative_import" => {
            if let Some(name) = find_child_by_type(&module, "dotted_name") {
                builder.add_dependency(dotted_name_text(&name, source));
            }
        }
        _ => {}
    }
}

/// Record a class and the functions defined directly in its body.
fn extract_class(node: &Node, source: &str, builder: &mut StructureBuilder) -> Result<()> {
    let name = get_node_text(&required_field(node, "name")?, source).to_string();
    let body = required_field(node, "body")?;

    let (fingerprint, is_trivial) = fingerprint_block(&body, source);
    builder.add_declaration(Declaration::class(name.clone(), fingerprint, is_trivial));

    let scope = Scope::class(name);
    for statement in named_statements(&body) {
        let definition = match statement.kind() {
            "decorated_definition" => required_field(&statement, "definition")?,
            _ => statement,
        };
        if definition.kind() == "function_definition" {
            builder.add_declaration(extract_function(&definition, source, scope.clone())?);
        }
    }
    Ok(())
}

/// Build a function declaration; `async def` is handled the same way.
fn extract_function(node: &Node, source: &str, scope: Scope) -> Result<Declaration> {
    let name = get_node_text(&required_field(node, "name")?, source).to_string();
    let params = match node.child_by_field_name("parameters") {
        Some(parameters) => positional_parameters(&parameters, source),
        None => Vec::new(),
    };
    let body = required_field(node, "body")?;
    let (fingerprint, is_trivial) = fingerprint_block(&body, source);

    Ok(Declaration::function(name, scope, params, fingerprint, is_trivial))
}

/// Names of the parameters that can be passed positionally.
///
/// Stops at the first `*`, `*args` or `**kwargs`; everything after those is
/// keyword-only. Annotations and defaults are not part of the name list.
fn positional_parameters(node: &Node, source: &str) -> Vec<String> {
    let mut params = Vec::new();

    for child in named_statements(node) {
        match child.kind() {
            "identifier" => params.push(get_node_text(&child, source).to_string()),
            "typed_parameter" => match child.named_child(0) {
                Some(inner) if inner.kind() == "identifier" => {
                    params.push(get_node_text(&inner, source).to_string());
                }
                // `*args: int` or `**kwargs: str`
                _ => break,
            },
            "default_parameter" | "typed_default_parameter" => {
                if let Some(name) = child.child_by_field_name("name") {
                    if name.kind() == "identifier" {
                        params.push(get_node_text(&name, source).to_string());
                    }
                }
            }
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
            _ => {}
        }
    }

    params
}

fn required_field<'a>(node: &Node<'a>, field: &str) -> Result<Node<'a>> {
    node.child_by_field_name(field).ok_or_else(|| {
        SemdiffError::Precondition(format!("`{}` node without `{}`", node.kind(), field))
    })
}
