//! Markdown format exporter.

use crate::differ::{ChangeRecord, DiffReport};
use crate::types::Scope;

/// Export a report to Markdown, one section per scope in engine order.
pub fn export(report: &DiffReport) -> String {
    let mut lines = Vec::new();

    lines.push(format!("# Semantic diff: {}", report.path));
    lines.push(String::new());
    lines.push(format!("> {}", report.summary_text));
    lines.push(String::new());

    if !report.has_changes() {
        return lines.join("\n");
    }

    let dependencies: Vec<&ChangeRecord> = report
        .changes
        .iter()
        .filter(|c| c.is_dependency_change())
        .collect();
    if !dependencies.is_empty() {
        lines.push("## Dependencies".to_string());
        lines.push(String::new());
        for change in dependencies {
            lines.push(export_change(change));
        }
        lines.push(String::new());
    }

    // Changes are already grouped by scope, global first
    let mut current: Option<&Scope> = None;
    for change in &report.changes {
        let Some(scope) = change.scope() else {
            continue;
        };
        if current != Some(scope) {
            if current.is_some() {
                lines.push(String::new());
            }
            lines.push(scope_heading(scope));
            lines.push(String::new());
            current = Some(scope);
        }
        lines.push(export_change(change));
    }
    lines.push(String::new());

    lines.join("\n")
}

fn scope_heading(scope: &Scope) -> String {
    match scope {
        Scope::Global => "## Module".to_string(),
        Scope::Class(name) => format!("## Class `{}`", name),
    }
}

fn export_change(change: &ChangeRecord) -> String {
    match change {
        ChangeRecord::DependencyAdded { name } => format!("- added `{}`", name),
        ChangeRecord::DependencyRemoved { name } => format!("- removed `{}`", name),
        ChangeRecord::Added { kind, name, .. } => format!("- {} `{}` added", kind.as_str(), name),
        ChangeRecord::Removed { kind, name, .. } => {
            format!("- {} `{}` removed", kind.as_str(), name)
        }
        ChangeRecord::Renamed {
            kind,
            old_name,
            new_name,
            ..
        } => format!("- {} `{}` renamed to `{}`", kind.as_str(), old_name, new_name),
        ChangeRecord::SignatureChanged {
            name,
            old_params,
            new_params,
            ..
        } => format!(
            "- function `{}` signature `({})` -> `({})`",
            name,
            old_params.join(", "),
            new_params.join(", ")
        ),
    }
}
