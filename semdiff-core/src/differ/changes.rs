//! Change records and result structures for semantic diff.

use serde::{Deserialize, Serialize};

use crate::types::{DeclarationKind, Scope};

/// Category of a change record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCategory {
    DependencyAdded,
    DependencyRemoved,
    Added,
    Removed,
    Renamed,
    SignatureChanged,
}

impl ChangeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeCategory::DependencyAdded => "dependency_added",
            ChangeCategory::DependencyRemoved => "dependency_removed",
            ChangeCategory::Added => "added",
            ChangeCategory::Removed => "removed",
            ChangeCategory::Renamed => "renamed",
            ChangeCategory::SignatureChanged => "signature_changed",
        }
    }
}

/// A single semantic change between two revisions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ChangeRecord {
    DependencyAdded {
        name: String,
    },
    DependencyRemoved {
        name: String,
    },
    Added {
        kind: DeclarationKind,
        name: String,
        scope: Scope,
    },
    Removed {
        kind: DeclarationKind,
        name: String,
        scope: Scope,
    },
    Renamed {
        kind: DeclarationKind,
        old_name: String,
        new_name: String,
        scope: Scope,
    },
    /// Positional parameter list differs; always a function matched by name.
    SignatureChanged {
        name: String,
        scope: Scope,
        old_params: Vec<String>,
        new_params: Vec<String>,
    },
}

impl ChangeRecord {
    pub fn category(&self) -> ChangeCategory {
        match self {
            ChangeRecord::DependencyAdded { .. } => ChangeCategory::DependencyAdded,
            ChangeRecord::DependencyRemoved { .. } => ChangeCategory::DependencyRemoved,
            ChangeRecord::Added { .. } => ChangeCategory::Added,
            ChangeRecord::Removed { .. } => ChangeCategory::Removed,
            ChangeRecord::Renamed { .. } => ChangeCategory::Renamed,
            ChangeRecord::SignatureChanged { .. } => ChangeCategory::SignatureChanged,
        }
    }

    /// Declaration kind; `None` for dependency changes.
    pub fn kind(&self) -> Option<DeclarationKind> {
        match self {
            ChangeRecord::DependencyAdded { .. } | ChangeRecord::DependencyRemoved { .. } => None,
            ChangeRecord::Added { kind, .. }
            | ChangeRecord::Removed { kind, .. }
            | ChangeRecord::Renamed { kind, .. } => Some(*kind),
            ChangeRecord::SignatureChanged { .. } => Some(DeclarationKind::Function),
        }
    }

    /// Scope of the declaration; `None` for dependency changes.
    pub fn scope(&self) -> Option<&Scope> {
        match self {
            ChangeRecord::DependencyAdded { .. } | ChangeRecord::DependencyRemoved { .. } => None,
            ChangeRecord::Added { scope, .. }
            | ChangeRecord::Removed { scope, .. }
            | ChangeRecord::Renamed { scope, .. }
            | ChangeRecord::SignatureChanged { scope, .. } => Some(scope),
        }
    }

    /// Name the change is about. Renames report the new name.
    pub fn name(&self) -> &str {
        match self {
            ChangeRecord::DependencyAdded { name }
            | ChangeRecord::DependencyRemoved { name }
            | ChangeRecord::Added { name, .. }
            | ChangeRecord::Removed { name, .. }
            | ChangeRecord::SignatureChanged { name, .. } => name,
            ChangeRecord::Renamed { new_name, .. } => new_name,
        }
    }

    pub fn is_dependency_change(&self) -> bool {
        self.kind().is_none()
    }
}

/// Summary statistics for a diff.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub dependencies_added: u32,
    pub dependencies_removed: u32,

    pub functions_added: u32,
    pub functions_removed: u32,
    pub functions_renamed: u32,

    pub classes_added: u32,
    pub classes_removed: u32,
    pub classes_renamed: u32,

    pub methods_added: u32,
    pub methods_removed: u32,
    pub methods_renamed: u32,

    pub signatures_changed: u32,
}

impl DiffSummary {
    pub fn from_changes(changes: &[ChangeRecord]) -> Self {
        let mut summary = Self::default();
        for change in changes {
            summary.record(change);
        }
        summary
    }

    /// Increment the counter for one change. Functions inside a class count as methods.
    pub fn record(&mut self, change: &ChangeRecord) {
        let in_class = change.scope().is_some_and(|scope| !scope.is_global());

        match change {
            ChangeRecord::DependencyAdded { .. } => self.dependencies_added += 1,
            ChangeRecord::DependencyRemoved { .. } => self.dependencies_removed += 1,
            ChangeRecord::SignatureChanged { .. } => self.signatures_changed += 1,
            ChangeRecord::Added { kind, .. } => match (kind, in_class) {
                (DeclarationKind::Class, _) => self.classes_added += 1,
                (DeclarationKind::Function, true) => self.methods_added += 1,
                (DeclarationKind::Function, false) => self.functions_added += 1,
            },
            ChangeRecord::Removed { kind, .. } => match (kind, in_class) {
                (DeclarationKind::Class, _) => self.classes_removed += 1,
                (DeclarationKind::Function, true) => self.methods_removed += 1,
                (DeclarationKind::Function, false) => self.functions_removed += 1,
            },
            ChangeRecord::Renamed { kind, .. } => match (kind, in_class) {
                (DeclarationKind::Class, _) => self.classes_renamed += 1,
                (DeclarationKind::Function, true) => self.methods_renamed += 1,
                (DeclarationKind::Function, false) => self.functions_renamed += 1,
            },
        }
    }

    pub fn total(&self) -> u32 {
        self.dependencies_added
            + self.dependencies_removed
            + self.functions_added
            + self.functions_removed
            + self.functions_renamed
            + self.classes_added
            + self.classes_removed
            + self.classes_renamed
            + self.methods_added
            + self.methods_removed
            + self.methods_renamed
            + self.signatures_changed
    }

    /// Generate human-readable summary string.
    pub fn text(&self) -> String {
        let mut parts = Vec::new();

        push_group(
            &mut parts,
            "dependencies",
            &[("added", self.dependencies_added), ("removed", self.dependencies_removed)],
        );
        push_group(
            &mut parts,
            "functions",
            &[
                ("added", self.functions_added),
                ("removed", self.functions_removed),
                ("renamed", self.functions_renamed),
            ],
        );
        push_group(
            &mut parts,
            "classes",
            &[
                ("added", self.classes_added),
                ("removed", self.classes_removed),
                ("renamed", self.classes_renamed),
            ],
        );
        push_group(
            &mut parts,
            "methods",
            &[
                ("added", self.methods_added),
                ("removed", self.methods_removed),
                ("renamed", self.methods_renamed),
            ],
        );
        push_group(&mut parts, "signatures", &[("changed", self.signatures_changed)]);

        if parts.is_empty() {
            "No changes".to_string()
        } else {
            parts.join("; ")
        }
    }
}

fn push_group(parts: &mut Vec<String>, label: &str, counts: &[(&str, u32)]) {
    let group: Vec<String> = counts
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(verb, count)| format!("{} {}", count, verb))
        .collect();
    if !group.is_empty() {
        parts.push(format!("{}: {}", label, group.join(", ")));
    }
}

/// Complete result of diffing one file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DiffReport {
    /// Path or label of the compared file
    pub path: String,

    /// All changes, in engine order
    pub changes: Vec<ChangeRecord>,

    /// Summary statistics
    pub summary: DiffSummary,

    /// Human-readable summary text
    pub summary_text: String,

    /// Duration of parse, extraction and diff in milliseconds
    pub duration_ms: f64,
}

impl DiffReport {
    pub fn from_changes(path: impl Into<String>, changes: Vec<ChangeRecord>) -> Self {
        let summary = DiffSummary::from_changes(&changes);
        let summary_text = summary.text();
        Self {
            path: path.into(),
            changes,
            summary,
            summary_text,
            duration_ms: 0.0,
        }
    }

    /// Finalize the report with timing.
    pub fn finalize(&mut self, duration_ms: f64) {
        self.duration_ms = duration_ms;
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.changes.len()
    }

    pub fn filter_category(&self, category: ChangeCategory) -> Vec<&ChangeRecord> {
        self.changes
            .iter()
            .filter(|c| c.category() == category)
            .collect()
    }

    pub fn filter_scope(&self, scope: &Scope) -> Vec<&ChangeRecord> {
        self.changes
            .iter()
            .filter(|c| c.scope() == Some(scope))
            .collect()
    }
}
