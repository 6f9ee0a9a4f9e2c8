//! Plain-text report lines.
//!
//! Module-level changes render as `Function Added: name`,
//! `Class Renamed: 'Old' to 'New'`, `Dependency Removed: os`. Members of a
//! class are qualified with the class name (`Service.run`).

use crate::differ::ChangeRecord;
use crate::error::{Result, SemdiffError};

/// Render one change as a report line.
pub fn render(change: &ChangeRecord) -> String {
    match change {
        ChangeRecord::DependencyAdded { name } => format!("Dependency Added: {}", name),
        ChangeRecord::DependencyRemoved { name } => format!("Dependency Removed: {}", name),
        ChangeRecord::Added { kind, name, scope } => {
            format!("{} Added: {}", kind.label(), scope.qualify(name))
        }
        ChangeRecord::Removed { kind, name, scope } => {
            format!("{} Removed: {}", kind.label(), scope.qualify(name))
        }
        ChangeRecord::Renamed {
            kind,
            old_name,
            new_name,
            scope,
        } => format!(
            "{} Renamed: '{}' to '{}'",
            kind.label(),
            scope.qualify(old_name),
            scope.qualify(new_name)
        ),
        ChangeRecord::SignatureChanged {
            name,
            scope,
            old_params,
            new_params,
        } => {
            let qualified = scope.qualify(name);
            format!(
                "Function Signature Changed: {}({}) -> {}({})",
                qualified,
                old_params.join(", "),
                qualified,
                new_params.join(", ")
            )
        }
    }
}

/// Render every change, preserving order.
pub fn render_all(changes: &[ChangeRecord]) -> Vec<String> {
    changes.iter().map(render).collect()
}

/// Render a pipeline outcome. A failed comparison becomes a single line.
pub fn render_outcome(outcome: &Result<Vec<ChangeRecord>>) -> Vec<String> {
    match outcome {
        Ok(changes) => render_all(changes),
        Err(err @ SemdiffError::Syntax { .. }) => vec![format!("Syntax error in code: {}", err)],
        Err(err) => vec![format!("Error: {}", err)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Revision;
    use crate::types::{DeclarationKind, Scope};

    #[test]
    fn test_render_dependency_lines() {
        let added = ChangeRecord::DependencyAdded {
            name: "os".to_string(),
        };
        let removed = ChangeRecord::DependencyRemoved {
            name: "sys".to_string(),
        };
        assert_eq!(render(&added), "Dependency Added: os");
        assert_eq!(render(&removed), "Dependency Removed: sys");
    }

    #[test]
    fn test_render_declaration_lines() {
        let added = ChangeRecord::Added {
            kind: DeclarationKind::Function,
            name: "new_func".to_string(),
            scope: Scope::Global,
        };
        let removed = ChangeRecord::Removed {
            kind: DeclarationKind::Class,
            name: "OldClass".to_string(),
            scope: Scope::Global,
        };
        let renamed = ChangeRecord::Renamed {
            kind: DeclarationKind::Function,
            old_name: "old_name".to_string(),
            new_name: "new_name".to_string(),
            scope: Scope::Global,
        };
        assert_eq!(render(&added), "Function Added: new_func");
        assert_eq!(render(&removed), "Class Removed: OldClass");
        assert_eq!(render(&renamed), "Function Renamed: 'old_name' to 'new_name'");
    }

    #[test]
    fn test_render_member_lines_are_qualified() {
        let renamed = ChangeRecord::Renamed {
            kind: DeclarationKind::Function,
            old_name: "run".to_string(),
            new_name: "execute".to_string(),
            scope: Scope::class("Job"),
        };
        let signature = ChangeRecord::SignatureChanged {
            name: "add".to_string(),
            scope: Scope::class("Calc"),
            old_params: vec!["a".to_string(), "b".to_string()],
            new_params: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        };
        assert_eq!(render(&renamed), "Function Renamed: 'Job.run' to 'Job.execute'");
        assert_eq!(
            render(&signature),
            "Function Signature Changed: Calc.add(a, b) -> Calc.add(a, b, c)"
        );
    }

    #[test]
    fn test_render_outcome_syntax_error() {
        let outcome: Result<Vec<ChangeRecord>> = Err(SemdiffError::Syntax {
            revision: Revision::Old,
            message: "unexpected `)`".to_string(),
            line: 3,
            column: 7,
        });
        let lines = render_outcome(&outcome);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Syntax error in code:"));
        assert!(lines[0].contains("old revision"));
    }

    #[test]
    fn test_render_outcome_changes() {
        let outcome: Result<Vec<ChangeRecord>> = Ok(vec![]);
        assert!(render_outcome(&outcome).is_empty());
    }
}
