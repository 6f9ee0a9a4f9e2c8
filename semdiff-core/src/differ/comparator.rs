//! Comparator logic for diffing two `StructureMap`s.
//!
//! Output order is fully determined by the inputs:
//!
//! 1. dependency additions, then removals (each ascending)
//! 2. module functions: renames, additions and removals, then signature changes
//! 3. module classes: renames, additions and removals
//! 4. for each class present in both revisions, ascending by class name:
//!    its functions' renames, additions and removals, then signature changes
//!
//! Within a (scope, kind) group, removed names are paired with added names
//! as renames by scanning both in ascending lexical order. Renames come
//! first; the unpaired additions and removals follow, merged by name.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, trace};

use crate::differ::changes::ChangeRecord;
use crate::types::{DeclarationKind, Scope, ScopeDeclarations, StructureMap};

/// Compute the ordered change list between two revisions.
pub fn diff_structures(old: &StructureMap, new: &StructureMap) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();

    diff_dependencies(old, new, &mut changes);

    let empty = ScopeDeclarations::new();
    let old_globals = old.globals().unwrap_or(&empty);
    let new_globals = new.globals().unwrap_or(&empty);

    diff_declarations(&Scope::Global, DeclarationKind::Function, old_globals, new_globals, &mut changes);
    diff_signatures(&Scope::Global, old_globals, new_globals, &mut changes);
    diff_declarations(&Scope::Global, DeclarationKind::Class, old_globals, new_globals, &mut changes);

    // Classes on only one side were reported above; their members are not enumerated
    let old_classes: BTreeSet<&str> = old.class_names().collect();
    let new_classes: BTreeSet<&str> = new.class_names().collect();

    for class_name in old_classes.intersection(&new_classes) {
        let scope = Scope::class(*class_name);
        let old_members = old.scope(&scope).unwrap_or(&empty);
        let new_members = new.scope(&scope).unwrap_or(&empty);

        diff_declarations(&scope, DeclarationKind::Function, old_members, new_members, &mut changes);
        diff_signatures(&scope, old_members, new_members, &mut changes);
    }

    debug!(
        "Diffed {} -> {} declarations: {} changes",
        old.declaration_count(),
        new.declaration_count(),
        changes.len()
    );
    changes
}

/// Dependency additions, then removals, each in ascending order.
fn diff_dependencies(old: &StructureMap, new: &StructureMap, changes: &mut Vec<ChangeRecord>) {
    for name in new.dependencies().difference(old.dependencies()) {
        changes.push(ChangeRecord::DependencyAdded { name: name.clone() });
    }
    for name in old.dependencies().difference(new.dependencies()) {
        changes.push(ChangeRecord::DependencyRemoved { name: name.clone() });
    }
}

/// Added, removed and renamed declarations of one kind within one scope.
fn diff_declarations(
    scope: &Scope,
    kind: DeclarationKind,
    old: &ScopeDeclarations,
    new: &ScopeDeclarations,
    changes: &mut Vec<ChangeRecord>,
) {
    let old_names: BTreeSet<&str> = names_of_kind(old, kind);
    let new_names: BTreeSet<&str> = names_of_kind(new, kind);

    let removed: Vec<&str> = old_names.difference(&new_names).copied().collect();
    let added: Vec<&str> = new_names.difference(&old_names).copied().collect();

    let mut handled_removals: HashSet<&str> = HashSet::new();
    let mut handled_additions: HashSet<&str> = HashSet::new();

    for old_name in removed.iter().copied() {
        let old_decl = &old[old_name];

        let matched = added.iter().copied().find(|new_name| {
            !handled_additions.contains(new_name) && old_decl.is_rename_candidate(&new[*new_name])
        });

        if let Some(new_name) = matched {
            trace!("Paired rename {} -> {} in {} scope", old_name, new_name, scope);
            handled_removals.insert(old_name);
            handled_additions.insert(new_name);
            changes.push(ChangeRecord::Renamed {
                kind,
                old_name: old_name.to_string(),
                new_name: new_name.to_string(),
                scope: scope.clone(),
            });
        }
    }

    // Unpaired names interleave by name; a name is never both added and removed
    let mut leftovers: Vec<(&str, bool)> = added
        .iter()
        .filter(|name| !handled_additions.contains(*name))
        .map(|name| (*name, true))
        .chain(
            removed
                .iter()
                .filter(|name| !handled_removals.contains(*name))
                .map(|name| (*name, false)),
        )
        .collect();
    leftovers.sort_unstable();

    for (name, is_addition) in leftovers {
        let name = name.to_string();
        let scope = scope.clone();
        changes.push(if is_addition {
            ChangeRecord::Added { kind, name, scope }
        } else {
            ChangeRecord::Removed { kind, name, scope }
        });
    }
}

/// Positional parameter changes for functions kept under the same name.
fn diff_signatures(
    scope: &Scope,
    old: &ScopeDeclarations,
    new: &ScopeDeclarations,
    changes: &mut Vec<ChangeRecord>,
) {
    for (name, old_decl) in old.iter().filter(|(_, decl)| decl.is_function()) {
        let Some(new_decl) = new.get(name).filter(|decl| decl.is_function()) else {
            continue;
        };

        if old_decl.params != new_decl.params {
            changes.push(ChangeRecord::SignatureChanged {
                name: name.clone(),
                scope: scope.clone(),
                old_params: old_decl.params.clone(),
                new_params: new_decl.params.clone(),
            });
        }
    }
}

fn names_of_kind(decls: &ScopeDeclarations, kind: DeclarationKind) -> BTreeSet<&str> {
    decls
        .values()
        .filter(|decl| decl.kind == kind)
        .map(|decl| decl.name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract_structure;
    use crate::parser::parse_python;
    use crate::types::{Declaration, Fingerprint, StructureBuilder};

    fn structure(source: &str) -> StructureMap {
        extract_structure(&parse_python(source).unwrap()).unwrap()
    }

    fn diff(old: &str, new: &str) -> Vec<ChangeRecord> {
        diff_structures(&structure(old), &structure(new))
    }

    fn added(kind: DeclarationKind, name: &str, scope: Scope) -> ChangeRecord {
        ChangeRecord::Added {
            kind,
            name: name.to_string(),
            scope,
        }
    }

    fn removed(kind: DeclarationKind, name: &str, scope: Scope) -> ChangeRecord {
        ChangeRecord::Removed {
            kind,
            name: name.to_string(),
            scope,
        }
    }

    fn renamed(kind: DeclarationKind, old: &str, new: &str, scope: Scope) -> ChangeRecord {
        ChangeRecord::Renamed {
            kind,
            old_name: old.to_string(),
            new_name: new.to_string(),
            scope,
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    use DeclarationKind::{Class, Function};

    #[test]
    fn test_identical_sources_produce_no_changes() {
        let source = r#"
import os
def my_function():
    print("Hello")
class MyClass:
    def method(self, a):
        return a
"#;
        assert!(diff(source, source).is_empty());
    }

    #[test]
    fn test_function_added() {
        assert_eq!(
            diff("pass", "def new_func():\n    return 42"),
            vec![added(Function, "new_func", Scope::Global)]
        );
    }

    #[test]
    fn test_function_removed() {
        assert_eq!(
            diff("def old_func():\n    return 42", "pass"),
            vec![removed(Function, "old_func", Scope::Global)]
        );
    }

    #[test]
    fn test_function_renamed() {
        assert_eq!(
            diff("def old_name():\n    return 1 + 2", "def new_name():\n    return 1 + 2"),
            vec![renamed(Function, "old_name", "new_name", Scope::Global)]
        );
    }

    #[test]
    fn test_body_change_under_same_name_not_reported() {
        assert!(diff("def my_func():\n    return 1", "def my_func():\n    return 2").is_empty());
    }

    #[test]
    fn test_trivial_bodies_never_paired() {
        assert_eq!(
            diff("def f(): pass", "def g(): pass"),
            vec![
                removed(Function, "f", Scope::Global),
                added(Function, "g", Scope::Global),
            ]
        );
    }

    #[test]
    fn test_dependencies_sorted() {
        assert_eq!(
            diff("import os", "import os, sys\nfrom collections import defaultdict"),
            vec![
                ChangeRecord::DependencyAdded {
                    name: "collections".to_string()
                },
                ChangeRecord::DependencyAdded {
                    name: "sys".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_dependencies_added_before_removed() {
        assert_eq!(
            diff("import zlib\nimport abc", "import yaml"),
            vec![
                ChangeRecord::DependencyAdded {
                    name: "yaml".to_string()
                },
                ChangeRecord::DependencyRemoved {
                    name: "abc".to_string()
                },
                ChangeRecord::DependencyRemoved {
                    name: "zlib".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_method_signature_changed() {
        let old = "class Calc:\n    def add(self, a, b):\n        return a + b\n";
        let new = "class Calc:\n    def add(self, a, b, c):\n        return a + b\n";
        assert_eq!(
            diff(old, new),
            vec![ChangeRecord::SignatureChanged {
                name: "add".to_string(),
                scope: Scope::class("Calc"),
                old_params: strings(&["self", "a", "b"]),
                new_params: strings(&["self", "a", "b", "c"]),
            }]
        );
    }

    #[test]
    fn test_parameter_rename_is_signature_change() {
        let changes = diff("def f(a):\n    return 1", "def f(b):\n    return 1");
        assert_eq!(
            changes,
            vec![ChangeRecord::SignatureChanged {
                name: "f".to_string(),
                scope: Scope::Global,
                old_params: strings(&["a"]),
                new_params: strings(&["b"]),
            }]
        );
    }

    #[test]
    fn test_annotations_and_defaults_ignored() {
        let old = "def f(a, b=1):\n    return a\n";
        let new = "def f(a: int, b: int = 2, *args, key=None, **kwargs) -> int:\n    return a\n";
        assert!(diff(old, new).is_empty());
    }

    #[test]
    fn test_renamed_function_not_signature_compared() {
        let changes = diff("def f(a):\n    return 7", "def g(a, b):\n    return 7");
        assert_eq!(changes, vec![renamed(Function, "f", "g", Scope::Global)]);
    }

    #[test]
    fn test_class_renamed() {
        let old = "class OldClassName:\n    def method(self):\n        return 'hello'";
        let new = "class NewClassName:\n    def method(self):\n        return 'hello'";
        assert_eq!(
            diff(old, new),
            vec![renamed(Class, "OldClassName", "NewClassName", Scope::Global)]
        );
    }

    #[test]
    fn test_one_sided_class_members_not_enumerated() {
        let old = "pass";
        let new = "class NewClass:\n    def a(self):\n        return 1\n    def b(self):\n        return 2\n";
        assert_eq!(diff(old, new), vec![added(Class, "NewClass", Scope::Global)]);
    }

    #[test]
    fn test_rename_pairing_is_lexical() {
        let body = "    return compute()\n";
        let old = format!("def b():\n{body}\ndef a():\n{body}");
        let new = format!("def y():\n{body}\ndef x():\n{body}");
        assert_eq!(
            diff(&old, &new),
            vec![
                renamed(Function, "a", "x", Scope::Global),
                renamed(Function, "b", "y", Scope::Global),
            ]
        );
    }

    #[test]
    fn test_rename_leftovers_reported() {
        let old = "def keep_a():\n    return 1\n\ndef gone():\n    return 2\n";
        let new = "def keep_b():\n    return 1\n\ndef fresh():\n    return 3\n";
        assert_eq!(
            diff(old, new),
            vec![
                renamed(Function, "keep_a", "keep_b", Scope::Global),
                added(Function, "fresh", Scope::Global),
                removed(Function, "gone", Scope::Global),
            ]
        );
    }

    #[test]
    fn test_function_to_class_with_same_name() {
        let changes = diff("def Thing():\n    return 1\n", "class Thing:\n    x = 1\n");
        assert_eq!(
            changes,
            vec![
                removed(Function, "Thing", Scope::Global),
                added(Class, "Thing", Scope::Global),
            ]
        );
    }

    #[test]
    fn test_full_ordering() {
        let old = r#"
import os

class Zeta:
    def run(self, a):
        return a
    def stop(self):
        return None

class Alpha:
    def go(self):
        return 1

class Gone:
    def x(self):
        return 0

def helper(a):
    return a * 2
"#;
        let new = r#"
import json

def helper(a, b):
    return a * 2

class Alpha:
    def go(self):
        return 1
    def extra(self):
        return 2

class Zeta:
    def execute(self, a):
        return a
    def stop(self, force):
        return None
"#;
        assert_eq!(
            diff(old, new),
            vec![
                ChangeRecord::DependencyAdded {
                    name: "json".to_string()
                },
                ChangeRecord::DependencyRemoved {
                    name: "os".to_string()
                },
                ChangeRecord::SignatureChanged {
                    name: "helper".to_string(),
                    scope: Scope::Global,
                    old_params: strings(&["a"]),
                    new_params: strings(&["a", "b"]),
                },
                removed(Class, "Gone", Scope::Global),
                added(Function, "extra", Scope::class("Alpha")),
                renamed(Function, "run", "execute", Scope::class("Zeta")),
                ChangeRecord::SignatureChanged {
                    name: "stop".to_string(),
                    scope: Scope::class("Zeta"),
                    old_params: strings(&["self"]),
                    new_params: strings(&["self", "force"]),
                },
            ]
        );
    }

    #[test]
    fn test_inputs_not_mutated_and_deterministic() {
        let old = structure("def a():\n    return 1\ndef b():\n    return 1\n");
        let new = structure("def c():\n    return 1\ndef d():\n    return 1\n");
        let (old_copy, new_copy) = (old.clone(), new.clone());

        let first = diff_structures(&old, &new);
        let second = diff_structures(&old, &new);

        assert_eq!(first, second);
        assert_eq!(old, old_copy);
        assert_eq!(new, new_copy);
    }

    #[test]
    fn test_builder_maps_without_global_declarations() {
        let fp = Fingerprint::from_canonical("[(return_statement)]".to_string());
        let mut builder = StructureBuilder::new();
        builder.add_dependency("os");
        builder.add_declaration(Declaration::function("f", Scope::Global, vec![], fp, false));
        let old = builder.build();
        let new = StructureBuilder::new().build();

        assert_eq!(
            diff_structures(&old, &new),
            vec![
                ChangeRecord::DependencyRemoved {
                    name: "os".to_string()
                },
                removed(Function, "f", Scope::Global),
            ]
        );
    }
}
