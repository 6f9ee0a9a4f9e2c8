//! Data models for the structure of one source revision.
//!
//! A [`StructureMap`] records the module-level imports of a file and the
//! functions and classes it declares, grouped by scope. It is assembled by a
//! [`StructureBuilder`] during a single extraction pass and is read-only
//! afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Kind of declaration tracked by the extractor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Function,
    Class,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Function => "function",
            DeclarationKind::Class => "class",
        }
    }

    /// Capitalized name used in report lines.
    pub fn label(&self) -> &'static str {
        match self {
            DeclarationKind::Function => "Function",
            DeclarationKind::Class => "Class",
        }
    }
}

/// Enclosing context of a declaration.
///
/// `Global` orders before every class scope, and class scopes order by name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Global,
    Class(String),
}

impl Scope {
    pub fn class(name: impl Into<String>) -> Self {
        Scope::Class(name.into())
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Scope::Global)
    }

    /// Dotted name of a declaration living in this scope.
    pub fn qualify(&self, name: &str) -> String {
        match self {
            Scope::Global => name.to_string(),
            Scope::Class(class) => format!("{}.{}", class, name),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str("global"),
            Scope::Class(name) => f.write_str(name),
        }
    }
}

/// Position-independent structural signature of a statement list.
///
/// Two fingerprints are equal iff their canonical forms are equal; the xxh3
/// digest is compared first so unequal bodies rarely touch the string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    digest: u64,
    canonical: String,
}

impl Fingerprint {
    pub fn from_canonical(canonical: String) -> Self {
        Self {
            digest: xxh3_64(canonical.as_bytes()),
            canonical,
        }
    }

    pub fn digest(&self) -> u64 {
        self.digest
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

/// A function or class found in one revision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub scope: Scope,
    /// Positional parameter names, in order. Always empty for classes.
    pub params: Vec<String>,
    pub fingerprint: Fingerprint,
    /// Body is empty or a lone `pass` / `...`.
    pub is_trivial_body: bool,
}

impl Declaration {
    pub fn function(
        name: impl Into<String>,
        scope: Scope,
        params: Vec<String>,
        fingerprint: Fingerprint,
        is_trivial_body: bool,
    ) -> Self {
        Self {
            name: name.into(),
            kind: DeclarationKind::Function,
            scope,
            params,
            fingerprint,
            is_trivial_body,
        }
    }

    /// Classes only exist at module level.
    pub fn class(name: impl Into<String>, fingerprint: Fingerprint, is_trivial_body: bool) -> Self {
        Self {
            name: name.into(),
            kind: DeclarationKind::Class,
            scope: Scope::Global,
            params: Vec::new(),
            fingerprint,
            is_trivial_body,
        }
    }

    pub fn is_function(&self) -> bool {
        self.kind == DeclarationKind::Function
    }

    pub fn is_class(&self) -> bool {
        self.kind == DeclarationKind::Class
    }

    /// Whether `self` (removed) and `other` (added) may be paired as a rename.
    pub fn is_rename_candidate(&self, other: &Declaration) -> bool {
        self.kind == other.kind
            && !self.is_trivial_body
            && !other.is_trivial_body
            && self.fingerprint == other.fingerprint
    }
}

/// Declarations of one scope, keyed and ordered by name.
pub type ScopeDeclarations = BTreeMap<String, Declaration>;

/// Normalized structure of one revision.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StructureMap {
    dependencies: BTreeSet<String>,
    scopes: BTreeMap<Scope, ScopeDeclarations>,
}

impl StructureMap {
    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.dependencies
    }

    pub fn scope(&self, scope: &Scope) -> Option<&ScopeDeclarations> {
        self.scopes.get(scope)
    }

    /// Module-level declarations (functions and classes).
    pub fn globals(&self) -> Option<&ScopeDeclarations> {
        self.scope(&Scope::Global)
    }

    pub fn get(&self, scope: &Scope, name: &str) -> Option<&Declaration> {
        self.scope(scope).and_then(|decls| decls.get(name))
    }

    /// Names of module-level classes, ascending.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.globals()
            .into_iter()
            .flat_map(|decls| decls.values())
            .filter(|decl| decl.is_class())
            .map(|decl| decl.name.as_str())
    }

    pub fn declaration_count(&self) -> usize {
        self.scopes.values().map(|decls| decls.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.declaration_count() == 0
    }
}

/// Accumulates one revision's structure during extraction.
///
/// Redefinitions follow last-write-wins: a later declaration replaces an
/// earlier one of the same name in the same scope, and a class redefined at
/// module level starts over with an empty member scope.
#[derive(Debug, Default)]
pub struct StructureBuilder {
    dependencies: BTreeSet<String>,
    scopes: BTreeMap<Scope, ScopeDeclarations>,
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dependency(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !name.is_empty() {
            self.dependencies.insert(name);
        }
    }

    pub fn add_declaration(&mut self, declaration: Declaration) {
        if declaration.scope.is_global() {
            let member_scope = Scope::class(declaration.name.clone());
            match declaration.kind {
                DeclarationKind::Class => {
                    self.scopes.insert(member_scope, ScopeDeclarations::new());
                }
                DeclarationKind::Function => {
                    self.scopes.remove(&member_scope);
                }
            }
        }

        self.scopes
            .entry(declaration.scope.clone())
            .or_default()
            .insert(declaration.name.clone(), declaration);
    }

    pub fn build(mut self) -> StructureMap {
        self.scopes.entry(Scope::Global).or_default();
        StructureMap {
            dependencies: self.dependencies,
            scopes: self.scopes,
        }
    }
}
