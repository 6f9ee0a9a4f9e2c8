//! semdiff core - structural diff of Python source revisions.
//!
//! Compares two revisions of a Python module and reports what changed at
//! the declaration level, ignoring whitespace, comments, statement order at
//! module level and import order.
//!
//! # Features
//!
//! - **Structure extraction**: imports, functions, classes and methods from a tree-sitter tree
//! - **Rename detection**: bodies compared by position-independent fingerprint
//! - **Signature comparison**: positional parameter names of functions kept by name
//! - **Deterministic output**: a fixed, documented ordering of change records
//! - **Parallel batches**: independent file pairs diffed concurrently via Rayon
//! - **Multiple export formats**: report lines, JSON, Markdown
//!
//! # Usage
//!
//! ```
//! use semdiff_core::{exporter, identify_semantic_changes};
//!
//! let changes = identify_semantic_changes("import os\n", "import os, sys\n").unwrap();
//! assert_eq!(exporter::text::render_all(&changes), vec!["Dependency Added: sys"]);
//! ```

pub mod config;
pub mod differ;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod parser;
pub mod pipeline;
pub mod types;

pub use config::DiffConfig;
pub use differ::{diff_structures, ChangeCategory, ChangeRecord, DiffReport, DiffSummary};
pub use error::{Result, Revision, SemdiffError};
pub use extractor::extract_structure;
pub use parser::{parse_python, ParseError, SyntaxError, SyntaxTree};
pub use pipeline::{
    diff_batch, diff_files, diff_sources, identify_semantic_changes, BatchOutcome, FilePair,
};
pub use types::{
    Declaration, DeclarationKind, Fingerprint, Scope, ScopeDeclarations, StructureBuilder,
    StructureMap,
};

/// Get the version of semdiff-core.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
