//! Semantic diff engine for comparing two revisions of a Python module.
//!
//! Works on the `StructureMap`s produced by the extractor, so cosmetic edits
//! (whitespace, comments, declaration order, import order) never show up.
//!
//! # Features
//!
//! - **Dependency diffing**: module-level imports added or removed
//! - **Declaration diffing**: functions, classes and methods added or removed
//! - **Rename detection**: structurally identical, non-trivial bodies under a new name
//! - **Signature changes**: positional parameter lists of functions kept by name
//!
//! # Example
//!
//! ```
//! use semdiff_core::differ::{diff_structures, ChangeRecord};
//! use semdiff_core::{extract_structure, parse_python, DeclarationKind, Scope};
//!
//! let old = extract_structure(&parse_python("def old_name():\n    return 1 + 2\n").unwrap()).unwrap();
//! let new = extract_structure(&parse_python("def new_name():\n    return 1 + 2\n").unwrap()).unwrap();
//!
//! assert_eq!(
//!     diff_structures(&old, &new),
//!     vec![ChangeRecord::Renamed {
//!         kind: DeclarationKind::Function,
//!         old_name: "old_name".to_string(),
//!         new_name: "new_name".to_string(),
//!         scope: Scope::Global,
//!     }]
//! );
//! ```

pub mod changes;
pub mod comparator;

pub use changes::{ChangeCategory, ChangeRecord, DiffReport, DiffSummary};
pub use comparator::diff_structures;
