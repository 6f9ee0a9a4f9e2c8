//! Error types for semdiff-core.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for semdiff-core operations.
pub type Result<T> = std::result::Result<T, SemdiffError>;

/// Which side of a comparison a source text belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Revision {
    Old,
    New,
}

impl Revision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Revision::Old => "old",
            Revision::New => "new",
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while comparing two revisions.
#[derive(Error, Debug)]
pub enum SemdiffError {
    /// One of the revisions is not valid Python. Reported before any extraction.
    #[error(
        "could not compare: syntax error in {revision} revision at line {line}, column {column}: {message}"
    )]
    Syntax {
        /// Revision that failed to parse.
        revision: Revision,
        /// Description of the offending token.
        message: String,
        /// 1-based line of the first error.
        line: usize,
        /// 1-based column of the first error.
        column: usize,
    },

    /// A tree did not have the shape the parser guarantees.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// The Python grammar could not be loaded into the parser.
    #[error("Failed to load Python grammar: {0}")]
    Language(String),

    /// IO error reading a revision from disk.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON error for config documents and exports.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SemdiffError {
    /// Revision that failed to parse, if this is a syntax error.
    pub fn revision(&self) -> Option<Revision> {
        match self {
            SemdiffError::Syntax { revision, .. } => Some(*revision),
            _ => None,
        }
    }
}
