//! Source-to-changes orchestration.
//!
//! Both revisions are parsed before any extraction starts; the first parse
//! failure ends the comparison with a syntax error naming that revision.
//! Independent file pairs are diffed in parallel with rayon.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::DiffConfig;
use crate::differ::{diff_structures, ChangeRecord, DiffReport};
use crate::error::{Result, Revision, SemdiffError};
use crate::extractor::extract_structure;
use crate::parser::{parse_python, ParseError, SyntaxTree};

/// Compare two revisions of a Python module.
pub fn identify_semantic_changes(old_source: &str, new_source: &str) -> Result<Vec<ChangeRecord>> {
    let old_tree = parse_revision(old_source, Revision::Old)?;
    let new_tree = parse_revision(new_source, Revision::New)?;

    let old = extract_structure(&old_tree)?;
    let new = extract_structure(&new_tree)?;

    Ok(diff_structures(&old, &new))
}

/// Compare two in-memory revisions and wrap the changes in a timed report.
pub fn diff_sources(path: &str, old_source: &str, new_source: &str) -> Result<DiffReport> {
    let start = Instant::now();
    let changes = identify_semantic_changes(old_source, new_source)?;

    let mut report = DiffReport::from_changes(path, changes);
    report.finalize(start.elapsed().as_secs_f64() * 1000.0);
    debug!("{}: {}", path, report.summary_text);
    Ok(report)
}

/// Read and compare two files. The report is labelled with the new path.
pub fn diff_files(old_path: &Path, new_path: &Path) -> Result<DiffReport> {
    let old_source = read_source(old_path)?;
    let new_source = read_source(new_path)?;

    diff_sources(&new_path.display().to_string(), &old_source, &new_source)
}

/// One old/new pair of files to compare.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePair {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
}

impl FilePair {
    pub fn new(old_path: impl Into<PathBuf>, new_path: impl Into<PathBuf>) -> Self {
        Self {
            old_path: old_path.into(),
            new_path: new_path.into(),
        }
    }
}

/// Result of one pair within a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub pair: FilePair,
    pub result: Result<DiffReport>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Diff many file pairs in parallel.
///
/// Pairs share no state, so each runs independently; a failing pair does not
/// affect the others. Outcomes are returned in input order.
pub fn diff_batch(pairs: &[FilePair], config: &DiffConfig) -> Vec<BatchOutcome> {
    // Configure thread pool if specified
    let pool = match config.num_threads {
        Some(n) if n > 0 => rayon::ThreadPoolBuilder::new().num_threads(n).build().ok(),
        _ => None,
    };

    let diff_fn = |pair: &FilePair| -> BatchOutcome {
        let result = diff_files(&pair.old_path, &pair.new_path);
        if let Err(ref e) = result {
            warn!("Diff of {} failed: {}", pair.new_path.display(), e);
        }
        BatchOutcome {
            pair: pair.clone(),
            result,
        }
    };

    let outcomes: Vec<BatchOutcome> = match pool {
        Some(pool) => pool.install(|| pairs.par_iter().map(diff_fn).collect()),
        None => pairs.par_iter().map(diff_fn).collect(),
    };

    debug!(
        "Diffed {} file pairs ({} failed)",
        outcomes.len(),
        outcomes.iter().filter(|o| !o.is_ok()).count()
    );
    outcomes
}

fn parse_revision(source: &str, revision: Revision) -> Result<SyntaxTree> {
    parse_python(source).map_err(|e| match e {
        ParseError::Syntax(syntax) => SemdiffError::Syntax {
            revision,
            message: syntax.message,
            line: syntax.line,
            column: syntax.column,
        },
        ParseError::Language(message) => SemdiffError::Language(message),
    })
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| SemdiffError::Io {
        path: path.display().to_string(),
        source,
    })
}
