//! Configuration for batch diffs and exports.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options shared by the pipeline and the exporters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Worker threads for batch diffs; `None` or `0` uses the global rayon pool.
    pub num_threads: Option<usize>,
    /// Pretty-print JSON exports.
    pub pretty_json: bool,
}

impl DiffConfig {
    pub fn new(num_threads: Option<usize>, pretty_json: bool) -> Self {
        Self {
            num_threads,
            pretty_json,
        }
    }

    /// Load a config from a JSON document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
