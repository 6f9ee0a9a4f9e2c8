//! JSON format exporter.

use crate::config::DiffConfig;
use crate::differ::{ChangeRecord, DiffReport};

/// Export a change list to JSON.
pub fn export(changes: &[ChangeRecord], config: &DiffConfig) -> Result<String, serde_json::Error> {
    if config.pretty_json {
        serde_json::to_string_pretty(changes)
    } else {
        serde_json::to_string(changes)
    }
}

/// Export a full report (changes, summary, timing) to JSON.
pub fn export_report(report: &DiffReport, config: &DiffConfig) -> Result<String, serde_json::Error> {
    if config.pretty_json {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
}
