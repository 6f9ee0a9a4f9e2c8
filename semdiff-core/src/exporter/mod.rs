//! Renderers for change lists: report lines, JSON and Markdown.

pub mod json;
pub mod markdown;
pub mod text;
