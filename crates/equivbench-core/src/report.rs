//! Renderers for comparison tables.
//!
//! Markdown for PR comments and terminals, and a JSON artifact carrying the
//! raw value matrix and styles for other renderers.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::compare::{Style, StyledTable, Value};
use crate::error::{BenchError, Result};

pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// Persisted comparison artifact.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableArtifact {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub title: String,
    #[serde(flatten)]
    pub table: StyledTable,
}

impl TableArtifact {
    pub fn new(title: impl Into<String>, table: StyledTable) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            title: title.into(),
            table,
        }
    }
}

fn render_cell(value: &Value, style: Style) -> String {
    let text = value.to_string();
    match style {
        Style::Bold if !text.is_empty() => format!("**{text}**"),
        Style::Failure => format!("_{text}_"),
        _ => text,
    }
}

/// Render a styled table as GitHub-flavoured markdown.
pub fn render_table_md(table: &StyledTable) -> String {
    let mut out = String::new();
    out.push_str("| Name |");
    for column in &table.table.columns {
        out.push_str(&format!(" {column} |"));
    }
    out.push('\n');
    out.push_str("|---|");
    for _ in &table.table.columns {
        out.push_str("---:|");
    }
    out.push('\n');

    for (row, styles) in table.table.rows.iter().zip(&table.styles) {
        out.push_str(&format!("| {} |", row.benchmark));
        for (value, style) in row.values.iter().zip(styles) {
            out.push_str(&format!(" {} |", render_cell(value, *style)));
        }
        out.push('\n');
    }
    out
}

/// Write the markdown rendering to `path`.
pub fn write_table_md(path: &Path, table: &StyledTable) -> Result<()> {
    std::fs::write(path, render_table_md(table)).map_err(|e| BenchError::io(path, e))
}

/// Write the artifact as pretty JSON to `path`.
pub fn write_table_json(path: &Path, artifact: &TableArtifact) -> Result<()> {
    let content = serde_json::to_string_pretty(artifact)?;
    std::fs::write(path, content).map_err(|e| BenchError::io(path, e))
}
