//! Query Result Rendering
//!
//! Presentation layered on top of the structured [`QueryResult`]: either a
//! JSON array of column-name/value objects or a plain-text table with the
//! column type under each column name. Formatting never reorders columns.

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::engine::QueryResult;
use crate::error::{DuckgateError, Result};

/// Render a result as pretty-printed JSON
///
/// One object per row, keyed by column name.
pub fn render_json(result: &QueryResult) -> Result<String> {
    let objects: Vec<serde_json::Map<String, serde_json::Value>> = result
        .rows
        .iter()
        .map(|row| result.columns.iter().cloned().zip(row.iter().cloned()).collect())
        .collect();

    serde_json::to_string_pretty(&objects)
        .map_err(|e| DuckgateError::query_failed(format!("Failed to serialize result: {e}")))
}

/// Render a result as an ASCII table
///
/// Headers carry the column name with its declared type on a second line.
#[must_use]
pub fn render_table(result: &QueryResult) -> String {
    let mut builder = Builder::default();

    let headers: Vec<String> = result
        .columns
        .iter()
        .zip(&result.column_types)
        .map(|(name, column_type)| format!("{name}\n{column_type}"))
        .collect();
    builder.push_record(headers);

    for row in &result.rows {
        builder.push_record(row.iter().map(cell_text));
    }

    let mut table = builder.build();
    table.with(Style::ascii());
    table.to_string()
}

/// Text form of one cell
fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
