//! Printing query results

use comfy_table::{ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;
use shopgraph_gremlin::Row;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Columns in first-seen order across all rows
fn columns(rows: &[Row]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn format_value(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, format_value(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(items) => items.iter().map(format_value).collect::<Vec<_>>().join(", "),
    }
}

/// Build a table of rows; missing cells are left blank
pub fn table(rows: &[Row]) -> Table {
    let columns = columns(rows);
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(&columns);

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| row.get(c).map(format_value).unwrap_or_default())
            .collect();
        table.add_row(cells);
    }
    table
}

/// Render rows in the given format
pub fn format_rows(rows: &[Row], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(rows),
        OutputFormat::Table => {
            if rows.is_empty() {
                "(no results)".to_string()
            } else {
                format!("{}\n{} row(s)", table(rows), rows.len())
            }
        }
    }
}

/// Render any serializable value as pretty JSON
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}

/// Print a heading followed by rows
pub fn print_rows(heading: &str, rows: &[Row], format: OutputFormat) {
    println!("\n{}", heading);
    println!("{}", format_rows(rows, format));
}
