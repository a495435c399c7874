//! Output formatting.
//!
//! Two kinds of output: *tabular* (CSV, a fixed column selection per object
//! kind) and *structured* (JSON/YAML, the full property maps keyed by record
//! id and sorted for stable diffs).

mod equipment;
mod ships;
mod wares;

pub use equipment::{export_engines, export_missilelaunchers, export_shields, export_weapons};
pub use ships::export_ships;
pub use wares::export_wares;

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::bail;
use serde_json::Value;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Tabular, omits some information.
    Csv,
    /// Structured.
    Json,
    /// Structured.
    Yaml,
}

impl Format {
    /// Default file extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// Whether this format takes rows rather than a value tree.
    #[must_use]
    pub fn is_tabular(self) -> bool {
        matches!(self, Format::Csv)
    }
}

/// A tabular view: header plus one row per record.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table with an `id` column followed by `columns`.
    #[must_use]
    pub fn with_columns(columns: &[&str]) -> Self {
        let mut header = vec!["id".to_string()];
        header.extend(columns.iter().map(ToString::to_string));
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Append a record row: its id plus the selected property values.
    pub fn push_record(&mut self, id: &str, props: &serde_json::Map<String, Value>, columns: &[&str]) {
        let mut row = vec![Value::String(id.to_string())];
        row.extend(columns.iter().map(|col| props.get(*col).cloned().unwrap_or(Value::Null)));
        self.rows.push(row);
    }

    /// Write the table as CSV.
    ///
    /// # Errors
    /// Returns an error if the writer fails.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        let header: Vec<String> = self.header.iter().map(|h| csv_escape(h)).collect();
        writeln!(writer, "{}", header.join(","))?;

        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|v| csv_escape(&csv_cell(v))).collect();
            writeln!(writer, "{}", cells.join(","))?;
        }

        Ok(())
    }
}

/// Render one value as CSV cell text. Arrays are joined with spaces, the way
/// tags and storage lists read best in a spreadsheet.
fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(csv_cell)
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}

/// Quote a CSV cell if it contains a separator, quote or line break.
fn csv_escape(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Serialize a map of records, sorted by id, in a structured format.
///
/// # Errors
/// Returns an error for tabular formats or if serialization fails.
pub fn write_structured<W: Write>(
    records: &serde_json::Map<String, Value>,
    format: Format,
    writer: W,
) -> anyhow::Result<()> {
    let sorted: BTreeMap<&String, &Value> = records.iter().collect();

    match format {
        Format::Json => serde_json::to_writer_pretty(writer, &sorted)?,
        Format::Yaml => serde_yaml::to_writer(writer, &sorted)?,
        Format::Csv => bail!("CSV is not a structured format"),
    }

    Ok(())
}
