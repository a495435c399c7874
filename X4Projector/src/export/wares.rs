//! Ware exporter.

use std::io::Write;

use indexmap::IndexMap;
use serde_json::Value;

use x4data::macros::Properties;

use super::{write_structured, Format, Table};

const COLUMNS: &[&str] = &[
    "name",
    "factoryname",
    "group",
    "tags",
    "volume",
    "price_min",
    "price_max",
];

/// Export the ware catalogue assembled by the ware loader.
///
/// # Errors
/// Returns an error if writing or serialization fails.
pub fn export_wares<W: Write>(
    wares: &IndexMap<String, Properties>,
    writer: W,
    format: Format,
) -> anyhow::Result<()> {
    if format.is_tabular() {
        let mut table = Table::with_columns(COLUMNS);
        let mut ids: Vec<&String> = wares.keys().collect();
        ids.sort();

        for id in ids {
            if let Some(props) = wares.get(id.as_str()) {
                table.push_record(id, props, COLUMNS);
            }
        }

        table.write_csv(writer)?;
        Ok(())
    } else {
        let records: serde_json::Map<String, Value> = wares
            .iter()
            .map(|(id, props)| (id.clone(), Value::Object(props.clone())))
            .collect();
        write_structured(&records, format, writer)
    }
}
