//! Ship exporter.
//!
//! A ship row is its own macro's properties plus everything folded in from
//! connection-reachable records: cargo bay and storage tags from `storage`
//! macros, dock and launch tube counts from `dockingbay` macros. The
//! database must be closure-resolved first or rows come out incomplete.

use std::collections::HashSet;
use std::io::Write;

use serde_json::{json, Value};

use x4data::macros::{Connection, MacroDatabase, Properties};
use x4data::vfs::GameFs;

use super::{write_structured, Format, Table};
use crate::loaders::SHIP_SIZES;

const COLUMNS: &[&str] = &[
    "name",
    "class",
    "type",
    "purpose",
    "hull",
    "people",
    "cargobay",
    "storage",
    "missile_storage",
    "drone_storage",
    "num_engines",
    "num_shields",
    "num_weapons",
    "num_turrets",
    "num_countermeasures",
    "s_docks",
    "m_docks",
    "shipstorage_s",
    "shipstorage_m",
    "launchtubes_s",
    "launchtubes_m",
    "mass",
    "drag_forward",
    "drag_reverse",
    "drag_horizontal",
    "drag_vertical",
    "drag_pitch",
    "drag_yaw",
    "drag_roll",
    "inertia_pitch",
    "inertia_yaw",
    "inertia_roll",
];

/// Export ships of every size class.
///
/// # Errors
/// Returns an error if writing or serialization fails.
pub fn export_ships<F: GameFs, W: Write>(
    db: &MacroDatabase<F>,
    writer: W,
    format: Format,
) -> anyhow::Result<()> {
    let ships = collect_ships(db);

    if format.is_tabular() {
        let mut table = Table::with_columns(COLUMNS);
        let mut ids: Vec<&String> = ships.keys().collect();
        ids.sort();

        for id in ids {
            if let Some(Value::Object(props)) = ships.get(id.as_str()) {
                table.push_record(id, props, COLUMNS);
            }
        }

        table.write_csv(writer)?;
        Ok(())
    } else {
        write_structured(&ships, format, writer)
    }
}

fn collect_ships<F: GameFs>(db: &MacroDatabase<F>) -> serde_json::Map<String, Value> {
    let mut ships = serde_json::Map::new();

    for size in SHIP_SIZES {
        for id in db.names_by_class(&format!("ship_{size}")) {
            let Some(record) = db.get(id) else {
                continue;
            };

            let mut ship = record.properties.clone();
            ship.insert("dockingbays".to_string(), json!([]));
            ship.insert("cargobay".to_string(), json!(0));
            ship.insert("storage".to_string(), json!([]));
            for key in [
                "s_docks",
                "m_docks",
                "drone_storage",
                "shipstorage_s",
                "shipstorage_m",
                "launchtubes_s",
                "launchtubes_m",
            ] {
                ship.insert(key.to_string(), json!(0));
            }

            let mut visited = HashSet::new();
            fold_connections(db, &record.connections, &mut ship, id, &mut visited);

            ships.insert(id.clone(), Value::Object(ship));
        }
    }

    ships
}

/// Walk the connection graph and fold reachable records into the ship.
/// Records are visited once; connection graphs may share subtrees.
fn fold_connections<F: GameFs>(
    db: &MacroDatabase<F>,
    connections: &[Connection],
    ship: &mut Properties,
    ship_id: &str,
    visited: &mut HashSet<String>,
) {
    for connection in connections {
        let Some(record) = db.get(&connection.target) else {
            continue;
        };
        if !visited.insert(record.name.clone()) {
            continue;
        }

        match record.class.as_str() {
            "cockpit" | "dockarea" | "buildmodule" | "buildprocessor" => {}
            "dockingbay" => fold_dockingbay(record.name.as_str(), &record.properties, ship),
            "storage" => {
                if let Some(cargobay) = record.properties.get("cargobay") {
                    ship.insert("cargobay".to_string(), cargobay.clone());
                }
                let storage_tags: Vec<&str> = record
                    .properties
                    .get("storage_type")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .split_whitespace()
                    .collect();
                ship.insert("storage".to_string(), json!(storage_tags));
            }
            other => {
                tracing::warn!(ship = ship_id, class = other, "unhandled connection class");
            }
        }

        if !record.connections.is_empty() {
            fold_connections(db, &record.connections, ship, ship_id, visited);
        }
    }
}

fn fold_dockingbay(bay_id: &str, bay: &Properties, ship: &mut Properties) {
    let mut entry = bay.clone();
    entry.insert("name".to_string(), json!(bay_id));
    if let Some(Value::Array(bays)) = ship.get_mut("dockingbays") {
        bays.push(Value::Object(entry));
    }

    let docksize = bay
        .get("docksize")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let capacity = bay.get("dock_capacity").and_then(Value::as_i64).unwrap_or(0);
    let has_size = |size: &str| docksize.split_whitespace().any(|word| word == size);

    let add = |ship: &mut Properties, key: &str| {
        let current = ship.get(key).and_then(Value::as_i64).unwrap_or(0);
        ship.insert(key.to_string(), json!(current + capacity));
    };

    if bay.get("dock_storage").and_then(Value::as_i64).unwrap_or(0) != 0 {
        if has_size("dock_xs") {
            add(ship, "drone_storage");
        }
        if has_size("dock_s") {
            add(ship, "shipstorage_s");
        }
        if has_size("dock_m") {
            add(ship, "shipstorage_m");
        }
    }

    if bay_id.starts_with("dockingbay") {
        if has_size("dock_s") {
            add(ship, "s_docks");
        }
        if has_size("dock_m") {
            add(ship, "m_docks");
        }
    }

    if bay_id.starts_with("launchtube") {
        if has_size("dock_s") {
            add(ship, "launchtubes_s");
        }
        if has_size("dock_m") {
            add(ship, "launchtubes_m");
        }
    }
}
