//! Exporters for equipment kinds that map straight onto their records.

use std::io::Write;

use serde_json::Value;

use x4data::macros::MacroDatabase;
use x4data::vfs::GameFs;

use super::{write_structured, Format, Table};

/// Collect the full property maps of every record of the given classes,
/// keyed by record id.
fn collect<F: GameFs>(
    db: &MacroDatabase<F>,
    classes: &[&str],
) -> serde_json::Map<String, Value> {
    let mut records = serde_json::Map::new();

    for class in classes {
        for name in db.names_by_class(class) {
            if let Some(record) = db.get(name) {
                records.insert(name.clone(), Value::Object(record.properties.clone()));
            }
        }
    }

    records
}

fn export_kind<F: GameFs, W: Write>(
    db: &MacroDatabase<F>,
    classes: &[&str],
    columns: &[&str],
    writer: W,
    format: Format,
) -> anyhow::Result<()> {
    let records = collect(db, classes);

    if format.is_tabular() {
        let mut table = Table::with_columns(columns);
        let mut ids: Vec<&String> = records.keys().collect();
        ids.sort();

        for id in ids {
            if let Some(Value::Object(props)) = records.get(id.as_str()) {
                table.push_record(id, props, columns);
            }
        }

        table.write_csv(writer)?;
        Ok(())
    } else {
        write_structured(&records, format, writer)
    }
}

/// Export engines and thrusters.
///
/// # Errors
/// Returns an error if writing or serialization fails.
pub fn export_engines<F: GameFs, W: Write>(
    db: &MacroDatabase<F>,
    writer: W,
    format: Format,
) -> anyhow::Result<()> {
    const COLUMNS: &[&str] = &[
        "name",
        "makerrace",
        "size",
        "thrust_forward",
        "thrust_reverse",
        "thrust_strafe",
        "boost_thrust",
        "boost_duration",
        "travel_thrust",
        "travel_charge",
        "hull",
    ];
    export_kind(db, &["engine"], COLUMNS, writer, format)
}

/// Export shield generators.
///
/// # Errors
/// Returns an error if writing or serialization fails.
pub fn export_shields<F: GameFs, W: Write>(
    db: &MacroDatabase<F>,
    writer: W,
    format: Format,
) -> anyhow::Result<()> {
    const COLUMNS: &[&str] = &[
        "name",
        "makerrace",
        "size",
        "capacity",
        "recharge_rate",
        "recharge_delay",
        "hull",
    ];
    export_kind(db, &["shieldgenerator"], COLUMNS, writer, format)
}

/// Export weapons, turrets and bomb launchers.
///
/// # Errors
/// Returns an error if writing or serialization fails.
pub fn export_weapons<F: GameFs, W: Write>(
    db: &MacroDatabase<F>,
    writer: W,
    format: Format,
) -> anyhow::Result<()> {
    const COLUMNS: &[&str] = &[
        "name",
        "makerrace",
        "size",
        "bullet_class",
        "rotation_speed",
        "rotation_accel",
        "reload_rate",
        "reload_time",
        "heat_overheat",
        "hull",
    ];
    export_kind(db, &["weapon", "turret", "bomblauncher"], COLUMNS, writer, format)
}

/// Export missile launchers and missile turrets.
///
/// # Errors
/// Returns an error if writing or serialization fails.
pub fn export_missilelaunchers<F: GameFs, W: Write>(
    db: &MacroDatabase<F>,
    writer: W,
    format: Format,
) -> anyhow::Result<()> {
    const COLUMNS: &[&str] = &[
        "name",
        "makerrace",
        "size",
        "bullet_class",
        "capacity",
        "ammunition",
        "rotation_speed",
        "hull",
    ];
    export_kind(
        db,
        &["missilelauncher", "missileturret"],
        COLUMNS,
        writer,
        format,
    )
}
