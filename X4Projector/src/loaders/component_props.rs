//! Per-class component property extraction.
//!
//! Components carry the structural data macros lack: connection points for
//! mounted equipment (counted for ships) and the size tags of equipment
//! hardpoints.

use serde_json::json;

use x4data::macros::Properties;
use x4data::xml::XmlNode;

use super::helpers::{component_size, tagged_connections};

pub(crate) fn ship(node: &XmlNode) -> Properties {
    let mut props = Properties::new();

    for (key, tag) in [
        ("num_engines", "engine"),
        ("num_shields", "shield"),
        ("num_weapons", "weapon"),
        ("num_turrets", "turret"),
        ("num_countermeasures", "countermeasures"),
    ] {
        props.insert(key.to_string(), json!(tagged_connections(node, tag).count()));
    }

    props
}

pub(crate) fn shieldgenerator(name: &str, node: &XmlNode) -> Properties {
    let mut props = Properties::new();
    props.insert("size".to_string(), component_size(node, name, "shield"));
    props
}

pub(crate) fn engine(name: &str, node: &XmlNode) -> Properties {
    let mut props = Properties::new();

    if name.starts_with("engine_") {
        props.insert("size".to_string(), component_size(node, name, "engine"));
    } else if name.starts_with("thruster_") {
        props.insert("size".to_string(), component_size(node, name, "thruster"));
    }
    // generic_* engine components carry no size

    props
}

pub(crate) fn weapon(name: &str, node: &XmlNode) -> Properties {
    let mut props = Properties::new();
    props.insert("size".to_string(), component_size(node, name, "weapon"));
    props
}

pub(crate) fn turret(name: &str, node: &XmlNode) -> Properties {
    let mut props = Properties::new();
    props.insert("size".to_string(), component_size(node, name, "turret"));
    props
}

pub(crate) fn bomblauncher(name: &str, node: &XmlNode) -> Properties {
    let mut props = Properties::new();
    props.insert("size".to_string(), component_size(node, name, "bomblauncher"));
    props
}

pub(crate) fn missilelauncher(name: &str, node: &XmlNode) -> Properties {
    let mut props = Properties::new();
    props.insert("size".to_string(), component_size(node, name, "missile"));
    props
}
