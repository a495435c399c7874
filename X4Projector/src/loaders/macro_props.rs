//! Per-class macro property extraction.
//!
//! Flat translation tables from a macro's `<properties>` node into output
//! fields. One function per class family; all of them are registered in
//! [`super::registry`].

use serde_json::json;

use x4data::lang::LanguageResolver;
use x4data::macros::Properties;
use x4data::xml::XmlNode;

use super::helpers::{attr_f64, attr_i64, attr_value, localized};

pub(crate) fn ship(lang: &LanguageResolver, class: &str, node: &XmlNode) -> Properties {
    let mut props = Properties::new();

    props.insert(
        "name".to_string(),
        localized(lang, node.attr_at("identification", "name")),
    );
    props.insert(
        "class".to_string(),
        json!(class.strip_prefix("ship_").unwrap_or(class)),
    );

    props.insert(
        "missile_storage".to_string(),
        json!(attr_i64(node, "storage", "missile", 0)),
    );
    props.insert("hull".to_string(), json!(attr_i64(node, "hull", "max", 0)));
    props.insert("purpose".to_string(), attr_value(node, "purpose", "primary"));
    props.insert("type".to_string(), attr_value(node, "ship", "type"));
    props.insert(
        "people".to_string(),
        json!(attr_i64(node, "people", "capacity", 0)),
    );
    props.insert("mass".to_string(), json!(attr_f64(node, "physics", "mass", 0.0)));
    props.insert(
        "gas_gatherrate".to_string(),
        json!(attr_i64(node, "gatherrate", "gas", 0)),
    );

    for axis in ["pitch", "yaw", "roll"] {
        props.insert(
            format!("inertia_{axis}"),
            json!(attr_f64(node, "physics/inertia", axis, 0.0)),
        );
    }

    for axis in [
        "forward",
        "reverse",
        "horizontal",
        "vertical",
        "pitch",
        "yaw",
        "roll",
    ] {
        props.insert(
            format!("drag_{axis}"),
            json!(attr_f64(node, "physics/drag", axis, 0.0)),
        );
    }

    props
}

pub(crate) fn spacesuit(lang: &LanguageResolver, node: &XmlNode) -> Properties {
    let mut props = Properties::new();

    props.insert(
        "name".to_string(),
        localized(lang, node.attr_at("identification", "name")),
    );
    props.insert("hull".to_string(), json!(attr_i64(node, "hull", "max", 0)));
    props.insert("mass".to_string(), json!(attr_f64(node, "physics", "mass", 0.0)));
    props.insert(
        "oxygen_maxtime".to_string(),
        json!(attr_i64(node, "oxygen", "maxtime", 0)),
    );
    props.insert(
        "oxygen_warningtime".to_string(),
        json!(attr_i64(node, "oxygen", "warningtime", 0)),
    );

    props
}

pub(crate) fn storage(node: &XmlNode) -> Properties {
    let mut props = Properties::new();

    props.insert("cargobay".to_string(), json!(attr_i64(node, "cargo", "max", 0)));
    props.insert("storage_type".to_string(), attr_value(node, "cargo", "tags"));

    props
}

/// Shared `identification` fields: localized name and description plus the
/// maker race.
fn identification(lang: &LanguageResolver, node: &XmlNode, props: &mut Properties) {
    props.insert(
        "name".to_string(),
        localized(lang, node.attr_at("identification", "name")),
    );
    props.insert(
        "makerrace".to_string(),
        attr_value(node, "identification", "makerrace"),
    );
    props.insert(
        "description".to_string(),
        localized(lang, node.attr_at("identification", "description")),
    );
}

/// Shared `hull` fields for equipment.
fn equipment_hull(node: &XmlNode, props: &mut Properties) {
    props.insert("hull".to_string(), json!(attr_i64(node, "hull", "max", -1)));
    props.insert(
        "hull_integrated".to_string(),
        json!(attr_i64(node, "hull", "integrated", 0)),
    );
    props.insert(
        "hull_threshold".to_string(),
        json!(attr_f64(node, "hull", "threshold", 0.0)),
    );
}

pub(crate) fn engine(lang: &LanguageResolver, node: &XmlNode) -> Properties {
    let mut props = Properties::new();

    identification(lang, node, &mut props);

    for field in ["duration", "thrust", "release", "attack"] {
        props.insert(
            format!("boost_{field}"),
            json!(attr_f64(node, "boost", field, 0.0)),
        );
    }
    for field in ["charge", "attack", "thrust", "release"] {
        props.insert(
            format!("travel_{field}"),
            json!(attr_f64(node, "travel", field, 0.0)),
        );
    }
    for field in ["forward", "reverse", "strafe", "pitch", "yaw", "roll"] {
        props.insert(
            format!("thrust_{field}"),
            json!(attr_f64(node, "thrust", field, 0.0)),
        );
    }
    for field in ["pitch", "roll"] {
        props.insert(
            format!("angular_{field}"),
            json!(attr_f64(node, "angular", field, 0.0)),
        );
    }

    equipment_hull(node, &mut props);

    props
}

pub(crate) fn dockingbay(lang: &LanguageResolver, node: &XmlNode) -> Properties {
    let mut props = Properties::new();

    props.insert(
        "name".to_string(),
        localized(lang, node.attr_at("identification", "name")),
    );
    props.insert(
        "description".to_string(),
        localized(lang, node.attr_at("identification", "description")),
    );

    props.insert("docksize".to_string(), attr_value(node, "docksize", "tags"));
    props.insert(
        "dock_external".to_string(),
        json!(attr_i64(node, "dock", "external", 0)),
    );
    props.insert(
        "dock_capacity".to_string(),
        json!(attr_i64(node, "dock", "capacity", 1)),
    );
    props.insert(
        "dock_allow".to_string(),
        json!(attr_i64(node, "dock", "allow", 1)),
    );
    props.insert(
        "dock_storage".to_string(),
        json!(attr_i64(node, "dock", "storage", 0)),
    );

    props
}

pub(crate) fn dockarea(lang: &LanguageResolver, node: &XmlNode) -> Properties {
    let mut props = Properties::new();

    props.insert(
        "name".to_string(),
        localized(lang, node.attr_at("identification", "name")),
    );
    props.insert(
        "description".to_string(),
        localized(lang, node.attr_at("identification", "description")),
    );

    props
}

pub(crate) fn shieldgenerator(lang: &LanguageResolver, node: &XmlNode) -> Properties {
    let mut props = Properties::new();

    identification(lang, node, &mut props);

    props.insert(
        "capacity".to_string(),
        json!(attr_i64(node, "recharge", "max", 0)),
    );
    props.insert(
        "recharge_rate".to_string(),
        json!(attr_f64(node, "recharge", "rate", 0.0)),
    );
    props.insert(
        "recharge_delay".to_string(),
        json!(attr_f64(node, "recharge", "delay", 0.0)),
    );

    equipment_hull(node, &mut props);

    props
}

pub(crate) fn weapon(lang: &LanguageResolver, node: &XmlNode) -> Properties {
    let mut props = Properties::new();

    identification(lang, node, &mut props);

    props.insert("bullet_class".to_string(), attr_value(node, "bullet", "class"));

    props.insert(
        "heat_overheat".to_string(),
        json!(attr_i64(node, "heat", "overheat", 0)),
    );
    props.insert(
        "heat_cooldelay".to_string(),
        json!(attr_f64(node, "heat", "cooldelay", 0.0)),
    );
    props.insert(
        "heat_coolrate".to_string(),
        json!(attr_i64(node, "heat", "coolrate", 0)),
    );
    props.insert(
        "heat_reenable".to_string(),
        json!(attr_i64(node, "heat", "reenable", 0)),
    );

    props.insert(
        "rotation_speed".to_string(),
        json!(attr_f64(node, "rotationspeed", "max", 0.0)),
    );
    props.insert(
        "rotation_accel".to_string(),
        json!(attr_f64(node, "rotationacceleration", "max", 0.0)),
    );

    props.insert(
        "reload_rate".to_string(),
        json!(attr_f64(node, "reload", "rate", 0.0)),
    );
    props.insert(
        "reload_time".to_string(),
        json!(attr_f64(node, "reload", "time", 0.0)),
    );

    for field in ["factor", "time", "delay"] {
        props.insert(
            format!("zoom_{field}"),
            json!(attr_f64(node, "zoom", field, 0.0)),
        );
    }

    equipment_hull(node, &mut props);
    props.insert(
        "hull_hittable".to_string(),
        json!(attr_i64(node, "hull", "hittable", 1)),
    );

    props
}

pub(crate) fn bullet(node: &XmlNode) -> Properties {
    let mut props = Properties::new();

    props.insert("speed".to_string(), json!(attr_i64(node, "bullet", "speed", 0)));
    props.insert(
        "lifetime".to_string(),
        json!(attr_f64(node, "bullet", "lifetime", 0.0)),
    );
    props.insert("range".to_string(), json!(attr_i64(node, "bullet", "range", 0)));
    props.insert("amount".to_string(), json!(attr_i64(node, "bullet", "amount", 0)));
    props.insert(
        "barrelamount".to_string(),
        json!(attr_i64(node, "bullet", "barrelamount", 0)),
    );
    props.insert(
        "timediff".to_string(),
        json!(attr_f64(node, "bullet", "timediff", 0.0)),
    );
    props.insert("angle".to_string(), json!(attr_f64(node, "bullet", "angle", 0.0)));
    props.insert(
        "maxhits".to_string(),
        json!(attr_i64(node, "bullet", "maxhits", 0)),
    );
    props.insert(
        "ricochet".to_string(),
        json!(attr_f64(node, "bullet", "ricochet", 0.0)),
    );
    props.insert(
        "restitution".to_string(),
        json!(attr_f64(node, "bullet", "restitution", 0.0)),
    );
    props.insert("scale".to_string(), json!(attr_i64(node, "bullet", "scale", 0)));
    props.insert("attach".to_string(), json!(attr_i64(node, "bullet", "attach", 0)));
    props.insert(
        "chargetime".to_string(),
        json!(attr_f64(node, "bullet", "chargetime", 0.0)),
    );

    props.insert("heat".to_string(), json!(attr_i64(node, "heat", "value", 0)));
    props.insert(
        "heat_initial".to_string(),
        json!(attr_i64(node, "heat", "initial", 0)),
    );

    props.insert(
        "reload_rate".to_string(),
        json!(attr_f64(node, "reload", "rate", 0.0)),
    );
    props.insert(
        "reload_time".to_string(),
        json!(attr_f64(node, "reload", "time", 0.0)),
    );

    // hull/shield damage fall back to the plain damage value
    let damage_value = attr_i64(node, "damage", "value", 0);
    props.insert(
        "dmg_hull".to_string(),
        json!(attr_i64(node, "damage", "hull", damage_value)),
    );
    props.insert(
        "dmg_shields".to_string(),
        json!(attr_i64(node, "damage", "shield", damage_value)),
    );
    props.insert("dmg_min".to_string(), json!(attr_i64(node, "damage", "min", -1)));
    props.insert("dmg_max".to_string(), json!(attr_i64(node, "damage", "max", -1)));
    props.insert(
        "dmg_repair".to_string(),
        json!(attr_i64(node, "damage", "repair", 0)),
    );
    props.insert(
        "dmg_delay".to_string(),
        json!(attr_i64(node, "damage", "delay", 0)),
    );
    props.insert(
        "dmg_mining_mult".to_string(),
        json!(attr_i64(node, "damage/multiplier", "mining", 1)),
    );

    props
}

pub(crate) fn missilelauncher(lang: &LanguageResolver, node: &XmlNode) -> Properties {
    let mut props = Properties::new();

    identification(lang, node, &mut props);

    props.insert("bullet_class".to_string(), attr_value(node, "bullet", "class"));
    props.insert(
        "rotation_speed".to_string(),
        json!(attr_f64(node, "rotationspeed", "max", 0.0)),
    );
    props.insert(
        "capacity".to_string(),
        json!(attr_i64(node, "storage", "capacity", 0)),
    );
    props.insert(
        "ammunition".to_string(),
        attr_value(node, "ammunition", "tags"),
    );

    equipment_hull(node, &mut props);
    props.insert(
        "hull_hittable".to_string(),
        json!(attr_i64(node, "hull", "hittable", 1)),
    );

    props
}

pub(crate) fn missile(lang: &LanguageResolver, node: &XmlNode) -> Properties {
    let mut props = Properties::new();

    identification(lang, node, &mut props);

    props.insert(
        "amount".to_string(),
        json!(attr_i64(node, "missile", "amount", 1)),
    );
    props.insert(
        "barrelamount".to_string(),
        json!(attr_i64(node, "missile", "barrelamount", 1)),
    );
    props.insert(
        "lifetime".to_string(),
        json!(attr_f64(node, "missile", "lifetime", 0.0)),
    );
    props.insert(
        "range".to_string(),
        json!(attr_i64(node, "missile", "range", 0)),
    );
    props.insert(
        "retarget".to_string(),
        json!(attr_i64(node, "missile", "retarget", 0)),
    );
    props.insert(
        "guided".to_string(),
        json!(attr_i64(node, "missile", "guided", 0)),
    );
    props.insert(
        "distribute".to_string(),
        json!(attr_i64(node, "missile", "distribute", 0)),
    );

    let explosion_value = attr_i64(node, "explosiondamage", "value", 0);
    props.insert(
        "damage_hull".to_string(),
        json!(attr_i64(node, "explosiondamage", "hull", explosion_value)),
    );
    props.insert(
        "damage_shield".to_string(),
        json!(attr_i64(node, "explosiondamage", "shield", explosion_value)),
    );

    props.insert(
        "reload_time".to_string(),
        json!(attr_f64(node, "reload", "time", 0.0)),
    );
    props.insert("hull".to_string(), json!(attr_i64(node, "hull", "max", 0)));
    props.insert(
        "countermeasure_resilience".to_string(),
        json!(attr_f64(node, "countermeasure", "resilience", -1.0)),
    );

    props.insert(
        "lock_time".to_string(),
        json!(attr_i64(node, "lock", "time", 0)),
    );
    props.insert(
        "lock_range".to_string(),
        json!(attr_i64(node, "lock", "range", -1)),
    );
    props.insert(
        "lock_angle".to_string(),
        json!(attr_f64(node, "lock", "angle", -1.0)),
    );

    props.insert("mass".to_string(), json!(attr_f64(node, "physics", "mass", 0.0)));

    for axis in ["pitch", "yaw", "roll"] {
        props.insert(
            format!("inertia_{axis}"),
            json!(attr_f64(node, "physics/inertia", axis, 0.0)),
        );
    }
    for axis in [
        "forward",
        "reverse",
        "horizontal",
        "vertical",
        "pitch",
        "yaw",
        "roll",
    ] {
        props.insert(
            format!("drag_{axis}"),
            json!(attr_f64(node, "physics/drag", axis, 0.0)),
        );
    }

    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use x4data::xml::XmlDocument;

    fn lang() -> LanguageResolver {
        let doc = XmlDocument::parse(
            "<language><page id=\"20\"><t id=\"1\"> Ion Blaster </t></page></language>",
        )
        .unwrap();
        let mut lang = LanguageResolver::new();
        lang.load_language("en", &doc);
        lang
    }

    #[test]
    fn ship_fields_with_defaults() {
        let doc = XmlDocument::parse(
            "<properties>\
               <identification name=\"{20,1}\"/>\
               <hull max=\"4200\"/>\
               <physics mass=\"135.5\">\
                 <inertia pitch=\"1.5\" yaw=\"2.5\"/>\
                 <drag forward=\"4.0\"/>\
               </physics>\
             </properties>",
        )
        .unwrap();

        let props = ship(&lang(), "ship_m", &doc.root);
        assert_eq!(props["name"], json!("Ion Blaster"));
        assert_eq!(props["class"], json!("m"));
        assert_eq!(props["hull"], json!(4200));
        assert_eq!(props["mass"], json!(135.5));
        assert_eq!(props["inertia_pitch"], json!(1.5));
        assert_eq!(props["inertia_roll"], json!(0.0));
        assert_eq!(props["drag_forward"], json!(4.0));
        assert_eq!(props["people"], json!(0));
        assert_eq!(props["purpose"], serde_json::Value::Null);
    }

    #[test]
    fn bullet_damage_falls_back_to_plain_value() {
        let doc = XmlDocument::parse(
            "<properties><damage value=\"55\" shield=\"80\"/></properties>",
        )
        .unwrap();

        let props = bullet(&doc.root);
        assert_eq!(props["dmg_hull"], json!(55));
        assert_eq!(props["dmg_shields"], json!(80));
        assert_eq!(props["dmg_min"], json!(-1));
    }

    #[test]
    fn weapon_reads_identification_and_heat() {
        let doc = XmlDocument::parse(
            "<properties>\
               <identification name=\"{20,1}\" makerrace=\"argon\" description=\"plain\"/>\
               <heat overheat=\"9000\" cooldelay=\"1.13\"/>\
               <rotationspeed max=\"48.8\"/>\
             </properties>",
        )
        .unwrap();

        let props = weapon(&lang(), &doc.root);
        assert_eq!(props["name"], json!("Ion Blaster"));
        assert_eq!(props["makerrace"], json!("argon"));
        assert_eq!(props["description"], json!("plain"));
        assert_eq!(props["heat_overheat"], json!(9000));
        assert_eq!(props["rotation_speed"], json!(48.8));
        assert_eq!(props["hull"], json!(-1));
        assert_eq!(props["hull_hittable"], json!(1));
    }
}
