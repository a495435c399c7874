//! End-to-end: catalog archives -> virtual file system -> macro closure ->
//! localized strings.

use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use x4data::lang::LanguageResolver;
use x4data::macros::{MacroDatabase, ParserRegistry, Properties};
use x4data::vfs::{ArchiveFs, GameFs};

/// Write an archive pair from `(game_path, content)` tuples.
fn write_pair(dir: &Path, stem: &str, files: &[(&str, &str)]) {
    let mut index = String::new();
    let mut data = Vec::new();

    for (path, content) in files {
        index.push_str(&format!("{path} {} 1633024000 deadbeef\n", content.len()));
        data.extend_from_slice(content.as_bytes());
    }

    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(format!("{stem}.idx")), index).unwrap();
    std::fs::write(dir.join(format!("{stem}.dat")), data).unwrap();
}

fn registry() -> ParserRegistry {
    let mut registry = ParserRegistry::new();
    registry.register_macro("ship_s", |_name, _class, node| {
        let mut props = Properties::new();
        if let Some(name) = node.attr_at("identification", "name") {
            props.insert("name".to_string(), json!(name));
        }
        if let Some(hull) = node.attr_at("hull", "max").and_then(|v| v.parse::<i64>().ok()) {
            props.insert("hull".to_string(), json!(hull));
        }
        props
    });
    registry.register_macro("engine", |_name, _class, node| {
        let mut props = Properties::new();
        if let Some(thrust) = node
            .attr_at("thrust", "forward")
            .and_then(|v| v.parse::<f64>().ok())
        {
            props.insert("thrust_forward".to_string(), json!(thrust));
        }
        props
    });
    registry
}

const SHIP_XML: &str = "<macros><macro name=\"ship_arg_s_fighter_01_macro\" class=\"ship_s\">\
    <properties><identification name=\"{20101,30302}\"/><hull max=\"1800\"/></properties>\
    <connections><connection ref=\"con_engine01\"><macro ref=\"engine_arg_s_travel_01_macro\"/></connection></connections>\
  </macro></macros>";

const ENGINE_XML: &str = "<macros><macro name=\"engine_arg_s_travel_01_macro\" class=\"engine\">\
    <properties><thrust forward=\"990.5\"/></properties>\
  </macro></macros>";

const LANG_XML: &str = "<language id=\"44\"><page id=\"20101\">\
    <t id=\"30302\">Nemesis Vanguard (PAR)</t>\
  </page></language>";

const INDEX_XML: &str = "<index>\
    <entry name=\"ship_arg_s_fighter_01_macro\" value=\"assets\\units\\size_s\\macros\\ship_arg_s_fighter_01_macro\"/>\
    <entry name=\"engine_arg_s_travel_01_macro\" value=\"assets\\props\\engines\\macros\\engine_arg_s_travel_01_macro\"/>\
  </index>";

fn game_root() -> TempDir {
    let temp = TempDir::new().unwrap();

    write_pair(
        temp.path(),
        "01",
        &[
            ("index/macros.xml", INDEX_XML),
            ("index/components.xml", "<index/>"),
            ("t/0001-L044.xml", LANG_XML),
            (
                "assets/units/size_s/macros/ship_arg_s_fighter_01_macro.xml",
                SHIP_XML,
            ),
            ("libraries/widget.xml", "BASE"),
        ],
    );

    // the engine ships in a later, higher-priority archive
    write_pair(
        temp.path(),
        "02",
        &[(
            "assets/props/engines/macros/engine_arg_s_travel_01_macro.xml",
            ENGINE_XML,
        )],
    );

    let ext_dir = temp.path().join("extensions").join("splitpack");
    write_pair(
        &ext_dir,
        "ext_01",
        &[("libraries/widget.xml", "OVERLAY-OLD")],
    );
    write_pair(&ext_dir, "ext_02", &[("libraries/widget.xml", "OVERLAY")]);

    temp
}

fn read_to_string(fs: &mut ArchiveFs, path: &str) -> String {
    let mut out = String::new();
    std::io::Read::read_to_string(&mut fs.open(path).unwrap(), &mut out).unwrap();
    out
}

#[test]
fn closure_and_localization_over_archives() {
    let temp = game_root();

    let mut fs = ArchiveFs::new(temp.path());
    assert_eq!(fs.load_from_game_root(), 2);
    fs.mount_extensions().unwrap();

    let mut resolver = LanguageResolver::new();
    resolver
        .load_language_from("en", &mut fs, "t/0001-L044.xml")
        .unwrap();

    let mut db = MacroDatabase::with_registry(fs, registry()).unwrap();
    db.load_macro_file("assets/units/size_s/macros/ship_arg_s_fighter_01_macro.xml")
        .unwrap();

    // the engine is referenced but not loaded yet
    assert_eq!(db.pending_references(), vec!["engine_arg_s_travel_01_macro"]);

    let report = db.resolve_dependencies();
    assert!(report.complete, "unresolved: {:?}", report.unresolved);
    assert_eq!(db.macros().len(), 2);

    let ship = db.get("ship_arg_s_fighter_01_macro").unwrap();
    assert_eq!(ship.properties["hull"], json!(1800));
    assert_eq!(ship.connections[0].target, "engine_arg_s_travel_01_macro");

    let engine = db.get("engine_arg_s_travel_01_macro").unwrap();
    assert_eq!(engine.properties["thrust_forward"], json!(990.5));

    // localized ship name, comments stripped
    let raw = ship.properties["name"].as_str().unwrap();
    let name = resolver.resolve(raw, None).unwrap();
    assert_eq!(name.trimmed(), "Nemesis Vanguard");
}

#[test]
fn overlay_archives_override_base_and_each_other() {
    let temp = game_root();

    let mut fs = ArchiveFs::new(temp.path());
    fs.load_from_game_root();
    fs.mount_extensions().unwrap();
    assert_eq!(fs.extensions(), vec!["splitpack"]);

    // the base tree keeps its own version
    assert_eq!(read_to_string(&mut fs, "libraries/widget.xml"), "BASE");

    // the overlay resolves through its own stack first, where ext_02
    // outranks ext_01
    assert_eq!(
        read_to_string(&mut fs, "extensions/splitpack/libraries/widget.xml"),
        "OVERLAY"
    );
}
