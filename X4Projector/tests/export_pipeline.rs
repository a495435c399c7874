//! Full pipeline over catalog archives: scan -> load -> closure -> export.

use std::path::Path;
use std::rc::Rc;

use tempfile::TempDir;

use x4data::lang::LanguageResolver;
use x4data::macros::MacroDatabase;
use x4data::vfs::ArchiveFs;
use x4projector::export::{self, Format};
use x4projector::loaders;

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

const INDEX_XML: &str = "<index>\
    <entry name=\"engine_test_s_macro\" value=\"assets\\props\\engines\\macros\\engine_test_s_macro\"/>\
  </index>";

const ENGINE_XML: &str = "<macros><macro name=\"engine_test_s_macro\" class=\"engine\">\
    <properties>\
      <identification name=\"{20107,1204}\" makerrace=\"argon\" description=\"{20107,1205}\"/>\
      <thrust forward=\"1050.5\" reverse=\"800\"/>\
      <boost thrust=\"8.5\" duration=\"10\"/>\
      <hull max=\"420\"/>\
    </properties>\
  </macro></macros>";

const LANG_XML: &str = "<language id=\"44\"><page id=\"20107\">\
    <t id=\"1204\">ARG S Travel Engine Mk1 (old)</t>\
    <t id=\"1205\">Standard travel engine.</t>\
  </page></language>";

#[test]
fn export_engines_from_archives() {
    let temp = TempDir::new().unwrap();
    write_pair(
        temp.path(),
        "01",
        &[
            ("index/macros.xml", INDEX_XML),
            ("index/components.xml", "<index/>"),
            ("t/0001-L044.xml", LANG_XML),
            (
                "assets/props/engines/macros/engine_test_s_macro.xml",
                ENGINE_XML,
            ),
        ],
    );

    let mut fs = ArchiveFs::new(temp.path());
    fs.load_from_game_root();

    let mut resolver = LanguageResolver::new();
    resolver
        .load_language_from("en", &mut fs, "t/0001-L044.xml")
        .unwrap();
    let resolver = Rc::new(resolver);

    let mut db = MacroDatabase::with_registry(fs, loaders::registry(Rc::clone(&resolver))).unwrap();
    assert_eq!(loaders::load_engines(&mut db, None), 1);
    assert!(db.resolve_dependencies().complete);

    // CSV row with the localized name, translator comment stripped
    let mut csv = Vec::new();
    export::export_engines(&db, &mut csv, Format::Csv).unwrap();
    let csv = String::from_utf8(csv).unwrap();
    let row = csv.lines().nth(1).unwrap();
    assert!(row.starts_with("engine_test_s_macro,ARG S Travel Engine Mk1"));
    assert!(!row.contains("(old)"));
    assert!(row.contains("1050.5"));

    // structured output carries the full property map
    let mut json = Vec::new();
    export::export_engines(&db, &mut json, Format::Json).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(
        value["engine_test_s_macro"]["description"],
        serde_json::json!("Standard travel engine.")
    );
    assert_eq!(value["engine_test_s_macro"]["hull"], serde_json::json!(420));

    let mut yaml = Vec::new();
    export::export_engines(&db, &mut yaml, Format::Yaml).unwrap();
    let yaml = String::from_utf8(yaml).unwrap();
    assert!(yaml.contains("engine_test_s_macro"));
}
