//! Ware catalogue loader.
//!
//! Wares live in one `libraries/wares.xml` document per tree and are not
//! macros: no index lookup, no reference closure, just a straight parse.

use indexmap::IndexMap;
use serde_json::json;

use x4data::lang::LanguageResolver;
use x4data::macros::Properties;
use x4data::vfs::GameFs;
use x4data::xml::XmlDocument;
use x4data::Result;

use super::helpers::{attr_i64, localized};
use super::path_in_extension;

/// Load and parse the ware catalogue of the base game or an extension.
///
/// # Errors
/// Returns an error if `libraries/wares.xml` cannot be opened or parsed.
pub fn load_wares<F: GameFs>(
    fs: &mut F,
    lang: &LanguageResolver,
    ext: Option<&str>,
) -> Result<IndexMap<String, Properties>> {
    let path = path_in_extension("libraries/wares.xml", ext);
    let doc = XmlDocument::load(fs, &path)?;

    let mut wares = IndexMap::new();

    for ware in doc.root.children_named("ware") {
        let Some(id) = ware.attr("id") else {
            continue;
        };

        let mut props = Properties::new();
        props.insert("name".to_string(), localized(lang, ware.attr("name")));
        props.insert(
            "description".to_string(),
            localized(lang, ware.attr("description")),
        );
        props.insert(
            "factoryname".to_string(),
            localized(lang, ware.attr("factoryname")),
        );
        props.insert("group".to_string(), json!(ware.attr("transport")));
        props.insert(
            "volume".to_string(),
            json!(ware.attr("volume").and_then(|v| v.parse::<i64>().ok()).unwrap_or(0)),
        );
        props.insert(
            "tags".to_string(),
            json!(ware
                .attr("tags")
                .unwrap_or_default()
                .split_whitespace()
                .collect::<Vec<_>>()),
        );
        props.insert(
            "illegal".to_string(),
            json!(ware
                .attr("illegal")
                .unwrap_or_default()
                .split_whitespace()
                .collect::<Vec<_>>()),
        );

        props.insert("price_min".to_string(), json!(attr_i64(ware, "price", "min", 0)));
        props.insert(
            "price_avg".to_string(),
            json!(attr_i64(ware, "price", "average", 0)),
        );
        props.insert("price_max".to_string(), json!(attr_i64(ware, "price", "max", 0)));

        let mut productions = Vec::new();
        for production in ware.children_named("production") {
            let mut recipe = Properties::new();
            recipe.insert(
                "time".to_string(),
                json!(production.attr("time").and_then(|v| v.parse::<f64>().ok()).unwrap_or(0.0)),
            );
            recipe.insert(
                "amount".to_string(),
                json!(production.attr("amount").and_then(|v| v.parse::<i64>().ok()).unwrap_or(0)),
            );
            recipe.insert("method".to_string(), json!(production.attr("method")));
            recipe.insert(
                "name".to_string(),
                localized(lang, production.attr("name")),
            );

            let mut consumption = Properties::new();
            for input in production.find_all("primary/ware") {
                if let Some(input_id) = input.attr("ware") {
                    consumption.insert(
                        input_id.to_string(),
                        json!(input.attr("amount").and_then(|v| v.parse::<i64>().ok()).unwrap_or(0)),
                    );
                }
            }
            recipe.insert("consumption".to_string(), json!(consumption));

            productions.push(json!(recipe));
        }
        props.insert("production".to_string(), json!(productions));

        props.insert(
            "licence".to_string(),
            json!(ware.attr_at("restriction", "licence").unwrap_or("")),
        );

        let owners: Vec<&str> = ware
            .children_named("owner")
            .filter_map(|owner| owner.attr("faction"))
            .collect();
        props.insert("owners".to_string(), json!(owners));

        wares.insert(id.to_string(), props);
    }

    Ok(wares)
}

#[cfg(test)]
mod tests {
    use super::*;
    use x4data::vfs::DirFs;

    use tempfile::TempDir;

    const WARES_XML: &str = "<wares>\
        <ware id=\"energycells\" name=\"{20201,101}\" transport=\"container\" volume=\"1\" tags=\"economy stationbuilding\">\
          <price min=\"10\" average=\"16\" max=\"22\"/>\
          <production time=\"60\" amount=\"175\" method=\"default\" name=\"{20206,101}\">\
            <primary><ware ware=\"water\" amount=\"50\"/></primary>\
          </production>\
          <owner faction=\"argon\"/>\
          <owner faction=\"teladi\"/>\
        </ware>\
      </wares>";

    #[test]
    fn parses_ware_records() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("libraries")).unwrap();
        std::fs::write(temp.path().join("libraries/wares.xml"), WARES_XML).unwrap();

        let doc = XmlDocument::parse(
            "<language><page id=\"20201\"><t id=\"101\">Energy Cells</t></page></language>",
        )
        .unwrap();
        let mut lang = LanguageResolver::new();
        lang.load_language("en", &doc);

        let mut fs = DirFs::new(temp.path());
        let wares = load_wares(&mut fs, &lang, None).unwrap();

        let ware = &wares["energycells"];
        assert_eq!(ware["name"], json!("Energy Cells"));
        assert_eq!(ware["group"], json!("container"));
        assert_eq!(ware["volume"], json!(1));
        assert_eq!(ware["tags"], json!(["economy", "stationbuilding"]));
        assert_eq!(ware["price_avg"], json!(16));
        assert_eq!(ware["owners"], json!(["argon", "teladi"]));

        let production = &ware["production"][0];
        assert_eq!(production["amount"], json!(175));
        assert_eq!(production["consumption"]["water"], json!(50));
    }

    #[test]
    fn missing_wares_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut fs = DirFs::new(temp.path());
        let lang = LanguageResolver::new();
        assert!(load_wares(&mut fs, &lang, Some("mymod")).is_err());
    }
}
