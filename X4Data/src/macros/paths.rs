//! Name-to-path resolution via the game's shipped index documents.
//!
//! `index/macros.xml` and `index/components.xml` map every macro and
//! component name to the document that defines it. They ship with the game
//! and cover extension content, so they are authoritative; no naming-
//! convention guessing is layered on top.

use std::collections::HashMap;

use crate::error::Result;
use crate::vfs::GameFs;
use crate::xml::XmlDocument;

/// Lookup tables from record name to defining game document.
pub struct PathIndex {
    macros: HashMap<String, String>,
    components: HashMap<String, String>,
}

impl PathIndex {
    /// Load both index documents through a game file system.
    ///
    /// # Errors
    /// Returns an error if either index document cannot be opened or parsed.
    pub fn load<F: GameFs + ?Sized>(fs: &mut F) -> Result<Self> {
        let macros = load_index(fs, "index/macros.xml")?;
        let mut components = load_index(fs, "index/components.xml")?;

        // the shipped component index is missing this one entry
        components.insert(
            "cockpit_invisible_escapepod".to_string(),
            "assets/units/size_s/cockpit_invisible_escapepod.xml".to_string(),
        );

        Ok(Self { macros, components })
    }

    /// Path of the document defining a macro.
    #[must_use]
    pub fn macro_path(&self, name: &str) -> Option<&str> {
        self.macros.get(name).map(String::as_str)
    }

    /// Path of the document defining a component.
    #[must_use]
    pub fn component_path(&self, name: &str) -> Option<&str> {
        self.components.get(name).map(String::as_str)
    }
}

fn load_index<F: GameFs + ?Sized>(fs: &mut F, path: &str) -> Result<HashMap<String, String>> {
    let doc = XmlDocument::load(fs, path)?;
    let mut map = HashMap::new();

    for entry in doc.root.children_named("entry") {
        let (Some(name), Some(value)) = (entry.attr("name"), entry.attr("value")) else {
            continue;
        };
        // index values use backslashes and omit the extension
        map.insert(name.to_string(), format!("{}.xml", value.replace('\\', "/")));
    }

    Ok(map)
}
