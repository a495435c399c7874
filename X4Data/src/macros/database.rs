//! Macro database with reference-closure resolution.

use indexmap::{IndexMap, IndexSet};

use crate::error::Result;
use crate::vfs::GameFs;
use crate::xml::{XmlDocument, XmlNode};

use super::{Macro, ParserRegistry, PathIndex, Properties};

/// Outcome of [`MacroDatabase::resolve_dependencies`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveReport {
    /// True if no unresolved references remain.
    pub complete: bool,
    /// References that could not be satisfied. Their records are absent
    /// from the database.
    pub unresolved: Vec<String>,
}

/// Database of loaded macros plus the machinery to load every record they
/// transitively reference.
///
/// Loading a document may reference records that are not loaded yet; those
/// names go into a pending set. [`Self::resolve_dependencies`] then
/// iterates loading until the set is empty or an iteration makes no
/// progress. Records are memoized by name and never reloaded, so reference
/// cycles terminate naturally.
pub struct MacroDatabase<F: GameFs> {
    fs: F,
    paths: PathIndex,
    registry: ParserRegistry,
    macros: IndexMap<String, Macro>,
    by_class: IndexMap<String, Vec<String>>,
    pending: IndexSet<String>,
}

impl<F: GameFs> MacroDatabase<F> {
    /// Create a database over a game file system. Loads the name-to-path
    /// index documents up front.
    ///
    /// # Errors
    /// Returns an error if the index documents cannot be loaded.
    pub fn new(mut fs: F) -> Result<Self> {
        let paths = PathIndex::load(&mut fs)?;
        Ok(Self {
            fs,
            paths,
            registry: ParserRegistry::new(),
            macros: IndexMap::new(),
            by_class: IndexMap::new(),
            pending: IndexSet::new(),
        })
    }

    /// Create a database with a populated extraction registry.
    ///
    /// # Errors
    /// Returns an error if the index documents cannot be loaded.
    pub fn with_registry(fs: F, registry: ParserRegistry) -> Result<Self> {
        let mut db = Self::new(fs)?;
        db.registry = registry;
        Ok(db)
    }

    /// Replace the extraction registry.
    pub fn set_registry(&mut self, registry: ParserRegistry) {
        self.registry = registry;
    }

    /// The underlying file system.
    pub fn fs_mut(&mut self) -> &mut F {
        &mut self.fs
    }

    /// All loaded records, in load order.
    #[must_use]
    pub fn macros(&self) -> &IndexMap<String, Macro> {
        &self.macros
    }

    /// A record by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.macros.get(name)
    }

    /// Names of the loaded records of a class, in load order.
    #[must_use]
    pub fn names_by_class(&self, class: &str) -> &[String] {
        self.by_class.get(class).map_or(&[], Vec::as_slice)
    }

    /// References seen but not loaded yet.
    #[must_use]
    pub fn pending_references(&self) -> Vec<&str> {
        self.pending.iter().map(String::as_str).collect()
    }

    /// Load every macro defined in a game document.
    ///
    /// For each `<macro name class>`: properties are extracted through the
    /// registry, the referenced shared component (if any) contributes the
    /// fields the macro itself did not set, and every connection reference
    /// to an unknown record is added to the pending set.
    ///
    /// # Errors
    /// Returns an error if the document cannot be opened or parsed.
    pub fn load_macro_file(&mut self, path: &str) -> Result<()> {
        let doc = XmlDocument::load(&mut self.fs, path)?;
        let mut found = false;

        for node in doc.root.children_named("macro") {
            let (Some(name), Some(class)) = (node.attr("name"), node.attr("class")) else {
                continue;
            };
            found = true;
            let name = name.to_string();
            let class = class.to_string();

            let mut properties = Properties::new();
            let prop_nodes: Vec<&XmlNode> = node.children_named("properties").collect();
            if prop_nodes.len() > 1 {
                tracing::error!(path, name = %name, "too many <properties> nodes");
            } else if let Some(prop_node) = prop_nodes.first() {
                properties = self.registry.parse_macro(&name, &class, prop_node);
            }

            let comp_nodes: Vec<&XmlNode> = node.children_named("component").collect();
            if comp_nodes.len() > 1 {
                tracing::error!(path, name = %name, "too many <component> nodes");
            } else if let Some(comp_ref) = comp_nodes.first().and_then(|n| n.attr("ref")) {
                // component fields never override what the macro already set
                for (key, value) in self.load_component_properties(comp_ref) {
                    properties.entry(key).or_insert(value);
                }
            }

            let mut record = Macro::new(name, class, properties);

            for conn in node.find_all("connections/connection") {
                let Some(conn_ref) = conn.attr("ref") else {
                    continue;
                };
                for target in conn.children_named("macro") {
                    let Some(target_ref) = target.attr("ref") else {
                        continue;
                    };
                    if !self.macros.contains_key(target_ref) {
                        self.pending.insert(target_ref.to_string());
                    }
                    record.add_connection(conn_ref, target_ref);
                }
            }

            self.insert_macro(record);
        }

        if !found {
            tracing::warn!(path, "no macros found in file");
        }

        Ok(())
    }

    /// Save a record, satisfying any pending reference to it. A record of
    /// the same name loaded earlier stays listed under its class only once.
    fn insert_macro(&mut self, record: Macro) {
        let name = record.name.clone();
        let class = record.class.clone();

        let previous = self.macros.insert(name.clone(), record);
        self.pending.shift_remove(&name);

        if previous.is_none() {
            self.by_class.entry(class).or_default().push(name);
        }
    }

    /// Load and extract the properties of a shared component. Failures are
    /// logged and yield empty properties; a broken component never aborts
    /// the batch.
    fn load_component_properties(&mut self, comp_name: &str) -> Properties {
        let Some(path) = self.paths.component_path(comp_name).map(str::to_string) else {
            tracing::error!(component = comp_name, "component not found in index");
            return Properties::new();
        };

        let doc = match XmlDocument::load(&mut self.fs, &path) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::error!(component = comp_name, path = %path, error = %err, "failed to load component file");
                return Properties::new();
            }
        };

        let comp_nodes: Vec<&XmlNode> = doc
            .root
            .children_named("component")
            .filter(|n| n.attr("name") == Some(comp_name))
            .collect();

        if comp_nodes.len() > 1 {
            tracing::error!(component = comp_name, path = %path, "too many matching <component> nodes");
            return Properties::new();
        }

        let Some(comp_node) = comp_nodes.first() else {
            tracing::warn!(component = comp_name, path = %path, "no component with this name in file");
            return Properties::new();
        };

        // one shipped component has a stray space in its class attribute
        let class = comp_node.attr("class").unwrap_or_default().trim().to_string();
        self.registry.parse_component(comp_name, &class, comp_node)
    }

    /// One pass of the closure: prune satisfied references, then try to
    /// load a document for every remaining one. Returns whether the pending
    /// set changed.
    fn resolve_step(&mut self) -> bool {
        let macros = &self.macros;
        self.pending.retain(|name| !macros.contains_key(name));

        let snapshot: Vec<String> = self.pending.iter().cloned().collect();

        for name in &snapshot {
            let Some(path) = self.paths.macro_path(name).map(str::to_string) else {
                tracing::error!(reference = %name, "reference not found in index");
                continue;
            };

            if !self.fs.exists(&path) {
                tracing::error!(reference = %name, path = %path, "referenced file not found");
                continue;
            }

            if let Err(err) = self.load_macro_file(&path) {
                tracing::error!(reference = %name, path = %path, error = %err, "failed to load referenced file");
            }
        }

        self.pending.len() != snapshot.len() || !self.pending.iter().all(|n| snapshot.contains(n))
    }

    /// Load macros that are referenced by loaded macros but not loaded yet,
    /// to a fixed point.
    ///
    /// Terminates when the pending set is empty (full success) or when a
    /// pass leaves it unchanged; the remaining references are reported and
    /// not retried.
    pub fn resolve_dependencies(&mut self) -> ResolveReport {
        while !self.pending.is_empty() {
            if !self.resolve_step() {
                let unresolved: Vec<String> = self.pending.iter().cloned().collect();
                tracing::error!(
                    remaining = unresolved.len(),
                    "failed to resolve all references"
                );
                return ResolveReport {
                    complete: false,
                    unresolved,
                };
            }
        }

        ResolveReport {
            complete: true,
            unresolved: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::DirFs;

    use serde_json::json;
    use tempfile::TempDir;

    /// Write a macro document referencing `targets` through connections.
    fn write_macro(dir: &std::path::Path, name: &str, class: &str, targets: &[&str]) {
        let connections: String = targets
            .iter()
            .enumerate()
            .map(|(i, t)| format!("<connection ref=\"conn{i:02}\"><macro ref=\"{t}\"/></connection>"))
            .collect();
        let xml = format!(
            "<macros><macro name=\"{name}\" class=\"{class}\">\
               <properties><hull max=\"100\"/></properties>\
               <connections>{connections}</connections>\
             </macro></macros>"
        );
        std::fs::write(dir.join(format!("{name}.xml")), xml).unwrap();
    }

    /// Game tree whose macro index maps every name to `assets/<name>.xml`.
    fn game_tree(names: &[&str]) -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("index")).unwrap();
        std::fs::create_dir_all(temp.path().join("assets")).unwrap();

        let entries: String = names
            .iter()
            .map(|n| format!("<entry name=\"{n}\" value=\"assets\\{n}\"/>"))
            .collect();
        std::fs::write(
            temp.path().join("index/macros.xml"),
            format!("<index>{entries}</index>"),
        )
        .unwrap();
        std::fs::write(temp.path().join("index/components.xml"), "<index/>").unwrap();

        temp
    }

    fn database(temp: &TempDir) -> MacroDatabase<DirFs> {
        MacroDatabase::new(DirFs::new(temp.path())).unwrap()
    }

    #[test]
    fn cyclic_references_resolve_to_a_fixed_point() {
        let temp = game_tree(&["a_macro", "b_macro", "c_macro"]);
        let assets = temp.path().join("assets");
        write_macro(&assets, "a_macro", "testclass", &["b_macro"]);
        write_macro(&assets, "b_macro", "testclass", &["c_macro"]);
        write_macro(&assets, "c_macro", "testclass", &["a_macro"]);

        let mut db = database(&temp);
        db.load_macro_file("assets/a_macro.xml").unwrap();

        let report = db.resolve_dependencies();
        assert!(report.complete);
        assert!(report.unresolved.is_empty());

        let mut names: Vec<&str> = db.macros().keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a_macro", "b_macro", "c_macro"]);
        assert_eq!(db.names_by_class("testclass").len(), 3);
        assert!(db.pending_references().is_empty());
    }

    #[test]
    fn unresolvable_reference_reports_partial_failure() {
        let temp = game_tree(&["a_macro"]);
        write_macro(&temp.path().join("assets"), "a_macro", "testclass", &["d_macro"]);

        let mut db = database(&temp);
        db.load_macro_file("assets/a_macro.xml").unwrap();

        let report = db.resolve_dependencies();
        assert!(!report.complete);
        assert_eq!(report.unresolved, vec!["d_macro"]);
        assert!(db.get("d_macro").is_none());
        assert!(db.get("a_macro").is_some());
    }

    #[test]
    fn reference_with_missing_file_is_skipped() {
        // indexed, but the document itself does not exist
        let temp = game_tree(&["a_macro", "ghost_macro"]);
        write_macro(&temp.path().join("assets"), "a_macro", "testclass", &["ghost_macro"]);

        let mut db = database(&temp);
        db.load_macro_file("assets/a_macro.xml").unwrap();

        let report = db.resolve_dependencies();
        assert!(!report.complete);
        assert_eq!(report.unresolved, vec!["ghost_macro"]);
    }

    #[test]
    fn registry_extracts_properties_and_component_never_overrides() {
        let temp = game_tree(&["a_macro"]);
        std::fs::write(
            temp.path().join("index/components.xml"),
            "<index><entry name=\"comp_a\" value=\"assets\\comp_a\"/></index>",
        )
        .unwrap();
        std::fs::write(
            temp.path().join("assets/a_macro.xml"),
            "<macros><macro name=\"a_macro\" class=\"testclass\">\
               <properties><hull max=\"100\"/></properties>\
               <component ref=\"comp_a\"/>\
             </macro></macros>",
        )
        .unwrap();
        std::fs::write(
            temp.path().join("assets/comp_a.xml"),
            "<components><component name=\"comp_a\" class=\"testclass \"/></components>",
        )
        .unwrap();

        let mut registry = ParserRegistry::new();
        registry.register_macro("testclass", |_name, _class, node| {
            let mut props = Properties::new();
            let hull: i64 = node
                .attr_at("hull", "max")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            props.insert("hull".to_string(), json!(hull));
            props
        });
        registry.register_component("testclass", |_name, _class, _node| {
            let mut props = Properties::new();
            props.insert("hull".to_string(), json!(-1));
            props.insert("size".to_string(), json!("medium"));
            props
        });

        let mut db = MacroDatabase::with_registry(DirFs::new(temp.path()), registry).unwrap();
        db.load_macro_file("assets/a_macro.xml").unwrap();

        let record = db.get("a_macro").unwrap();
        // the macro's own value wins over the component's
        assert_eq!(record.properties["hull"], json!(100));
        assert_eq!(record.properties["size"], json!("medium"));
    }

    #[test]
    fn connections_are_recorded_in_document_order() {
        let temp = game_tree(&["a_macro", "b_macro", "c_macro"]);
        let assets = temp.path().join("assets");
        write_macro(&assets, "a_macro", "testclass", &["b_macro", "c_macro"]);
        write_macro(&assets, "b_macro", "testclass", &[]);
        write_macro(&assets, "c_macro", "testclass", &[]);

        let mut db = database(&temp);
        db.load_macro_file("assets/a_macro.xml").unwrap();
        db.resolve_dependencies();

        let record = db.get("a_macro").unwrap();
        let targets: Vec<&str> = record.connections.iter().map(|c| c.target.as_str()).collect();
        assert_eq!(targets, vec!["b_macro", "c_macro"]);
        assert_eq!(record.connections[0].connection, "conn00");
    }
}
