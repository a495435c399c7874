//! Per-class extraction registry.

use std::collections::HashMap;

use crate::xml::XmlNode;

use super::Properties;

/// Extraction function: `(name, class, node)` to extracted properties. For
/// macro parsers the node is the `<properties>` element; for component
/// parsers it is the `<component>` element.
pub type ExtractFn = Box<dyn Fn(&str, &str, &XmlNode) -> Properties>;

/// Maps a macro/component class tag to its extraction function.
///
/// A class with no registered function falls through to a logged no-op that
/// yields empty properties, so an unknown record kind surfaces in the logs
/// instead of silently dropping data.
#[derive(Default)]
pub struct ParserRegistry {
    macro_parsers: HashMap<String, ExtractFn>,
    component_parsers: HashMap<String, ExtractFn>,
}

impl ParserRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the extraction function for a macro class.
    pub fn register_macro<P>(&mut self, class: &str, parser: P)
    where
        P: Fn(&str, &str, &XmlNode) -> Properties + 'static,
    {
        self.macro_parsers.insert(class.to_string(), Box::new(parser));
    }

    /// Register the extraction function for a component class.
    pub fn register_component<P>(&mut self, class: &str, parser: P)
    where
        P: Fn(&str, &str, &XmlNode) -> Properties + 'static,
    {
        self.component_parsers
            .insert(class.to_string(), Box::new(parser));
    }

    /// Extract properties from a macro's `<properties>` node.
    #[must_use]
    pub fn parse_macro(&self, name: &str, class: &str, node: &XmlNode) -> Properties {
        match self.macro_parsers.get(class) {
            Some(parser) => parser(name, class, node),
            None => {
                tracing::warn!(name, class, "no macro parser registered for class");
                Properties::new()
            }
        }
    }

    /// Extract properties from a shared `<component>` node.
    #[must_use]
    pub fn parse_component(&self, name: &str, class: &str, node: &XmlNode) -> Properties {
        match self.component_parsers.get(class) {
            Some(parser) => parser(name, class, node),
            None => {
                tracing::warn!(name, class, "no component parser registered for class");
                Properties::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_class_yields_empty_properties() {
        let registry = ParserRegistry::new();
        let node = XmlNode::default();
        assert!(registry.parse_macro("m", "mystery", &node).is_empty());
        assert!(registry.parse_component("c", "mystery", &node).is_empty());
    }

    #[test]
    fn registered_parser_is_dispatched_by_class() {
        let mut registry = ParserRegistry::new();
        registry.register_macro("engine", |name, class, _node| {
            let mut props = Properties::new();
            props.insert("id".to_string(), format!("{class}:{name}").into());
            props
        });

        let node = XmlNode::default();
        let props = registry.parse_macro("engine_a", "engine", &node);
        assert_eq!(props["id"], "engine:engine_a");
        assert!(registry.parse_macro("engine_a", "shield", &node).is_empty());
    }
}
