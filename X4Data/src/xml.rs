//! Owned XML document tree with slash-path queries.
//!
//! Game documents are small enough to hold fully in memory, so the event
//! stream from `quick-xml` is assembled into an owned tree that loaders can
//! query repeatedly (`macro/properties/hull`, attribute lookups) without
//! re-parsing.

use std::io::Read;

use indexmap::IndexMap;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vfs::GameFs;

/// A parsed XML document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XmlDocument {
    /// The document element.
    pub root: XmlNode,
}

/// An element in an XML document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XmlNode {
    /// Element tag name.
    pub tag: String,
    /// Attributes in document order.
    pub attributes: IndexMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Concatenated character data directly inside this element. Not
    /// trimmed: localized strings carry meaningful edge whitespace.
    pub text: String,
}

impl XmlDocument {
    /// Parse a document from XML text.
    ///
    /// # Errors
    /// Returns an error if the XML is malformed or has no document element.
    pub fn parse(content: &str) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut reader = Reader::from_str(content);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    stack.push(node_from_start(&e)?);
                }
                Ok(Event::Empty(e)) => {
                    let node = node_from_start(&e)?;
                    attach(&mut stack, &mut root, node);
                }
                Ok(Event::End(_)) => {
                    if let Some(node) = stack.pop() {
                        attach(&mut stack, &mut root, node);
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&e.unescape()?);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlError(e)),
                _ => {}
            }
            buf.clear();
        }

        root.map(|root| XmlDocument { root })
            .ok_or_else(|| Error::MalformedDocument {
                path: String::new(),
                message: "document has no root element".to_string(),
            })
    }

    /// Open a game file and parse it.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or parsed; parse errors
    /// carry the game path.
    pub fn load<F: GameFs + ?Sized>(fs: &mut F, path: &str) -> Result<Self> {
        let mut stream = fs.open(path)?;
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes)?;

        Self::parse(&String::from_utf8_lossy(&bytes)).map_err(|err| match err {
            Error::MalformedDocument { message, .. } => Error::MalformedDocument {
                path: path.to_string(),
                message,
            },
            other => other,
        })
    }
}

fn node_from_start(e: &quick_xml::events::BytesStart) -> Result<XmlNode> {
    let mut node = XmlNode {
        tag: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        ..XmlNode::default()
    };

    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        node.attributes.insert(key, value);
    }

    Ok(node)
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_none() {
        *root = Some(node);
    }
}

impl XmlNode {
    /// Value of an attribute, if present.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child elements with the given tag.
    pub fn children_named<'s, 'a>(&'s self, tag: &'a str) -> impl Iterator<Item = &'s XmlNode> + 'a
    where
        's: 'a,
    {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// First child element with the given tag.
    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&XmlNode> {
        self.children_named(tag).next()
    }

    /// All elements reachable by a slash-separated tag path, e.g.
    /// `connections/connection`. An empty path yields the node itself.
    #[must_use]
    pub fn find_all(&self, path: &str) -> Vec<&XmlNode> {
        let mut nodes: Vec<&XmlNode> = vec![self];

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let mut next = Vec::new();
            for node in nodes {
                next.extend(node.children_named(segment));
            }
            nodes = next;
        }

        nodes
    }

    /// First element reachable by a slash-separated tag path.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&XmlNode> {
        self.find_all(path).into_iter().next()
    }

    /// Attribute of the first element at a path. Warns when the path is
    /// ambiguous, as that usually means a malformed game document.
    #[must_use]
    pub fn attr_at(&self, path: &str, name: &str) -> Option<&str> {
        let nodes = self.find_all(path);
        if nodes.len() > 1 {
            tracing::warn!(path, "more than one node matched query");
        }
        nodes.first().and_then(|node| node.attr(name))
    }

    /// Attribute map of the first element at a path.
    #[must_use]
    pub fn attrs_at(&self, path: &str) -> Option<&IndexMap<String, String>> {
        let nodes = self.find_all(path);
        if nodes.len() > 1 {
            tracing::warn!(path, "more than one node matched query");
        }
        nodes.first().map(|node| &node.attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<macros>
  <macro name="engine_arg_s_travel_01_mk1_macro" class="engine">
    <properties>
      <identification name="{20107,1204}" makerrace="argon" />
      <thrust forward="1000" reverse="801.5" />
      <hull max="500" />
    </properties>
    <connections>
      <connection ref="src"><macro ref="other_macro" /></connection>
      <connection ref="src2"><macro ref="third_macro" /></connection>
    </connections>
  </macro>
</macros>"#;

    #[test]
    fn parses_into_a_tree() {
        let doc = XmlDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.root.tag, "macros");

        let mac = doc.root.child("macro").unwrap();
        assert_eq!(mac.attr("class"), Some("engine"));
        assert_eq!(
            mac.attr_at("properties/thrust", "forward"),
            Some("1000")
        );
        assert_eq!(mac.attr_at("properties/hull", "max"), Some("500"));
        assert_eq!(mac.attr_at("properties/missing", "x"), None);
    }

    #[test]
    fn find_all_walks_slash_paths() {
        let doc = XmlDocument::parse(SAMPLE).unwrap();
        let mac = doc.root.child("macro").unwrap();

        let conns = mac.find_all("connections/connection");
        assert_eq!(conns.len(), 2);
        assert_eq!(conns[1].attr("ref"), Some("src2"));
        assert_eq!(conns[0].child("macro").unwrap().attr("ref"), Some("other_macro"));
    }

    #[test]
    fn text_keeps_edge_whitespace_and_entities() {
        let doc = XmlDocument::parse("<page><t id=\"1\"> A &amp; B </t></page>").unwrap();
        assert_eq!(doc.root.child("t").unwrap().text, " A & B ");
    }

    #[test]
    fn bom_is_tolerated() {
        let doc = XmlDocument::parse("\u{feff}<root/>").unwrap();
        assert_eq!(doc.root.tag, "root");
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(matches!(
            XmlDocument::parse("  "),
            Err(Error::MalformedDocument { .. })
        ));
    }
}
