//! Attribute lookup helpers shared by the extraction tables.

use serde_json::{json, Value};

use x4data::lang::LanguageResolver;
use x4data::xml::XmlNode;

/// Integer attribute at a slash path, with a default for missing nodes or
/// attributes.
pub(crate) fn attr_i64(node: &XmlNode, path: &str, name: &str, default: i64) -> i64 {
    node.attr_at(path, name)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// Float attribute at a slash path, with a default.
pub(crate) fn attr_f64(node: &XmlNode, path: &str, name: &str, default: f64) -> f64 {
    node.attr_at(path, name)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// String attribute at a slash path, `Null` when missing.
pub(crate) fn attr_value(node: &XmlNode, path: &str, name: &str) -> Value {
    node.attr_at(path, name).map_or(Value::Null, |v| json!(v))
}

/// Resolve a localized template attribute and trim it. Unresolved fields are
/// reported by the resolver itself; a missing language configuration falls
/// back to the raw template so a batch keeps producing rows.
pub(crate) fn localized(lang: &LanguageResolver, raw: Option<&str>) -> Value {
    let Some(raw) = raw else {
        return Value::Null;
    };

    match lang.resolve(raw, None) {
        Ok(resolved) => json!(resolved.trimmed()),
        Err(err) => {
            tracing::error!(template = raw, error = %err, "cannot resolve localized text");
            json!(raw.trim())
        }
    }
}

/// Whether a space-separated tags attribute contains a tag word.
pub(crate) fn tags_contain(tags: &str, tag: &str) -> bool {
    tags.split_whitespace().any(|word| word == tag)
}

/// The size word in a tags string, if any.
pub(crate) fn size_from_tags(tags: &str) -> Option<&'static str> {
    const SIZES: [&str; 6] = [
        "spacesuit",
        "extrasmall",
        "small",
        "medium",
        "large",
        "extralarge",
    ];

    tags.split_whitespace()
        .find_map(|word| SIZES.iter().find(|size| **size == word).copied())
}

/// Connection nodes of a component whose tags contain the given word.
pub(crate) fn tagged_connections<'a>(
    node: &'a XmlNode,
    tag: &'a str,
) -> impl Iterator<Item = &'a XmlNode> + 'a {
    node.find_all("connections/connection")
        .into_iter()
        .filter(move |conn| conn.attr("tags").is_some_and(|tags| tags_contain(tags, tag)))
}

/// Size of a component, read from the tags of its connection nodes.
pub(crate) fn component_size(node: &XmlNode, name: &str, tag: &str) -> Value {
    let mut size = None;

    for conn in tagged_connections(node, tag) {
        let found = conn.attr("tags").and_then(size_from_tags);
        match (found, size) {
            (Some(found), None) => size = Some(found),
            (Some(_), Some(_)) => {
                tracing::warn!(component = name, tag, "too many sized connection nodes");
                break;
            }
            _ => {}
        }
    }

    match size {
        Some(size) => json!(size),
        None => {
            tracing::warn!(component = name, tag, "no sized connection nodes found");
            json!("")
        }
    }
}
