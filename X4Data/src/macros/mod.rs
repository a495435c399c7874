//! Macro records and the database that loads them.
//!
//! A *macro* is a typed game asset record (`engine`, `shieldgenerator`,
//! `ship_xl`, ...) with extracted properties and outgoing by-name references
//! to other macros. Records live in a flat arena keyed by name; a reference
//! is a lookup key into that arena, never an owning pointer, which is what
//! lets mutually-referencing records coexist.

mod database;
mod paths;
mod registry;

pub use database::{MacroDatabase, ResolveReport};
pub use paths::PathIndex;
pub use registry::ParserRegistry;

use serde::Serialize;

/// Extracted properties of a record. Values are JSON-shaped so exporters can
/// serialize them directly; insertion order is preserved.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// A connection from one macro to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    /// Connection identifier within the owning macro.
    pub connection: String,
    /// Name of the referenced macro.
    pub target: String,
}

/// A typed game asset record.
#[derive(Debug, Clone, Serialize)]
pub struct Macro {
    /// In-game name of the macro.
    pub name: String,
    /// Macro class, e.g. `engine`, `shieldgenerator`, `ship_xl`.
    pub class: String,
    /// Connected macros, in document order.
    pub connections: Vec<Connection>,
    /// Extracted properties.
    pub properties: Properties,
}

impl Macro {
    /// Create a record with no connections yet.
    #[must_use]
    pub fn new(name: String, class: String, properties: Properties) -> Self {
        Self {
            name,
            class,
            connections: Vec::new(),
            properties,
        }
    }

    /// Append a connection. Used while the defining document is parsed.
    pub fn add_connection(&mut self, connection: &str, target: &str) {
        self.connections.push(Connection {
            connection: connection.to_string(),
            target: target.to_string(),
        });
    }
}
