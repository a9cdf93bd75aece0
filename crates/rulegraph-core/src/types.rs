//! Port types, node categories and layout points.
//!
//! [`PortType`] is the closed set of value types a port can carry. `Any` is a
//! wildcard used while a node's output is not yet known (e.g. a provider whose
//! schema field has not been picked). [`NodeCategory`] is the closed set of
//! node kinds; it is fixed when a node is created.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The type carried by an input or output port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortType {
    Any,
    String,
    Number,
    Boolean,
    Date,
    Array,
    Json,
}

impl PortType {
    /// Every port type, in declaration order.
    pub const ALL: [PortType; 7] = [
        PortType::Any,
        PortType::String,
        PortType::Number,
        PortType::Boolean,
        PortType::Date,
        PortType::Array,
        PortType::Json,
    ];

    /// Wire spelling of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            PortType::Any => "ANY",
            PortType::String => "STRING",
            PortType::Number => "NUMBER",
            PortType::Boolean => "BOOLEAN",
            PortType::Date => "DATE",
            PortType::Array => "ARRAY",
            PortType::Json => "JSON",
        }
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a rule-graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeCategory {
    /// Reads a value out of a fetched API response via a JSON path.
    Provider,
    /// A literal typed by inference from its value.
    Constant,
    /// An operator from the externally supplied catalog.
    Logic,
    /// The boolean sink holding the rule's result.
    Final,
    /// A JSON-schema literal attached to the rule. Never connected.
    Schema,
    /// Graph-wide configuration. Never connected.
    Config,
}

impl NodeCategory {
    pub const ALL: [NodeCategory; 6] = [
        NodeCategory::Provider,
        NodeCategory::Constant,
        NodeCategory::Logic,
        NodeCategory::Final,
        NodeCategory::Schema,
        NodeCategory::Config,
    ];

    /// Wire spelling of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeCategory::Provider => "PROVIDER",
            NodeCategory::Constant => "CONSTANT",
            NodeCategory::Logic => "LOGIC",
            NodeCategory::Final => "FINAL",
            NodeCategory::Schema => "SCHEMA",
            NodeCategory::Config => "CONFIG",
        }
    }

    /// Parses the wire spelling. Returns `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<NodeCategory> {
        NodeCategory::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Whether nodes of this category may appear at either end of an edge.
    pub fn is_connectable(self) -> bool {
        match self {
            NodeCategory::Provider
            | NodeCategory::Constant
            | NodeCategory::Logic
            | NodeCategory::Final => true,
            NodeCategory::Schema | NodeCategory::Config => false,
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point on the editing canvas. Layout only; never consulted by validation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}
