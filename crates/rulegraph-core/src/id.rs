//! Identifier newtypes for rule-graph entities.
//!
//! Node ids are numeric strings handed out by the graph's counter. Ids loaded
//! from the backend are kept verbatim even when they are not numeric; they
//! just never influence the counter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Node identifier, unique within one graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

/// Edge identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

/// Names the input port an edge is wired into, formatted `input-<N>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetHandle(pub String);

impl NodeId {
    /// The counter value this id was allocated from, if it is numeric.
    pub fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl EdgeId {
    /// The deterministic id of the edge from `source` to `target`.
    pub fn between(source: &NodeId, target: &NodeId) -> EdgeId {
        EdgeId(format!("edge-{}-{}", source.0, target.0))
    }
}

impl TargetHandle {
    const PREFIX: &'static str = "input-";

    /// Handle for input port `index`.
    pub fn input(index: usize) -> TargetHandle {
        TargetHandle(format!("{}{}", Self::PREFIX, index))
    }

    /// The port index encoded in the handle, or `None` if the handle is not
    /// of the form `input-<N>`.
    pub fn port_index(&self) -> Option<usize> {
        let digits = self.0.strip_prefix(Self::PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        EdgeId(s.to_string())
    }
}

impl From<&str> for TargetHandle {
    fn from(s: &str) -> Self {
        TargetHandle(s.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
