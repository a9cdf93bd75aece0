//! The backend's JSON representation of a rule graph.
//!
//! ```text
//! GraphDto = { nodes: NodeDto[], edges: EdgeDto[] }
//! NodeDto  = { id, point: {x, y}, type: <CATEGORY>, width?, height?, data }
//! EdgeDto  = { id, source, target, targetHandle? }
//! ```
//!
//! `type` is kept as a raw string so an unknown category surfaces as a codec
//! error instead of a generic parse failure, and `data` stays opaque until
//! the codec knows which payload to parse it as.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use rulegraph_core::edge::Edge;
use rulegraph_core::id::{EdgeId, NodeId, TargetHandle};
use rulegraph_core::types::Position;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDto {
    #[serde(default)]
    pub nodes: Vec<NodeDto>,
    #[serde(default)]
    pub edges: Vec<EdgeDto>,
}

impl GraphDto {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDto {
    pub id: NodeId,
    pub point: Position,
    #[serde(rename = "type")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDto {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<TargetHandle>,
}

impl From<&Edge> for EdgeDto {
    fn from(edge: &Edge) -> Self {
        EdgeDto {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            target_handle: edge.target_handle.clone(),
        }
    }
}

impl From<EdgeDto> for Edge {
    fn from(dto: EdgeDto) -> Self {
        Edge {
            id: dto.id,
            source: dto.source,
            target: dto.target,
            target_handle: dto.target_handle,
        }
    }
}
