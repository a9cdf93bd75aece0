//! Core error types for rulegraph-core.
//!
//! Connection rejections are not errors (see [`crate::edge::Rejection`]);
//! these variants cover lookups of absent entities and payload or structure
//! problems that leave the graph unchanged.

use thiserror::Error;

use crate::id::{EdgeId, NodeId};
use crate::types::NodeCategory;

/// Errors produced by [`RuleGraph`](crate::graph::RuleGraph) operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A node id was not found in the graph.
    #[error("node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// A data patch was not a JSON object, or produced a payload that no
    /// longer fits the node's category.
    #[error("invalid data patch for node {id}: {reason}")]
    InvalidPatch { id: NodeId, reason: String },

    /// Replacement data belongs to a different category than the node.
    #[error("node {id} is {expected}, refusing {actual} data")]
    CategoryChange {
        id: NodeId,
        expected: NodeCategory,
        actual: NodeCategory,
    },

    /// Two nodes with the same id were supplied when assembling a graph.
    #[error("duplicate node id: {id}")]
    DuplicateNode { id: NodeId },

    /// An edge id, or an ordered node pair, appears more than once.
    #[error("duplicate edge: {edge}")]
    DuplicateEdge { edge: EdgeId },

    /// A loaded numeric node id leaves no room for the next allocated id.
    #[error("node id {id} exhausts the id space")]
    IdSpaceExhausted { id: NodeId },

    /// An edge refers to a node that is not part of the graph.
    #[error("edge {edge} refers to missing node {node}")]
    DanglingEdge { edge: EdgeId, node: NodeId },
}
