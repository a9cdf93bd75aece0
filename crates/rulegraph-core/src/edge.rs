//! Edges, connection proposals and the typed outcomes of a connection attempt.
//!
//! A rejected connection is an ordinary value, not an error: the editing
//! surface shows it as a transient notice and the graph stays as it was.

use serde::{Deserialize, Serialize};

use crate::id::{EdgeId, NodeId, TargetHandle};
use crate::types::{NodeCategory, PortType};

/// A directed connection from a node's output to one of another node's inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<TargetHandle>,
}

/// A connection the user is trying to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeProposal {
    pub source: NodeId,
    pub target: NodeId,
    pub target_handle: Option<TargetHandle>,
}

impl EdgeProposal {
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        target_handle: Option<TargetHandle>,
    ) -> Self {
        EdgeProposal {
            source: source.into(),
            target: target.into(),
            target_handle,
        }
    }

    /// The edge this proposal becomes once accepted.
    pub fn into_edge(self) -> Edge {
        Edge {
            id: EdgeId::between(&self.source, &self.target),
            source: self.source,
            target: self.target,
            target_handle: self.target_handle,
        }
    }
}

/// Why a proposed connection was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rejection {
    /// The exact same connection already exists.
    #[error("nodes {from} and {to} are already connected")]
    DuplicateEdge {
        from: NodeId,
        to: NodeId,
        handle: Option<TargetHandle>,
    },

    /// The pair is already connected through a different input port.
    #[error("nodes {from} and {to} are already connected via {existing:?}, cannot also use {proposed:?}")]
    HandleConflict {
        from: NodeId,
        to: NodeId,
        existing: Option<TargetHandle>,
        proposed: Option<TargetHandle>,
    },

    /// The source's output type does not fit the target port.
    #[error("type mismatch: {source_type} cannot feed an input of type {target_type}")]
    TypeMismatch {
        source_type: PortType,
        target_type: PortType,
    },

    /// One endpoint belongs to a category that never takes part in edges.
    #[error("node {node} ({category}) cannot be connected")]
    NotConnectable { node: NodeId, category: NodeCategory },

    /// The source has no output port.
    #[error("node {node} has no output")]
    NoOutput { node: NodeId },

    /// The handle names an input the target does not have.
    #[error("node {target} has {arity} input(s), there is no input {port}")]
    NoSuchPort {
        target: NodeId,
        port: usize,
        arity: usize,
    },
}

/// The validator's answer to a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

/// What [`RuleGraph::add_edge`](crate::graph::RuleGraph::add_edge) did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Connected(Edge),
    Rejected(Rejection),
}

impl Connection {
    pub fn is_connected(&self) -> bool {
        matches!(self, Connection::Connected(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Connection::Connected(_) => None,
            Connection::Rejected(r) => Some(r),
        }
    }
}
