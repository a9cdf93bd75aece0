//! Hard failures raised while checking a rule graph.
//!
//! Ordinary refusals (duplicate edge, handle conflict, type mismatch, ...)
//! are [`Rejection`](rulegraph_core::Rejection) values, not errors. The
//! variants here mean the graph or the catalog cannot be trusted: a stale
//! catalog, a corrupted handle, or a caller referring to nodes that do not
//! exist.

use rulegraph_core::error::CoreError;
use rulegraph_core::id::{NodeId, TargetHandle};
use thiserror::Error;

/// Errors produced while resolving shapes or validating edges.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A LOGIC node references an operator the catalog does not contain.
    #[error("node {node} references unknown operator '{operator}' in category '{category}'")]
    ShapeResolution {
        node: NodeId,
        category: String,
        operator: String,
    },

    /// A proposal names a node that is not in the graph.
    #[error("node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// A target handle is not of the form `input-<N>`.
    #[error("malformed target handle '{handle}', expected input-<N>")]
    InvalidHandle { handle: TargetHandle },

    /// The graph store refused the operation.
    #[error(transparent)]
    Core(#[from] CoreError),
}
