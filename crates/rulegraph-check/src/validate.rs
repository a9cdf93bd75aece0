//! Eager per-edit edge validation.
//!
//! [`validate_edge`] decides whether one proposed connection may be added.
//! Rules are applied in order and the first match wins:
//!
//! 1. the ordered pair is already connected: `HandleConflict` if the handles
//!    differ, `DuplicateEdge` otherwise;
//! 2. either endpoint is an auxiliary node: `NotConnectable`;
//! 3. the source type is its declared output (a constant's type is re-inferred
//!    from its current literal); no output gives `NoOutput`;
//! 4. the target type is the input named by the handle (`input-<N>`, absent
//!    means 0); no such input gives `NoSuchPort`;
//! 5. accept if the two types are compatible, else `TypeMismatch`.
//!
//! Cycles and the number of FINAL nodes are not checked here.

use rulegraph_core::edge::{EdgeProposal, Rejection, Verdict};
use rulegraph_core::graph::{EdgeValidator, RuleGraph};
use rulegraph_core::id::TargetHandle;
use rulegraph_core::node::Node;

use crate::catalog::OperatorCatalog;
use crate::compat::compatible;
use crate::error::CheckError;
use crate::registry::shape_of;

/// Validates a proposed edge against the graph and the operator catalog.
///
/// Returns the verdict, or an error if an endpoint is missing, the handle is
/// malformed, or a LOGIC endpoint's operator is not in the catalog.
pub fn validate_edge(
    graph: &RuleGraph,
    catalog: &OperatorCatalog,
    proposal: &EdgeProposal,
) -> Result<Verdict, CheckError> {
    let source = graph
        .node(&proposal.source)
        .ok_or_else(|| CheckError::NodeNotFound {
            id: proposal.source.clone(),
        })?;
    let target = graph
        .node(&proposal.target)
        .ok_or_else(|| CheckError::NodeNotFound {
            id: proposal.target.clone(),
        })?;

    if let Some(existing) = graph.edge_between(&proposal.source, &proposal.target) {
        let rejection = if existing.target_handle != proposal.target_handle {
            Rejection::HandleConflict {
                from: proposal.source.clone(),
                to: proposal.target.clone(),
                existing: existing.target_handle.clone(),
                proposed: proposal.target_handle.clone(),
            }
        } else {
            Rejection::DuplicateEdge {
                from: proposal.source.clone(),
                to: proposal.target.clone(),
                handle: proposal.target_handle.clone(),
            }
        };
        return Ok(Verdict::Rejected(rejection));
    }

    check_connection(source, target, proposal.target_handle.as_ref(), catalog)
}

/// Checks rules 2-5 for a connection between two resolved nodes, ignoring
/// whatever edges already exist.
pub(crate) fn check_connection(
    source: &Node,
    target: &Node,
    handle: Option<&TargetHandle>,
    catalog: &OperatorCatalog,
) -> Result<Verdict, CheckError> {
    for node in [source, target] {
        if !node.category().is_connectable() {
            return Ok(Verdict::Rejected(Rejection::NotConnectable {
                node: node.id.clone(),
                category: node.category(),
            }));
        }
    }

    let Some(source_type) = shape_of(source, catalog)?.output else {
        return Ok(Verdict::Rejected(Rejection::NoOutput {
            node: source.id.clone(),
        }));
    };

    let port = match handle {
        None => 0,
        Some(h) => h
            .port_index()
            .ok_or_else(|| CheckError::InvalidHandle { handle: h.clone() })?,
    };
    let shape = shape_of(target, catalog)?;
    let Some(target_type) = shape.input(port) else {
        return Ok(Verdict::Rejected(Rejection::NoSuchPort {
            target: target.id.clone(),
            port,
            arity: shape.arity(),
        }));
    };

    if compatible(source_type, target_type) {
        Ok(Verdict::Accepted)
    } else {
        Ok(Verdict::Rejected(Rejection::TypeMismatch {
            source_type,
            target_type,
        }))
    }
}

/// [`EdgeValidator`] backed by an operator catalog, for
/// [`RuleGraph::add_edge`].
#[derive(Debug, Clone, Copy)]
pub struct CatalogValidator<'a> {
    catalog: &'a OperatorCatalog,
}

impl<'a> CatalogValidator<'a> {
    pub fn new(catalog: &'a OperatorCatalog) -> Self {
        CatalogValidator { catalog }
    }
}

impl EdgeValidator for CatalogValidator<'_> {
    type Error = CheckError;

    fn validate(&self, graph: &RuleGraph, proposal: &EdgeProposal) -> Result<Verdict, CheckError> {
        validate_edge(graph, self.catalog, proposal)
    }
}
