//! Whole-graph audit.
//!
//! Edge validation only runs when an edge is proposed. Editing a constant or
//! a provider's output type afterwards can leave existing edges ill-typed, and
//! a catalog refresh can orphan LOGIC nodes. [`audit_graph`] re-checks the
//! whole graph and reports every problem instead of stopping at the first.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use rulegraph_core::edge::{Rejection, Verdict};
use rulegraph_core::graph::RuleGraph;
use rulegraph_core::id::{EdgeId, NodeId, TargetHandle};
use rulegraph_core::node::NodeData;

use crate::catalog::OperatorCatalog;
use crate::error::CheckError;
use crate::registry::resolve_operator;
use crate::validate::check_connection;

/// One problem found by [`audit_graph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "finding", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Finding {
    /// A LOGIC node's operator is missing from the catalog.
    #[error("node {node} references unknown operator '{operator}' in category '{category}'")]
    UnresolvedOperator {
        node: NodeId,
        category: String,
        operator: String,
    },

    /// An existing edge would be refused if it were proposed now.
    #[error("edge {edge} is no longer valid: {rejection}")]
    StaleEdge { edge: EdgeId, rejection: Rejection },

    /// An existing edge carries a handle that is not `input-<N>`.
    #[error("edge {edge} has malformed target handle '{handle}'")]
    MalformedHandle { edge: EdgeId, handle: TargetHandle },
}

/// Re-checks every node and edge of `graph` against `catalog`.
///
/// Findings are reported nodes first, then edges, each in storage order.
/// Edges touching a node with an unresolved operator are not re-checked;
/// the node's own finding covers them.
pub fn audit_graph(graph: &RuleGraph, catalog: &OperatorCatalog) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut unresolved: HashSet<&NodeId> = HashSet::new();

    for node in graph.nodes() {
        if let NodeData::Logic(data) = &node.data {
            if resolve_operator(node, data, catalog).is_err() {
                unresolved.insert(&node.id);
                findings.push(Finding::UnresolvedOperator {
                    node: node.id.clone(),
                    category: data.operator_category.clone(),
                    operator: data.operator_name.clone(),
                });
            }
        }
    }

    for edge in graph.edges() {
        if unresolved.contains(&edge.source) || unresolved.contains(&edge.target) {
            continue;
        }
        let (Some(source), Some(target)) = (graph.node(&edge.source), graph.node(&edge.target))
        else {
            continue;
        };
        match check_connection(source, target, edge.target_handle.as_ref(), catalog) {
            Ok(Verdict::Accepted) => {}
            Ok(Verdict::Rejected(rejection)) => findings.push(Finding::StaleEdge {
                edge: edge.id.clone(),
                rejection,
            }),
            Err(CheckError::InvalidHandle { handle }) => findings.push(Finding::MalformedHandle {
                edge: edge.id.clone(),
                handle,
            }),
            // Both endpoints resolved above.
            Err(_) => {}
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use rulegraph_core::edge::{Edge, EdgeProposal};
    use rulegraph_core::node::{ConstantData, FinalData, LogicData, Node, ProviderData};
    use rulegraph_core::types::{PortType, Position};

    use super::*;
    use crate::catalog::OperatorEntry;
    use crate::validate::CatalogValidator;

    fn catalog() -> OperatorCatalog {
        vec![OperatorEntry {
            operator_name: "lessThan".into(),
            description: String::new(),
            category: "number".into(),
            input_types: vec![PortType::Number, PortType::Number],
            output_type: PortType::Boolean,
        }]
        .into()
    }

    fn node(id: &str, data: NodeData) -> Node {
        Node {
            id: NodeId::from(id),
            position: Position::default(),
            width: None,
            height: None,
            data,
        }
    }

    fn edge(source: &str, target: &str, handle: Option<&str>) -> Edge {
        EdgeProposal::new(source, target, handle.map(TargetHandle::from)).into_edge()
    }

    fn less_than() -> NodeData {
        NodeData::Logic(LogicData {
            operator_category: "number".into(),
            operator_name: "lessThan".into(),
            ..Default::default()
        })
    }

    #[test]
    fn clean_graph_has_no_findings() {
        let graph = RuleGraph::from_parts(
            vec![
                node("1", NodeData::Constant(ConstantData { value: Some(json!(3)), ..Default::default() })),
                node("2", less_than()),
                node("3", NodeData::Final(FinalData::default())),
            ],
            vec![edge("1", "2", Some("input-0")), edge("2", "3", None)],
        )
        .unwrap();
        assert!(audit_graph(&graph, &catalog()).is_empty());
    }

    #[test]
    fn edited_constant_makes_its_edge_stale() {
        let catalog = catalog();
        let validator = CatalogValidator::new(&catalog);
        let mut graph = RuleGraph::new();
        let c = graph
            .add_node(
                Position::default(),
                NodeData::Constant(ConstantData { value: Some(json!(3)), ..Default::default() }),
            )
            .id;
        let op = graph.add_node(Position::default(), less_than()).id;
        let connected = graph
            .add_edge(EdgeProposal::new(c.clone(), op.clone(), None), &validator)
            .unwrap();
        assert!(connected.is_connected());

        graph.update_node_data(&c, &json!({"value": "three"})).unwrap();
        let findings = audit_graph(&graph, &catalog);
        assert_eq!(
            findings,
            vec![Finding::StaleEdge {
                edge: EdgeId::between(&c, &op),
                rejection: Rejection::TypeMismatch {
                    source_type: PortType::String,
                    target_type: PortType::Number,
                },
            }]
        );
    }

    #[test]
    fn unresolved_operator_hides_its_edges() {
        let graph = RuleGraph::from_parts(
            vec![
                node("1", NodeData::Provider(ProviderData::default())),
                node(
                    "2",
                    NodeData::Logic(LogicData {
                        operator_category: "number".into(),
                        operator_name: "between".into(),
                        ..Default::default()
                    }),
                ),
                node("3", NodeData::Final(FinalData::default())),
            ],
            vec![edge("1", "2", None), edge("2", "3", None)],
        )
        .unwrap();
        let findings = audit_graph(&graph, &catalog());
        assert_eq!(findings.len(), 1);
        assert!(matches!(
            &findings[0],
            Finding::UnresolvedOperator { operator, .. } if operator == "between"
        ));
    }

    #[test]
    fn reports_every_problem() {
        let graph = RuleGraph::from_parts(
            vec![
                node("1", NodeData::Constant(ConstantData { value: Some(json!("x")), ..Default::default() })),
                node("2", less_than()),
                node("3", NodeData::Final(FinalData::default())),
                node("4", NodeData::Provider(ProviderData::default())),
            ],
            vec![
                edge("1", "2", Some("input-0")),
                edge("4", "2", Some("right")),
                edge("1", "3", None),
            ],
        )
        .unwrap();
        let findings = audit_graph(&graph, &catalog());
        assert_eq!(findings.len(), 3);
        assert!(matches!(findings[0], Finding::StaleEdge { .. }));
        assert!(matches!(
            &findings[1],
            Finding::MalformedHandle { handle, .. } if handle.0 == "right"
        ));
        assert!(matches!(
            &findings[2],
            Finding::StaleEdge { rejection: Rejection::TypeMismatch { target_type: PortType::Boolean, .. }, .. }
        ));
    }

    #[test]
    fn findings_serialize_with_a_tag() {
        let finding = Finding::MalformedHandle {
            edge: EdgeId::from("edge-1-2"),
            handle: TargetHandle::from("left"),
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["finding"], "MALFORMED_HANDLE");
        assert_eq!(json["edge"], "edge-1-2");
    }
}
