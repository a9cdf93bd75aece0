//! Conversions between [`RuleGraph`] and the wire [`GraphDto`].
//!
//! [`encode`] flattens a graph into DTOs in storage order. [`decode`] parses
//! each node's category and payload, then hands the pieces to
//! [`RuleGraph::from_parts`], which rejects duplicate ids and dangling edges
//! and resumes the id counter from the largest numeric node id.
//!
//! Edges are restored as stored, without re-validation; run
//! `rulegraph_check::audit_graph` on the result to find edges that no longer
//! type-check.

use rulegraph_core::edge::Edge;
use rulegraph_core::graph::RuleGraph;
use rulegraph_core::node::{Node, NodeData};
use rulegraph_core::types::NodeCategory;

use crate::dto::{EdgeDto, GraphDto, NodeDto};
use crate::error::CodecError;

/// Converts a graph to its wire form.
pub fn encode(graph: &RuleGraph) -> GraphDto {
    GraphDto {
        nodes: graph.nodes().map(encode_node).collect(),
        edges: graph.edges().map(EdgeDto::from).collect(),
    }
}

fn encode_node(node: &Node) -> NodeDto {
    NodeDto {
        id: node.id.clone(),
        point: node.position,
        category: node.category().as_str().to_string(),
        width: node.width,
        height: node.height,
        data: node.data.to_value(),
    }
}

/// Builds a live graph from its wire form.
pub fn decode(dto: &GraphDto) -> Result<RuleGraph, CodecError> {
    let nodes = dto
        .nodes
        .iter()
        .map(decode_node)
        .collect::<Result<Vec<_>, _>>()?;
    let edges: Vec<Edge> = dto.edges.iter().cloned().map(Edge::from).collect();
    Ok(RuleGraph::from_parts(nodes, edges)?)
}

fn decode_node(dto: &NodeDto) -> Result<Node, CodecError> {
    let category =
        NodeCategory::parse(&dto.category).ok_or_else(|| CodecError::UnknownNodeCategory {
            id: dto.id.clone(),
            category: dto.category.clone(),
        })?;
    let data = NodeData::from_value(category, dto.data.clone()).map_err(|e| CodecError::InvalidNodeData {
        id: dto.id.clone(),
        reason: e.to_string(),
    })?;
    Ok(Node {
        id: dto.id.clone(),
        position: dto.point,
        width: dto.width,
        height: dto.height,
        data,
    })
}

/// Serializes a graph's wire form as pretty-printed JSON.
pub fn to_json(graph: &RuleGraph) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&encode(graph))
}

/// Parses a wire-form JSON document and decodes it.
pub fn from_json(json: &str) -> Result<RuleGraph, CodecError> {
    let dto: GraphDto = serde_json::from_str(json)?;
    decode(&dto)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use rulegraph_core::error::CoreError;
    use rulegraph_core::id::NodeId;
    use rulegraph_core::node::ConstantData;
    use rulegraph_core::types::{PortType, Position};

    use super::*;

    fn node_dto(id: &str, category: &str, data: Value) -> NodeDto {
        NodeDto {
            id: NodeId::from(id),
            point: Position::new(1.0, 2.0),
            category: category.into(),
            width: None,
            height: None,
            data,
        }
    }

    #[test]
    fn test_encode_uses_bare_category_names() {
        let mut graph = RuleGraph::new();
        graph.add_node(
            Position::new(5.0, 6.0),
            NodeData::Constant(ConstantData {
                value: Some(json!(42)),
                value_type: Some(PortType::Number),
                ..Default::default()
            }),
        );
        let dto = encode(&graph);
        assert_eq!(dto.nodes.len(), 1);
        assert_eq!(dto.nodes[0].category, "CONSTANT");
        assert_eq!(dto.nodes[0].point, Position::new(5.0, 6.0));
        assert_eq!(dto.nodes[0].data, json!({"value": 42, "valueType": "NUMBER"}));
    }

    #[test]
    fn test_decode_resumes_counter_after_largest_numeric_id() {
        let dto = GraphDto {
            nodes: vec![
                node_dto("3", "FINAL", json!({})),
                node_dto("7", "CONSTANT", json!({"value": true})),
                node_dto("legacy", "FINAL", json!({})),
            ],
            edges: vec![],
        };
        let mut graph = decode(&dto).unwrap();
        assert_eq!(graph.last_id(), 7);
        let created = graph.add_node(Position::default(), NodeData::Final(Default::default()));
        assert_eq!(created.id, NodeId::from("8"));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let dto = GraphDto {
            nodes: vec![node_dto("1", "WIDGET", json!({}))],
            edges: vec![],
        };
        match decode(&dto).unwrap_err() {
            CodecError::UnknownNodeCategory { id, category } => {
                assert_eq!(id, NodeId::from("1"));
                assert_eq!(category, "WIDGET");
            }
            other => panic!("expected UnknownNodeCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_category_is_case_sensitive() {
        let dto = GraphDto {
            nodes: vec![node_dto("1", "final", json!({}))],
            edges: vec![],
        };
        assert!(matches!(
            decode(&dto),
            Err(CodecError::UnknownNodeCategory { .. })
        ));
    }

    #[test]
    fn test_payload_must_fit_category() {
        let dto = GraphDto {
            nodes: vec![node_dto("1", "LOGIC", json!({"operatorName": 5}))],
            edges: vec![],
        };
        assert!(matches!(
            decode(&dto),
            Err(CodecError::InvalidNodeData { .. })
        ));
    }

    #[test]
    fn test_null_data_decodes_and_encodes_as_null() {
        let dto = GraphDto {
            nodes: vec![node_dto("1", "FINAL", Value::Null)],
            edges: vec![],
        };
        let graph = decode(&dto).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(encode(&graph), dto);
    }

    #[test]
    fn test_payloads_are_written_back_as_read() {
        let dto = GraphDto {
            nodes: vec![
                node_dto("1", "SCHEMA", json!({})),
                node_dto("2", "CONSTANT", json!({"label": "x"})),
                node_dto("3", "CONSTANT", json!({"label": null, "value": 1})),
                node_dto("4", "PROVIDER", json!({"jsonPath": null, "outputType": "STRING"})),
            ],
            edges: vec![],
        };
        assert_eq!(encode(&decode(&dto).unwrap()), dto);
    }

    #[test]
    fn test_dangling_edge_propagates_from_graph() {
        let dto = GraphDto {
            nodes: vec![node_dto("1", "CONSTANT", json!({"value": 1}))],
            edges: vec![EdgeDto {
                id: "edge-1-2".into(),
                source: NodeId::from("1"),
                target: NodeId::from("2"),
                target_handle: None,
            }],
        };
        assert!(matches!(
            decode(&dto),
            Err(CodecError::Graph(CoreError::DanglingEdge { .. }))
        ));
    }

    #[test]
    fn test_duplicate_node_propagates_from_graph() {
        let dto = GraphDto {
            nodes: vec![
                node_dto("1", "FINAL", json!({})),
                node_dto("1", "FINAL", json!({})),
            ],
            edges: vec![],
        };
        assert!(matches!(
            decode(&dto),
            Err(CodecError::Graph(CoreError::DuplicateNode { .. }))
        ));
    }

    #[test]
    fn test_id_without_successor_is_rejected() {
        let dto = GraphDto {
            nodes: vec![node_dto("18446744073709551615", "FINAL", json!({}))],
            edges: vec![],
        };
        assert!(matches!(
            decode(&dto),
            Err(CodecError::Graph(CoreError::IdSpaceExhausted { .. }))
        ));
    }

    #[test]
    fn test_json_helpers() {
        let json = r#"{
            "nodes": [
                {"id": "1", "point": {"x": 0, "y": 0}, "type": "PROVIDER",
                 "data": {"jsonPath": "$.status", "outputType": "STRING", "color": "red"}},
                {"id": "2", "point": {"x": 0, "y": 0}, "type": "FINAL", "data": {}}
            ],
            "edges": []
        }"#;
        let graph = from_json(json).unwrap();
        let text = to_json(&graph).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        // Keys the model does not know about survive.
        assert_eq!(back["nodes"][0]["data"]["color"], "red");
        assert_eq!(back["nodes"][0]["data"]["outputType"], "STRING");

        assert!(matches!(from_json("{not json"), Err(CodecError::Json(_))));
    }
}
