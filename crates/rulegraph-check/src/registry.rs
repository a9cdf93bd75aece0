//! Per-category node shapes.
//!
//! [`shape_of`] maps a node to the types of its input ports and its output
//! port by exhaustive matching on the node's payload. LOGIC shapes come from
//! the operator catalog; everything else is fixed or derived from the node's
//! own data.

use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;

use rulegraph_core::node::{LogicData, Node, NodeData};
use rulegraph_core::types::PortType;

use crate::catalog::{OperatorCatalog, OperatorEntry};
use crate::error::CheckError;
use crate::literal::infer_literal_type;

/// The ports a node exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeShape {
    /// Type of each input port, indexed by the `N` in `input-<N>`.
    pub inputs: SmallVec<[PortType; 4]>,
    /// Output type. `None` for sinks and auxiliary nodes.
    pub output: Option<PortType>,
}

impl NodeShape {
    fn source(output: PortType) -> Self {
        NodeShape {
            inputs: SmallVec::new(),
            output: Some(output),
        }
    }

    fn inert() -> Self {
        NodeShape {
            inputs: SmallVec::new(),
            output: None,
        }
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    /// Type of input port `port`, if the node has that many inputs.
    pub fn input(&self, port: usize) -> Option<PortType> {
        self.inputs.get(port).copied()
    }
}

/// Resolves the port shape of `node`.
///
/// Fails only for LOGIC nodes whose operator is missing from `catalog`.
pub fn shape_of(node: &Node, catalog: &OperatorCatalog) -> Result<NodeShape, CheckError> {
    match &node.data {
        NodeData::Provider(data) => Ok(NodeShape::source(
            data.output_type.unwrap_or(PortType::Any),
        )),
        // Always inferred from the current literal; the cached `value_type`
        // may be stale after an edit.
        NodeData::Constant(data) => {
            let literal = data.value.as_ref().unwrap_or(&Value::Null);
            Ok(NodeShape::source(infer_literal_type(literal)))
        }
        NodeData::Logic(data) => {
            let entry = resolve_operator(node, data, catalog)?;
            Ok(NodeShape {
                inputs: entry.input_types.iter().copied().collect(),
                output: Some(entry.output_type),
            })
        }
        NodeData::Final(_) => Ok(NodeShape {
            inputs: SmallVec::from_slice(&[PortType::Boolean]),
            output: None,
        }),
        NodeData::Schema(_) | NodeData::Config(_) => Ok(NodeShape::inert()),
    }
}

/// Looks up the catalog entry a LOGIC node refers to.
pub fn resolve_operator<'a>(
    node: &Node,
    data: &LogicData,
    catalog: &'a OperatorCatalog,
) -> Result<&'a OperatorEntry, CheckError> {
    catalog
        .get(&data.operator_category, &data.operator_name)
        .ok_or_else(|| CheckError::ShapeResolution {
            node: node.id.clone(),
            category: data.operator_category.clone(),
            operator: data.operator_name.clone(),
        })
}
