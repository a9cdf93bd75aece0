//! What the user asks for when dropping a new node on the canvas.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use rulegraph_check::catalog::OperatorCatalog;
use rulegraph_check::literal::infer_literal_type;
use rulegraph_core::node::{
    ConfigData, ConstantData, FinalData, LogicData, NodeData, ProviderData, SchemaData,
};
use rulegraph_core::types::{NodeCategory, PortType};

use crate::error::SessionError;

/// A field picked from a fetched API response, as returned by the schema
/// lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    pub json_path: String,
    pub output_type: PortType,
}

/// A new node, before it has an id or a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeRequest {
    Provider {
        #[serde(default, rename = "arcId")]
        arc_id: Option<String>,
        #[serde(default)]
        field: Option<SchemaField>,
    },
    Constant {
        #[serde(default)]
        value: Value,
    },
    Logic {
        #[serde(rename = "operatorCategory")]
        operator_category: String,
        #[serde(rename = "operatorName")]
        operator_name: String,
    },
    Final,
    Schema {
        #[serde(default)]
        schema: Value,
    },
    Config {
        #[serde(default)]
        settings: Map<String, Value>,
    },
}

impl NodeRequest {
    pub fn category(&self) -> NodeCategory {
        match self {
            NodeRequest::Provider { .. } => NodeCategory::Provider,
            NodeRequest::Constant { .. } => NodeCategory::Constant,
            NodeRequest::Logic { .. } => NodeCategory::Logic,
            NodeRequest::Final => NodeCategory::Final,
            NodeRequest::Schema { .. } => NodeCategory::Schema,
            NodeRequest::Config { .. } => NodeCategory::Config,
        }
    }

    /// Builds the payload for the new node.
    ///
    /// A LOGIC request must name an operator in `catalog`. A CONSTANT caches
    /// the type inferred from its literal.
    pub fn into_data(self, catalog: &OperatorCatalog) -> Result<NodeData, SessionError> {
        Ok(match self {
            NodeRequest::Provider { arc_id, field } => {
                let (json_path, output_type) = match field {
                    Some(f) => (Some(f.json_path), Some(f.output_type)),
                    None => (None, None),
                };
                NodeData::Provider(ProviderData {
                    arc_id,
                    json_path,
                    output_type,
                    ..Default::default()
                })
            }
            NodeRequest::Constant { value } => NodeData::Constant(ConstantData {
                value_type: Some(infer_literal_type(&value)),
                value: Some(value),
                ..Default::default()
            }),
            NodeRequest::Logic {
                operator_category,
                operator_name,
            } => {
                if !catalog.contains(&operator_category, &operator_name) {
                    return Err(SessionError::ShapeResolution {
                        category: operator_category,
                        operator: operator_name,
                    });
                }
                NodeData::Logic(LogicData {
                    operator_category,
                    operator_name,
                    ..Default::default()
                })
            }
            NodeRequest::Final => NodeData::Final(FinalData::default()),
            NodeRequest::Schema { schema } => NodeData::Schema(SchemaData {
                schema: Some(schema),
                ..Default::default()
            }),
            NodeRequest::Config { settings } => NodeData::Config(ConfigData {
                settings,
                ..Default::default()
            }),
        })
    }
}
