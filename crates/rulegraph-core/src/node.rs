//! Rule-graph nodes and their per-category payloads.
//!
//! [`NodeData`] is a tagged union over [`NodeCategory`]: the variant a node is
//! created with fixes its category for the rest of its life. Each payload
//! keeps unrecognized JSON keys in `extra`, and a [`WireShape`] recording the
//! `null`s it was read with, so that data written by other clients survives a
//! load/save round trip untouched.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::NodeId;
use crate::types::{NodeCategory, PortType, Position};

/// A node in a rule graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    /// Rendered footprint, carried for the presentation layer.
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub data: NodeData,
}

impl Node {
    pub fn category(&self) -> NodeCategory {
        self.data.category()
    }

    pub fn label(&self) -> Option<&str> {
        self.data.label()
    }
}

/// Category-specific node payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Provider(ProviderData),
    Constant(ConstantData),
    Logic(LogicData),
    Final(FinalData),
    Schema(SchemaData),
    Config(ConfigData),
}

/// Payload of a PROVIDER node: a reference into a fetched API response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// The saved API request/response configuration the path points into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,
    /// Declared type of the selected field. `None` until a field is picked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<PortType>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub wire: WireShape,
}

/// Payload of a CONSTANT node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// `None` when the literal is absent or `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Type inferred when the value was last set. Display only: validation
    /// always re-infers from `value`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<PortType>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub wire: WireShape,
}

/// Payload of a LOGIC node: a reference into the operator catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub operator_category: String,
    pub operator_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub wire: WireShape,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub wire: WireShape,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub wire: WireShape,
}

/// Graph-wide settings. Keys other than `label` are kept as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
    #[serde(skip)]
    pub wire: WireShape,
}

/// How a payload looked on the wire beyond its typed fields: the keys that
/// were present with a `null` value, and whether the payload itself was
/// `null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireShape {
    null_keys: BTreeSet<String>,
    null_payload: bool,
}

impl WireShape {
    fn of(value: &Value) -> WireShape {
        match value {
            Value::Null => WireShape {
                null_keys: BTreeSet::new(),
                null_payload: true,
            },
            Value::Object(map) => WireShape {
                null_keys: map
                    .iter()
                    .filter(|(_, v)| v.is_null())
                    .map(|(k, _)| k.clone())
                    .collect(),
                null_payload: false,
            },
            _ => WireShape::default(),
        }
    }

    /// Puts back what serialization of the typed fields loses. A `null`
    /// payload stays `null` only while nothing has been set on it.
    fn restore(&self, mut fields: Map<String, Value>) -> Value {
        if self.null_payload && fields.is_empty() {
            return Value::Null;
        }
        for key in &self.null_keys {
            fields.entry(key.clone()).or_insert(Value::Null);
        }
        Value::Object(fields)
    }
}

impl NodeData {
    pub fn category(&self) -> NodeCategory {
        match self {
            NodeData::Provider(_) => NodeCategory::Provider,
            NodeData::Constant(_) => NodeCategory::Constant,
            NodeData::Logic(_) => NodeCategory::Logic,
            NodeData::Final(_) => NodeCategory::Final,
            NodeData::Schema(_) => NodeCategory::Schema,
            NodeData::Config(_) => NodeCategory::Config,
        }
    }

    pub fn label(&self) -> Option<&str> {
        let label = match self {
            NodeData::Provider(d) => &d.label,
            NodeData::Constant(d) => &d.label,
            NodeData::Logic(d) => &d.label,
            NodeData::Final(d) => &d.label,
            NodeData::Schema(d) => &d.label,
            NodeData::Config(d) => &d.label,
        };
        label.as_deref()
    }

    fn wire(&self) -> &WireShape {
        match self {
            NodeData::Provider(d) => &d.wire,
            NodeData::Constant(d) => &d.wire,
            NodeData::Logic(d) => &d.wire,
            NodeData::Final(d) => &d.wire,
            NodeData::Schema(d) => &d.wire,
            NodeData::Config(d) => &d.wire,
        }
    }

    fn wire_mut(&mut self) -> &mut WireShape {
        match self {
            NodeData::Provider(d) => &mut d.wire,
            NodeData::Constant(d) => &mut d.wire,
            NodeData::Logic(d) => &mut d.wire,
            NodeData::Final(d) => &mut d.wire,
            NodeData::Schema(d) => &mut d.wire,
            NodeData::Config(d) => &mut d.wire,
        }
    }

    /// Parses the opaque wire payload of a node of the given category.
    ///
    /// A `null` payload parses like `{}`; [`NodeData::to_value`] writes it
    /// back as `null`.
    pub fn from_value(category: NodeCategory, value: Value) -> Result<NodeData, serde_json::Error> {
        let wire = WireShape::of(&value);
        let value = match value {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        let mut data = match category {
            NodeCategory::Provider => NodeData::Provider(serde_json::from_value(value)?),
            NodeCategory::Constant => NodeData::Constant(serde_json::from_value(value)?),
            NodeCategory::Logic => NodeData::Logic(serde_json::from_value(value)?),
            NodeCategory::Final => NodeData::Final(serde_json::from_value(value)?),
            NodeCategory::Schema => NodeData::Schema(serde_json::from_value(value)?),
            NodeCategory::Config => NodeData::Config(serde_json::from_value(value)?),
        };
        *data.wire_mut() = wire;
        Ok(data)
    }

    /// The wire payload: a JSON object, or `null` for an untouched payload
    /// that was read as `null`.
    pub fn to_value(&self) -> Value {
        // Payloads hold only strings, port types and JSON values, none of
        // which can fail to serialize.
        let value = match self {
            NodeData::Provider(d) => serde_json::to_value(d),
            NodeData::Constant(d) => serde_json::to_value(d),
            NodeData::Logic(d) => serde_json::to_value(d),
            NodeData::Final(d) => serde_json::to_value(d),
            NodeData::Schema(d) => serde_json::to_value(d),
            NodeData::Config(d) => serde_json::to_value(d),
        };
        let fields = match value {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        self.wire().restore(fields)
    }

    /// Shallow-merges `patch` over this payload and re-parses the result as
    /// the same category.
    pub fn merged(&self, patch: &Map<String, Value>) -> Result<NodeData, serde_json::Error> {
        let mut fields = match self.to_value() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            fields.insert(key.clone(), value.clone());
        }
        NodeData::from_value(self.category(), Value::Object(fields))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn category_follows_variant() {
        assert_eq!(
            NodeData::Final(FinalData::default()).category(),
            NodeCategory::Final
        );
        assert_eq!(
            NodeData::Constant(ConstantData::default()).category(),
            NodeCategory::Constant
        );
    }

    #[test]
    fn provider_payload_uses_camel_case() {
        let data = NodeData::Provider(ProviderData {
            json_path: Some("$.order.total".into()),
            output_type: Some(PortType::Number),
            ..Default::default()
        });
        assert_eq!(
            data.to_value(),
            json!({"jsonPath": "$.order.total", "outputType": "NUMBER"})
        );
    }

    #[test]
    fn unknown_keys_survive_parse_and_serialize() {
        let wire = json!({
            "operatorCategory": "comparison",
            "operatorName": "equals",
            "color": "#ff0000"
        });
        let data = NodeData::from_value(NodeCategory::Logic, wire.clone()).unwrap();
        match &data {
            NodeData::Logic(logic) => {
                assert_eq!(logic.operator_name, "equals");
                assert_eq!(logic.extra.get("color"), Some(&json!("#ff0000")));
            }
            other => panic!("expected logic payload, got {:?}", other),
        }
        assert_eq!(data.to_value(), wire);
    }

    #[test]
    fn logic_payload_requires_operator_reference() {
        let err = NodeData::from_value(NodeCategory::Logic, json!({"operatorName": "and"}));
        assert!(err.is_err());
    }

    #[test]
    fn merge_overrides_and_keeps_category() {
        let data = NodeData::Constant(ConstantData {
            value: Some(json!(1)),
            value_type: Some(PortType::Number),
            ..Default::default()
        });
        let patch = json!({"label": "threshold", "value": 10});
        let merged = data.merged(patch.as_object().unwrap()).unwrap();
        assert_eq!(merged.category(), NodeCategory::Constant);
        assert_eq!(merged.label(), Some("threshold"));
        match merged {
            NodeData::Constant(c) => {
                assert_eq!(c.value, Some(json!(10)));
                assert_eq!(c.value_type, Some(PortType::Number));
            }
            other => panic!("expected constant payload, got {:?}", other),
        }
    }

    #[test]
    fn merge_rejects_payload_that_no_longer_fits() {
        let data = NodeData::Provider(ProviderData::default());
        let patch = json!({"outputType": "TIMESTAMP"});
        assert!(data.merged(patch.as_object().unwrap()).is_err());
    }

    #[test]
    fn config_keeps_free_form_settings() {
        let wire = json!({"label": "settings", "evaluateOn": "change", "timeoutMs": 500});
        let data = NodeData::from_value(NodeCategory::Config, wire.clone()).unwrap();
        assert_eq!(data.label(), Some("settings"));
        assert_eq!(data.to_value(), wire);
    }

    #[test]
    fn absent_fields_stay_absent() {
        for (category, wire) in [
            (NodeCategory::Schema, json!({})),
            (NodeCategory::Constant, json!({"label": "x"})),
        ] {
            let data = NodeData::from_value(category, wire.clone()).unwrap();
            assert_eq!(data.to_value(), wire);
        }
    }

    #[test]
    fn explicit_nulls_are_written_back() {
        let wire = json!({"label": null, "value": 1, "valueType": null});
        let data = NodeData::from_value(NodeCategory::Constant, wire.clone()).unwrap();
        assert_eq!(data.label(), None);
        assert_eq!(data.to_value(), wire);

        let wire = json!({"value": null});
        let data = NodeData::from_value(NodeCategory::Constant, wire.clone()).unwrap();
        match &data {
            NodeData::Constant(c) => assert_eq!(c.value, None),
            other => panic!("expected constant payload, got {:?}", other),
        }
        assert_eq!(data.to_value(), wire);
    }

    #[test]
    fn null_payload_stays_null_until_edited() {
        let data = NodeData::from_value(NodeCategory::Final, Value::Null).unwrap();
        assert_eq!(data.to_value(), Value::Null);

        let patch = json!({"label": "done"});
        let edited = data.merged(patch.as_object().unwrap()).unwrap();
        assert_eq!(edited.to_value(), json!({"label": "done"}));
    }

    #[test]
    fn setting_a_null_field_replaces_the_null() {
        let data =
            NodeData::from_value(NodeCategory::Constant, json!({"value": null})).unwrap();
        let patch = json!({"value": 5});
        let edited = data.merged(patch.as_object().unwrap()).unwrap();
        assert_eq!(edited.to_value(), json!({"value": 5}));
    }
}
