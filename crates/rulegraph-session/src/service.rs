//! MutationSession: the single coordinator between the editing surface and
//! the graph/check/storage crates.
//!
//! The session exclusively owns the live [`RuleGraph`]. Every user action goes
//! through one of its methods; refusals (rejected connections, unresolved
//! operators) are queued as [`Notice`]s for the surface to display, while
//! genuine failures come back as [`SessionError`].

use std::collections::BTreeMap;

use serde_json::{json, Value};

use rulegraph_check::audit::{audit_graph, Finding};
use rulegraph_check::catalog::OperatorCatalog;
use rulegraph_check::literal::infer_literal_type;
use rulegraph_check::validate::CatalogValidator;
use rulegraph_core::edge::{Connection, Edge, EdgeProposal};
use rulegraph_core::graph::RuleGraph;
use rulegraph_core::id::{EdgeId, NodeId, TargetHandle};
use rulegraph_core::node::Node;
use rulegraph_core::types::{NodeCategory, Position};
use rulegraph_storage::codec::{decode, encode};
use rulegraph_storage::traits::RuleStore;
use rulegraph_storage::types::RuleId;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::notice::Notice;
use crate::request::{NodeRequest, SchemaField};

/// Operator a blocked node refers to.
#[derive(Debug, Clone)]
struct BlockedOperator {
    category: String,
    operator: String,
}

/// An editing session over one rule.
pub struct MutationSession<S: RuleStore> {
    store: S,
    rule_id: RuleId,
    config: SessionConfig,
    catalog: OperatorCatalog,
    graph: RuleGraph,
    /// Graph revision at the last load or save.
    saved_revision: u64,
    /// LOGIC nodes whose operator was missing from the catalog at load time.
    blocked: BTreeMap<NodeId, BlockedOperator>,
    notices: Vec<Notice>,
}

impl<S: RuleStore> MutationSession<S> {
    /// Fetches the catalog and the rule's graph from `store` and starts
    /// editing.
    pub fn open(store: S, rule_id: RuleId, config: SessionConfig) -> Result<Self, SessionError> {
        let catalog = store.operator_catalog()?;
        let graph = decode(&store.load_rule(&rule_id)?)?;
        let mut session = MutationSession {
            store,
            rule_id,
            config,
            catalog,
            saved_revision: graph.revision(),
            graph,
            blocked: BTreeMap::new(),
            notices: Vec::new(),
        };
        session.scan_loaded_graph();
        tracing::info!(
            rule = %session.rule_id,
            nodes = session.graph.node_count(),
            edges = session.graph.edge_count(),
            blocked = session.blocked.len(),
            "opened rule"
        );
        Ok(session)
    }

    /// Discards unsaved edits and re-fetches the catalog and graph.
    ///
    /// On failure the session is left as it was.
    pub fn reload(&mut self) -> Result<(), SessionError> {
        let catalog = self.store.operator_catalog()?;
        let mut graph = decode(&self.store.load_rule(&self.rule_id)?)?;
        graph.succeed(&self.graph);
        let discarded = self.is_dirty();
        self.catalog = catalog;
        self.saved_revision = graph.revision();
        self.graph = graph;
        self.scan_loaded_graph();
        tracing::info!(rule = %self.rule_id, discarded, "reloaded rule");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn graph(&self) -> &RuleGraph {
        &self.graph
    }

    pub fn catalog(&self) -> &OperatorCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn rule_id(&self) -> &RuleId {
        &self.rule_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ends the session, handing the store back.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Whether the graph changed since it was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.graph.revision() != self.saved_revision
    }

    pub fn is_blocked(&self, id: &NodeId) -> bool {
        self.blocked.contains_key(id)
    }

    pub fn blocked_nodes(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.blocked.keys()
    }

    /// Drains the pending notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Re-checks the whole graph against the current catalog.
    pub fn audit(&self) -> Vec<Finding> {
        audit_graph(&self.graph, &self.catalog)
    }

    // -----------------------------------------------------------------------
    // Node edits
    // -----------------------------------------------------------------------

    /// Creates a node centred on `point`.
    pub fn create_node(&mut self, request: NodeRequest, point: Position) -> Result<Node, SessionError> {
        let category = request.category();
        let data = request.into_data(&self.catalog)?;
        let footprint = self.config.footprint(category);
        let position = Position::new(
            point.x - footprint.width / 2.0,
            point.y - footprint.height / 2.0,
        );
        let node = self.graph.add_node_with_size(
            position,
            Some(footprint.width),
            Some(footprint.height),
            data,
        );
        tracing::debug!(rule = %self.rule_id, node = %node.id, %category, revision = self.graph.revision(), "created node");
        Ok(node)
    }

    /// Deletes a node and its edges. Permitted on blocked nodes.
    pub fn delete_node(&mut self, id: &NodeId) -> Option<Node> {
        self.blocked.remove(id);
        let removed = self.graph.delete_node(id);
        if removed.is_some() {
            tracing::debug!(rule = %self.rule_id, node = %id, revision = self.graph.revision(), "deleted node");
        }
        removed
    }

    /// Sets a node's display label. A blank label clears it.
    pub fn rename_node(&mut self, id: &NodeId, label: &str) -> Result<&Node, SessionError> {
        self.require_editable(id)?;
        let label = label.trim();
        let patch = if label.is_empty() {
            json!({ "label": Value::Null })
        } else {
            json!({ "label": label })
        };
        Ok(self.graph.update_node_data(id, &patch)?)
    }

    /// Replaces a constant's literal and its cached type.
    ///
    /// Edges already leaving the node are not re-checked; see [`audit`](Self::audit).
    pub fn set_constant(&mut self, id: &NodeId, value: Value) -> Result<&Node, SessionError> {
        self.require_category(id, NodeCategory::Constant)?;
        let value_type = infer_literal_type(&value);
        let patch = json!({ "value": value, "valueType": value_type });
        Ok(self.graph.update_node_data(id, &patch)?)
    }

    /// Points a provider at a field of its API response.
    pub fn set_provider_field(&mut self, id: &NodeId, field: SchemaField) -> Result<&Node, SessionError> {
        self.require_category(id, NodeCategory::Provider)?;
        let patch = json!({ "jsonPath": field.json_path, "outputType": field.output_type });
        Ok(self.graph.update_node_data(id, &patch)?)
    }

    /// Moves a node so its top-left corner is at `position`.
    pub fn move_node(&mut self, id: &NodeId, position: Position) -> Result<(), SessionError> {
        self.require_editable(id)?;
        self.graph.move_node(id, position)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Edge edits
    // -----------------------------------------------------------------------

    /// Attempts a connection. A rejection is returned and also queued as a
    /// warning notice.
    pub fn connect(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        handle: Option<TargetHandle>,
    ) -> Result<Connection, SessionError> {
        self.require_editable(source)?;
        self.require_editable(target)?;

        let proposal = EdgeProposal::new(source.clone(), target.clone(), handle);
        let validator = CatalogValidator::new(&self.catalog);
        let connection = self.graph.add_edge(proposal, &validator)?;

        match &connection {
            Connection::Connected(edge) => {
                tracing::debug!(rule = %self.rule_id, edge = %edge.id, revision = self.graph.revision(), "connected");
            }
            Connection::Rejected(rejection) => {
                tracing::info!(rule = %self.rule_id, %source, %target, reason = %rejection, "connection rejected");
                self.notices
                    .push(Notice::warning(rejection.to_string()).about(target.clone()));
            }
        }
        Ok(connection)
    }

    /// Removes an edge. Removing an absent edge is a no-op.
    pub fn disconnect(&mut self, id: &EdgeId) -> Option<Edge> {
        let removed = self.graph.delete_edge(id);
        if removed.is_some() {
            tracing::debug!(rule = %self.rule_id, edge = %id, revision = self.graph.revision(), "disconnected");
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Encodes the live graph and submits it to the store.
    pub fn save(&mut self) -> Result<(), SessionError> {
        let dto = encode(&self.graph);
        self.store.save_rule(&self.rule_id, &dto)?;
        self.saved_revision = self.graph.revision();
        tracing::info!(
            rule = %self.rule_id,
            nodes = dto.nodes.len(),
            edges = dto.edges.len(),
            revision = self.saved_revision,
            "saved rule"
        );
        self.notices.push(Notice::info("Rule saved"));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Rebuilds the blocked set after a load and raises a notice for every
    /// problem the loaded graph already has.
    fn scan_loaded_graph(&mut self) {
        self.blocked.clear();
        for finding in audit_graph(&self.graph, &self.catalog) {
            match finding {
                Finding::UnresolvedOperator {
                    node,
                    category,
                    operator,
                } => {
                    tracing::warn!(rule = %self.rule_id, %node, %category, %operator, "blocking node with unresolved operator");
                    let message = format!(
                        "Operator '{operator}' in category '{category}' is not available; node {node} can only be deleted"
                    );
                    self.notices.push(Notice::error(message).about(node.clone()));
                    self.blocked
                        .insert(node, BlockedOperator { category, operator });
                }
                other => {
                    tracing::warn!(rule = %self.rule_id, finding = %other, "loaded graph has a problem");
                    self.notices.push(Notice::warning(other.to_string()));
                }
            }
        }
    }

    fn require_node(&self, id: &NodeId) -> Result<&Node, SessionError> {
        self.graph
            .node(id)
            .ok_or_else(|| SessionError::NodeNotFound { id: id.clone() })
    }

    fn require_editable(&self, id: &NodeId) -> Result<&Node, SessionError> {
        let node = self.require_node(id)?;
        if let Some(blocked) = self.blocked.get(id) {
            return Err(SessionError::NodeBlocked {
                id: id.clone(),
                category: blocked.category.clone(),
                operator: blocked.operator.clone(),
            });
        }
        Ok(node)
    }

    fn require_category(&self, id: &NodeId, expected: NodeCategory) -> Result<(), SessionError> {
        let node = self.require_editable(id)?;
        let actual = node.category();
        if actual != expected {
            return Err(SessionError::WrongCategory {
                id: id.clone(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

impl<S: RuleStore> std::fmt::Debug for MutationSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationSession")
            .field("rule_id", &self.rule_id)
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .field("revision", &self.graph.revision())
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rulegraph_check::catalog::OperatorEntry;
    use rulegraph_core::types::PortType;
    use rulegraph_storage::memory::InMemoryStore;
    use rulegraph_storage::types::RuleSummary;

    use super::*;

    fn session() -> MutationSession<InMemoryStore> {
        let mut store = InMemoryStore::with_catalog(
            vec![OperatorEntry {
                operator_name: "equals".into(),
                description: String::new(),
                category: "comparison".into(),
                input_types: vec![PortType::Any, PortType::Any],
                output_type: PortType::Boolean,
            }]
            .into(),
        );
        store.insert_rule(RuleSummary::new("r1", "Rule"));
        MutationSession::open(store, RuleId::from("r1"), SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_create_node_centres_on_point() {
        let mut session = session();
        let node = session
            .create_node(NodeRequest::Final, Position::new(500.0, 300.0))
            .unwrap();
        // FINAL footprint is 120x60.
        assert_eq!(node.position, Position::new(440.0, 270.0));
        assert_eq!(node.width, Some(120.0));
        assert_eq!(node.height, Some(60.0));
        assert!(session.is_dirty());
    }

    #[test]
    fn test_unknown_operator_changes_nothing() {
        let mut session = session();
        let revision = session.graph().revision();
        let err = session
            .create_node(
                NodeRequest::Logic {
                    operator_category: "comparison".into(),
                    operator_name: "between".into(),
                },
                Position::default(),
            )
            .unwrap_err();
        assert!(matches!(err, SessionError::ShapeResolution { .. }));
        assert_eq!(session.graph().revision(), revision);
        assert_eq!(session.graph().node_count(), 0);
    }

    #[test]
    fn test_rename_and_clear_label() {
        let mut session = session();
        let id = session
            .create_node(NodeRequest::Final, Position::default())
            .unwrap()
            .id;
        assert_eq!(
            session.rename_node(&id, "  Fire sync ").unwrap().label(),
            Some("Fire sync")
        );
        assert_eq!(session.rename_node(&id, "   ").unwrap().label(), None);
    }

    #[test]
    fn test_set_constant_on_wrong_category() {
        let mut session = session();
        let id = session
            .create_node(NodeRequest::Final, Position::default())
            .unwrap()
            .id;
        let err = session.set_constant(&id, Value::from(1)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::WrongCategory {
                expected: NodeCategory::Constant,
                actual: NodeCategory::Final,
                ..
            }
        ));
    }

    #[test]
    fn test_edits_on_missing_node() {
        let mut session = session();
        let ghost = NodeId::from("42");
        assert!(matches!(
            session.move_node(&ghost, Position::default()),
            Err(SessionError::NodeNotFound { .. })
        ));
        assert!(session.delete_node(&ghost).is_none());
        assert!(!session.is_dirty());
    }
}
