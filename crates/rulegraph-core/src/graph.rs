//! RuleGraph: the authoritative node/edge store for one rule.
//!
//! Nodes and edges live in a petgraph `StableGraph` so that removing a node
//! drops every incident edge in the same step. A side map resolves the
//! string [`NodeId`]s used on the wire to graph indices.
//!
//! Every mutation is all-or-nothing: inputs are checked before anything is
//! touched, and a rejected or failed operation leaves both the graph and its
//! revision counter unchanged. Edge acceptance is delegated to an
//! [`EdgeValidator`].

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde_json::Value;

use crate::edge::{Connection, Edge, EdgeProposal, Verdict};
use crate::error::CoreError;
use crate::id::{EdgeId, NodeId};
use crate::node::{Node, NodeData};
use crate::types::Position;

/// Decides whether a proposed edge may be added to a graph.
///
/// Implementations only read the graph. Hard failures (e.g. a node whose shape
/// cannot be resolved) go through `Error`; refusals go through
/// [`Verdict::Rejected`].
pub trait EdgeValidator {
    type Error: From<CoreError>;

    fn validate(&self, graph: &RuleGraph, proposal: &EdgeProposal)
        -> Result<Verdict, Self::Error>;
}

/// A rule graph under edit.
#[derive(Debug, Clone)]
pub struct RuleGraph {
    graph: StableGraph<Node, Edge, Directed, u32>,
    index: HashMap<NodeId, NodeIndex<u32>>,
    /// Highest numeric id handed out or loaded. Never decreases.
    last_id: u64,
    /// Bumped by every successful mutation.
    revision: u64,
}

impl Default for RuleGraph {
    fn default() -> Self {
        RuleGraph::new()
    }
}

impl RuleGraph {
    /// Creates an empty graph whose first node will get id `"1"`.
    pub fn new() -> Self {
        RuleGraph {
            graph: StableGraph::new(),
            index: HashMap::new(),
            last_id: 0,
            revision: 0,
        }
    }

    /// Assembles a graph from already-constructed nodes and edges.
    ///
    /// Used by the codec when hydrating a fetched rule. The id counter resumes
    /// from the largest numeric node id so new nodes never collide with loaded
    /// ones, so a numeric id of `u64::MAX` is refused. Nodes and edges keep
    /// the order they were supplied in.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, CoreError> {
        let mut graph = RuleGraph::new();

        for node in nodes {
            if graph.index.contains_key(&node.id) {
                return Err(CoreError::DuplicateNode { id: node.id });
            }
            if let Some(n) = node.id.numeric() {
                if n == u64::MAX {
                    return Err(CoreError::IdSpaceExhausted { id: node.id });
                }
                graph.last_id = graph.last_id.max(n);
            }
            let id = node.id.clone();
            let idx = graph.graph.add_node(node);
            graph.index.insert(id, idx);
        }

        for edge in edges {
            let from = graph.index_of_endpoint(&edge, &edge.source)?;
            let to = graph.index_of_endpoint(&edge, &edge.target)?;
            if graph.graph.find_edge(from, to).is_some() || graph.edge_index(&edge.id).is_some() {
                return Err(CoreError::DuplicateEdge { edge: edge.id });
            }
            graph.graph.add_edge(from, to, edge);
        }

        #[cfg(debug_assertions)]
        graph.assert_consistency();

        Ok(graph)
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// All nodes, in storage order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// All edges, in storage order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.graph.edge_indices().map(move |idx| &self.graph[idx])
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edge_index(id).map(|idx| &self.graph[idx])
    }

    /// The edge from `source` to `target`, if the pair is connected.
    pub fn edge_between(&self, source: &NodeId, target: &NodeId) -> Option<&Edge> {
        let from = *self.index.get(source)?;
        let to = *self.index.get(target)?;
        self.graph.find_edge(from, to).map(|idx| &self.graph[idx])
    }

    /// Edges ending at `id`. Empty for unknown nodes.
    pub fn incoming(&self, id: &NodeId) -> Vec<&Edge> {
        self.adjacent(id, Direction::Incoming)
    }

    /// Edges starting at `id`. Empty for unknown nodes.
    pub fn outgoing(&self, id: &NodeId) -> Vec<&Edge> {
        self.adjacent(id, Direction::Outgoing)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Highest numeric node id allocated or loaded so far.
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Monotonic change counter; compare two readings to detect edits.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Continues `previous`'s revision sequence in this graph, so an observer
    /// of the graph it replaces sees a change.
    pub fn succeed(&mut self, previous: &RuleGraph) {
        self.revision = self.revision.max(previous.revision.saturating_add(1));
    }

    // -----------------------------------------------------------------------
    // Node mutations
    // -----------------------------------------------------------------------

    /// Adds a node under the next id. Never fails.
    pub fn add_node(&mut self, position: Position, data: NodeData) -> Node {
        self.add_node_with_size(position, None, None, data)
    }

    /// Like [`add_node`](Self::add_node), also recording the node's footprint.
    pub fn add_node_with_size(
        &mut self,
        position: Position,
        width: Option<f64>,
        height: Option<f64>,
        data: NodeData,
    ) -> Node {
        self.last_id += 1;
        let node = Node {
            id: NodeId(self.last_id.to_string()),
            position,
            width,
            height,
            data,
        };
        let idx = self.graph.add_node(node.clone());
        self.index.insert(node.id.clone(), idx);
        self.touch();
        node
    }

    /// Removes a node together with every edge that starts or ends at it.
    ///
    /// Returns the removed node; deleting an absent id is a no-op.
    pub fn delete_node(&mut self, id: &NodeId) -> Option<Node> {
        let idx = self.index.remove(id)?;
        let removed = self.graph.remove_node(idx);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Shallow-merges a JSON object into a node's payload.
    ///
    /// Existing edges touching the node are not re-checked, even if the new
    /// data changes the node's types; see `rulegraph_check::audit_graph`.
    pub fn update_node_data(&mut self, id: &NodeId, patch: &Value) -> Result<&Node, CoreError> {
        let idx = self.require(id)?;
        let fields = patch.as_object().ok_or_else(|| CoreError::InvalidPatch {
            id: id.clone(),
            reason: "patch must be a JSON object".to_string(),
        })?;
        let merged = self.graph[idx]
            .data
            .merged(fields)
            .map_err(|e| CoreError::InvalidPatch {
                id: id.clone(),
                reason: e.to_string(),
            })?;
        self.graph[idx].data = merged;
        self.touch();
        Ok(&self.graph[idx])
    }

    /// Replaces a node's payload with data of the same category.
    pub fn set_node_data(&mut self, id: &NodeId, data: NodeData) -> Result<&Node, CoreError> {
        let idx = self.require(id)?;
        let expected = self.graph[idx].category();
        if data.category() != expected {
            return Err(CoreError::CategoryChange {
                id: id.clone(),
                expected,
                actual: data.category(),
            });
        }
        self.graph[idx].data = data;
        self.touch();
        Ok(&self.graph[idx])
    }

    /// Moves a node on the canvas.
    pub fn move_node(&mut self, id: &NodeId, position: Position) -> Result<(), CoreError> {
        let idx = self.require(id)?;
        self.graph[idx].position = position;
        self.touch();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Edge mutations
    // -----------------------------------------------------------------------

    /// Adds the proposed edge if `validator` accepts it.
    ///
    /// On rejection the graph is unchanged and the reason is returned as
    /// [`Connection::Rejected`].
    pub fn add_edge<V: EdgeValidator>(
        &mut self,
        proposal: EdgeProposal,
        validator: &V,
    ) -> Result<Connection, V::Error> {
        match validator.validate(self, &proposal)? {
            Verdict::Rejected(rejection) => Ok(Connection::Rejected(rejection)),
            Verdict::Accepted => {
                let from = self.require(&proposal.source)?;
                let to = self.require(&proposal.target)?;
                let edge = proposal.into_edge();
                self.graph.add_edge(from, to, edge.clone());
                self.touch();
                Ok(Connection::Connected(edge))
            }
        }
    }

    /// Removes an edge. Deleting an absent id is a no-op.
    pub fn delete_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let idx = self.edge_index(id)?;
        let removed = self.graph.remove_edge(idx);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn touch(&mut self) {
        self.revision += 1;
        #[cfg(debug_assertions)]
        self.assert_consistency();
    }

    fn require(&self, id: &NodeId) -> Result<NodeIndex<u32>, CoreError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| CoreError::NodeNotFound { id: id.clone() })
    }

    fn index_of_endpoint(&self, edge: &Edge, node: &NodeId) -> Result<NodeIndex<u32>, CoreError> {
        self.index
            .get(node)
            .copied()
            .ok_or_else(|| CoreError::DanglingEdge {
                edge: edge.id.clone(),
                node: node.clone(),
            })
    }

    fn edge_index(&self, id: &EdgeId) -> Option<EdgeIndex<u32>> {
        self.graph
            .edge_indices()
            .find(|&idx| self.graph[idx].id == *id)
    }

    fn adjacent(&self, id: &NodeId, direction: Direction) -> Vec<&Edge> {
        match self.index.get(id) {
            Some(&idx) => self
                .graph
                .edges_directed(idx, direction)
                .map(|e| e.weight())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Verifies the id map and edge endpoints agree with the graph.
    ///
    /// Only called in debug builds (via `cfg(debug_assertions)`).
    #[cfg(debug_assertions)]
    fn assert_consistency(&self) {
        use petgraph::visit::IntoEdgeReferences;

        assert_eq!(
            self.index.len(),
            self.graph.node_count(),
            "id map and graph disagree on node count"
        );
        for (id, &idx) in &self.index {
            let node = self
                .graph
                .node_weight(idx)
                .unwrap_or_else(|| panic!("node {} maps to a vacant index", id));
            assert_eq!(&node.id, id, "node stored under the wrong id");
        }
        for edge in self.graph.edge_references() {
            let weight = edge.weight();
            assert_eq!(self.graph[edge.source()].id, weight.source);
            assert_eq!(self.graph[edge.target()].id, weight.target);
        }
    }
}
