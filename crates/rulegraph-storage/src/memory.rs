//! In-memory implementation of [`RuleStore`].
//!
//! [`InMemoryStore`] backs tests and ephemeral sessions. Rules are listed in
//! id order.

use std::collections::BTreeMap;

use rulegraph_check::catalog::OperatorCatalog;

use crate::dto::GraphDto;
use crate::error::StorageError;
use crate::traits::RuleStore;
use crate::types::{RuleId, RuleSummary};

#[derive(Debug, Clone)]
struct StoredRule {
    summary: RuleSummary,
    /// `None` until the rule is first saved.
    graph: Option<GraphDto>,
}

/// In-memory implementation of [`RuleStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    rules: BTreeMap<RuleId, StoredRule>,
    catalog: OperatorCatalog,
    saves: usize,
}

impl InMemoryStore {
    /// Creates an empty store with an empty catalog.
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    /// Creates an empty store serving `catalog`.
    pub fn with_catalog(catalog: OperatorCatalog) -> Self {
        InMemoryStore {
            catalog,
            ..InMemoryStore::default()
        }
    }

    /// Registers a rule with no saved graph, replacing any rule with the same
    /// id.
    pub fn insert_rule(&mut self, summary: RuleSummary) {
        self.rules.insert(
            summary.id.clone(),
            StoredRule {
                summary,
                graph: None,
            },
        );
    }

    /// Registers a rule together with its saved graph.
    pub fn insert_rule_with_graph(&mut self, summary: RuleSummary, graph: GraphDto) {
        self.rules.insert(
            summary.id.clone(),
            StoredRule {
                summary,
                graph: Some(graph),
            },
        );
    }

    pub fn set_catalog(&mut self, catalog: OperatorCatalog) {
        self.catalog = catalog;
    }

    /// Number of successful [`save_rule`](RuleStore::save_rule) calls.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    fn get_stored(&self, id: &RuleId) -> Result<&StoredRule, StorageError> {
        self.rules
            .get(id)
            .ok_or_else(|| StorageError::RuleNotFound(id.clone()))
    }
}

impl RuleStore for InMemoryStore {
    fn list_rules(&self) -> Result<Vec<RuleSummary>, StorageError> {
        Ok(self.rules.values().map(|r| r.summary.clone()).collect())
    }

    fn load_rule(&self, id: &RuleId) -> Result<GraphDto, StorageError> {
        Ok(self.get_stored(id)?.graph.clone().unwrap_or_default())
    }

    fn save_rule(&mut self, id: &RuleId, graph: &GraphDto) -> Result<(), StorageError> {
        let stored = self
            .rules
            .get_mut(id)
            .ok_or_else(|| StorageError::RuleNotFound(id.clone()))?;
        stored.graph = Some(graph.clone());
        self.saves += 1;
        tracing::debug!(rule = %id, nodes = graph.nodes.len(), edges = graph.edges.len(), "saved rule graph");
        Ok(())
    }

    fn operator_catalog(&self) -> Result<OperatorCatalog, StorageError> {
        Ok(self.catalog.clone())
    }
}
