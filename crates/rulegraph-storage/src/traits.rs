//! The [`RuleStore`] trait: what a rule session needs from the backend.
//!
//! The trait is synchronous, like the rest of the engine. Saving takes
//! `&mut self`, so a store can never see two overlapping saves from the same
//! owner.

use rulegraph_check::catalog::OperatorCatalog;

use crate::dto::GraphDto;
use crate::error::StorageError;
use crate::types::{RuleId, RuleSummary};

/// Storage contract for rule graphs and the metadata around them.
pub trait RuleStore {
    /// Lists all rules known to the store.
    fn list_rules(&self) -> Result<Vec<RuleSummary>, StorageError>;

    /// Fetches the saved graph of a rule.
    ///
    /// A rule that exists but has never been saved yields an empty graph.
    fn load_rule(&self, id: &RuleId) -> Result<GraphDto, StorageError>;

    /// Replaces the saved graph of an existing rule.
    fn save_rule(&mut self, id: &RuleId, graph: &GraphDto) -> Result<(), StorageError>;

    /// Fetches the operator catalog LOGIC nodes are resolved against.
    fn operator_catalog(&self) -> Result<OperatorCatalog, StorageError>;
}
