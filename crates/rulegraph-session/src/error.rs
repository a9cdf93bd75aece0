//! Session error types.
//!
//! [`SessionError`] is the unified error type for session operations. Lower
//! layers are wrapped unchanged; the session adds the failures that only make
//! sense during interactive editing.

use thiserror::Error;

use rulegraph_check::error::CheckError;
use rulegraph_core::error::CoreError;
use rulegraph_core::id::NodeId;
use rulegraph_core::types::NodeCategory;
use rulegraph_storage::error::{CodecError, StorageError};

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The node does not exist in the live graph.
    #[error("node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// The node's operator could not be resolved when the rule was loaded;
    /// it can only be deleted.
    #[error("node {id} is blocked: operator '{operator}' in category '{category}' is not in the catalog")]
    NodeBlocked {
        id: NodeId,
        category: String,
        operator: String,
    },

    /// The edit only applies to nodes of another category.
    #[error("node {id} is {actual}, expected {expected}")]
    WrongCategory {
        id: NodeId,
        expected: NodeCategory,
        actual: NodeCategory,
    },

    /// A LOGIC node was requested for an operator the catalog lacks.
    #[error("unknown operator '{operator}' in category '{category}'")]
    ShapeResolution { category: String, operator: String },

    #[error(transparent)]
    Check(#[from] CheckError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
