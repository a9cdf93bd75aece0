//! Error types for rulegraph-storage.
//!
//! [`CodecError`] covers a wire graph that cannot become a
//! [`RuleGraph`](rulegraph_core::RuleGraph). [`StorageError`] covers
//! everything a [`RuleStore`](crate::traits::RuleStore) backend can fail with.

use std::path::PathBuf;

use thiserror::Error;

use rulegraph_core::error::CoreError;
use rulegraph_core::id::NodeId;

use crate::types::RuleId;

/// Errors produced while decoding a [`GraphDto`](crate::dto::GraphDto).
#[derive(Debug, Error)]
pub enum CodecError {
    /// A node's `type` is not one of the known categories.
    #[error("node {id} has unknown category '{category}'")]
    UnknownNodeCategory { id: NodeId, category: String },

    /// A node's `data` does not fit the payload of its category.
    #[error("node {id} has invalid data: {reason}")]
    InvalidNodeData { id: NodeId, reason: String },

    /// The nodes and edges do not form a consistent graph.
    #[error(transparent)]
    Graph(#[from] CoreError),

    /// The text is not a well-formed graph document.
    #[error("malformed graph JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No rule with the given id is known to the store.
    #[error("rule not found: {0}")]
    RuleNotFound(RuleId),

    /// The id cannot be used to name a file in the store.
    #[error("invalid rule id: '{0}'")]
    InvalidRuleId(RuleId),

    /// The store's root is unusable.
    #[error("invalid store at {path}: {reason}")]
    InvalidStore { path: PathBuf, reason: String },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
