//! Core data model for transformation rule graphs.
//!
//! A rule graph is a small directed graph of typed nodes (data providers,
//! literal constants, logic operators and a single boolean sink) that decides
//! whether a transformation fires. This crate owns the vocabulary (port types,
//! node categories, ids), the per-category node payloads, and [`RuleGraph`],
//! the store through which every mutation goes.
//!
//! Edge acceptance is delegated through the [`EdgeValidator`] trait so that the
//! type-checking rules can live in `rulegraph-check` without the store knowing
//! about operator catalogs.

pub mod edge;
pub mod error;
pub mod graph;
pub mod id;
pub mod node;
pub mod types;

pub use edge::{Connection, Edge, EdgeProposal, Rejection, Verdict};
pub use error::CoreError;
pub use graph::{EdgeValidator, RuleGraph};
pub use id::{EdgeId, NodeId, TargetHandle};
pub use node::{
    ConfigData, ConstantData, FinalData, LogicData, Node, NodeData, ProviderData, SchemaData,
    WireShape,
};
pub use types::{NodeCategory, PortType, Position};
