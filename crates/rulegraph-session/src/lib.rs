//! Interactive editing of one rule graph.
//!
//! [`MutationSession`] owns the live [`RuleGraph`](rulegraph_core::RuleGraph)
//! of a rule, translates user actions into graph mutations, and surfaces
//! refusals as [`Notice`]s rather than errors. It loads from and saves to any
//! [`RuleStore`](rulegraph_storage::RuleStore).

pub mod config;
pub mod error;
pub mod notice;
pub mod request;
pub mod service;

pub use config::{ConfigError, Footprint, SessionConfig};
pub use error::SessionError;
pub use notice::{Notice, NoticeLevel};
pub use request::{NodeRequest, SchemaField};
pub use service::MutationSession;
