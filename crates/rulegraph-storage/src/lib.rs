//! Wire format and persistence for rule graphs.
//!
//! # Modules
//!
//! - [`dto`]: the backend's JSON shape for a graph (`GraphDto`, `NodeDto`, `EdgeDto`)
//! - [`codec`]: [`RuleGraph`](rulegraph_core::RuleGraph) to/from [`GraphDto`]
//! - [`error`]: [`CodecError`] and [`StorageError`]
//! - [`types`]: rule identity and metadata
//! - [`traits`]: the [`RuleStore`] contract
//! - [`memory`]: [`InMemoryStore`] for tests and ephemeral sessions
//! - [`json_dir`]: [`JsonDirStore`], a directory of JSON files

pub mod codec;
pub mod dto;
pub mod error;
pub mod json_dir;
pub mod memory;
pub mod traits;
pub mod types;

pub use codec::{decode, encode, from_json, to_json};
pub use dto::{EdgeDto, GraphDto, NodeDto};
pub use error::{CodecError, StorageError};
pub use json_dir::JsonDirStore;
pub use memory::InMemoryStore;
pub use traits::RuleStore;
pub use types::{RuleId, RuleSummary};
