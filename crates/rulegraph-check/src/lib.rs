//! Static checking for rule graphs.
//!
//! - [`compat`]: the port-type compatibility relation.
//! - [`literal`]: type inference for constant literals.
//! - [`catalog`]: the externally supplied operator catalog.
//! - [`registry`]: per-category node shapes ([`shape_of`]).
//! - [`validate`]: eager per-edit edge validation ([`validate_edge`],
//!   [`CatalogValidator`]).
//! - [`audit`]: whole-graph re-check reporting every finding at once.
//!
//! Everything here is pure: the graph is read, never modified.

pub mod audit;
pub mod catalog;
pub mod compat;
pub mod error;
pub mod literal;
pub mod registry;
pub mod validate;

pub use audit::{audit_graph, Finding};
pub use catalog::{OperatorCatalog, OperatorEntry};
pub use compat::compatible;
pub use error::CheckError;
pub use literal::{infer_literal_type, is_iso_datetime};
pub use registry::{resolve_operator, shape_of, NodeShape};
pub use validate::{validate_edge, CatalogValidator};
